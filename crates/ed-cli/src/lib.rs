//! Library components of the `ed-cohort` binary.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
