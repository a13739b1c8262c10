//! Domain vocabulary for building the ED triage admission cohort.
//!
//! This crate has no dataframe dependency. It names the source tables and
//! their columns, and holds the immutable configuration that the transform
//! stages receive explicitly.

pub mod columns;
pub mod error;
pub mod options;
pub mod ranges;
pub mod tables;

pub use columns::CohortColumns;
pub use error::{ModelError, Result};
pub use options::{AdmissionLink, PipelineOptions};
pub use ranges::{OutlierRanges, VitalRange};
pub use tables::TableKind;
