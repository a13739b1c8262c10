//! Loading of the four raw clinical tables.
//!
//! - **reader**: delimited file to `DataFrame`, gzip-aware
//! - **sources**: source path layout and the bundled `SourceTables`

pub mod error;
pub mod reader;
pub mod sources;

pub use error::{IngestError, Result};
pub use reader::read_table;
pub use sources::{SourcePaths, SourceTables, load_sources};
