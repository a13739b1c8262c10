use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{table} is missing required columns: {}", columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("columns not provided by any source table: {}", columns.join(", "))]
    UnsourcedColumns { columns: Vec<String> },

    #[error("column '{column}' is not a valid integer key: {message}")]
    InvalidKey { column: String, message: String },

    #[error("stay {stay_id}: unparseable intime '{value}'")]
    InvalidTimestamp { stay_id: i64, value: String },

    #[error("stay {stay_id} appears more than once")]
    DuplicateStay { stay_id: i64 },

    #[error("visits for subject {subject_id} are not ordered by intime")]
    UnorderedVisits { subject_id: i64 },

    #[error("column '{column}' already exists")]
    ColumnExists { column: String },

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_name() {
        let err = TransformError::MissingColumns {
            table: "triage".to_string(),
            columns: vec!["pain".to_string(), "acuity".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "triage is missing required columns: pain, acuity"
        );
    }
}
