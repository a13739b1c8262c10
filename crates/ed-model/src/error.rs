use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid vital range '{text}': {reason}")]
    InvalidRange { text: String, reason: String },
    #[error("no vital range is defined for column '{column}'")]
    UnknownVital { column: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
