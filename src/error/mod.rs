//! Error handling for the job-market pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;

/// Specialized error type for pipeline stages
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Error opening, reading or writing a file
    #[error("IO error for {}: {context}: {source}", path.display())]
    File {
        path: PathBuf,
        context: String,
        #[source]
        source: io::Error,
    },
    /// IO error without an associated path
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Error parsing or writing delimited data through Arrow
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Error parsing delimited data outside Arrow
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A noise-word or postal-code pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
    /// Report serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A column required by a stage is absent from its input
    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },
    /// A column could not be read as the expected type
    #[error("Invalid data type for column '{column}': expected {expected}")]
    InvalidDataType { column: String, expected: String },
    /// An enrichment source could not be used
    #[error("Source error: {0}")]
    Source(String),
    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Wrap an IO error with the path and the reason the file was touched
    pub fn file(path: impl Into<PathBuf>, context: impl Into<String>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            context: context.into(),
            source,
        }
    }

    /// Create a missing-column error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
