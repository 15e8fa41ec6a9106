//! Error types for vest-valuator

use thiserror::Error;

/// Main error type for vest-valuator
#[derive(Error, Debug)]
pub enum VestError {
    /// The CSV header has neither a `Date` nor a `Vest Date` column
    #[error("CSV has neither a 'Date' nor a 'Vest Date' column")]
    MissingDateColumn,

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for vest-valuator operations
pub type Result<T> = std::result::Result<T, VestError>;
