//! Error types for the stock_forecast crate

use thiserror::Error;

/// Custom error types for the stock_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// An upstream row carried an unparsable date or price
    #[error("Data format error at row {row}: {detail}")]
    DataFormat { row: usize, detail: String },

    /// The requested lag count does not fit in the series
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// A split policy would leave the train or test set empty
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The underlying numerical fit did not converge
    #[error("Fit failed to converge: {0}")]
    FitConvergence(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
