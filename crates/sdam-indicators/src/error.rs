//! Error types for indicator computation

use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for indicator operations
pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Errors that can occur while computing indicators
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// DataFrame operation failed
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Input table lacks a column the indicator reads
    #[error("Missing column '{column}' required by {indicator}")]
    MissingColumn {
        /// Indicator that needed the column
        indicator: String,
        /// Name of the missing column
        column: String,
    },

    /// No indicator is registered under this name
    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Invalid indicator or screen configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
