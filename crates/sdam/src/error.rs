//! Error types for the SDAM pipeline

use polars::prelude::PolarsError;
use sdam_data::DataError;
use sdam_indicators::IndicatorError;
use sdam_output::ExportError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, SdamError>;

/// Errors that abort a pipeline stage
#[derive(Debug, Error)]
pub enum SdamError {
    /// Upstream access failed fatally (company directory, unsupported period)
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Indicator computation failed
    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    /// Writing or reading a table failed
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// DataFrame operation failed
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Configuration file could not be read
    #[error("Cannot read configuration {path}: {source}")]
    ConfigRead {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for the expected schema
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Configuration values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input table lacks a required column
    #[error("Missing column: {0}")]
    MissingColumn(String),
}
