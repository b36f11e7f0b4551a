//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// ZIP archive error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// DART API error
    #[error("DART API error: {0}")]
    DartApi(String),

    /// Statement document type not served by the DART client
    #[error("Unsupported statement document type: {0}")]
    UnsupportedDocType(String),

    /// Quarter outside 1..=4 or without a configured report code
    #[error("Unsupported fiscal quarter: {0}")]
    UnsupportedQuarter(u8),

    /// Company not found in the DART directory
    #[error("Company not found in DART directory: {0}")]
    CompanyNotFound(String),

    /// Quote page redirected to the portal landing page
    #[error("Ticker not found on quote page: {0}")]
    TickerNotFound(String),

    /// Invalid exchange code
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
}

impl From<quick_xml::Error> for DataError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}
