#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sdam-rs/sdam/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod annotate;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod schema;
pub mod table;

// Re-export main types from sub-crates
pub use sdam_data as data;
pub use sdam_indicators as indicators;
pub use sdam_output as output;

pub use annotate::{AnnotatedTable, PriceAnnotator};
pub use config::SdamConfig;
pub use error::{Result, SdamError};
pub use pipeline::Pipeline;
pub use registry::{CompanyRecord, CompanyRegistry};
pub use table::{CollectedTable, CompanyRow, TableBuilder, assemble_table};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
