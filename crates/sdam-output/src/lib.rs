#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sdam-rs/sdam/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod table;

pub use export::{ExportError, ExportFormat, Exporter};
pub use report::{RunReport, StageSummary};
pub use table::{export_table, import_table};

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
