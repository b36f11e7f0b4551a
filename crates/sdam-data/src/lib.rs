#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sdam-rs/sdam/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dart;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod naver;
mod rate_limit;
pub mod translation;

pub use error::{DataError, Result};
pub use fetch::{Collected, FetchOutcome, FetchTally, Fetched};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
