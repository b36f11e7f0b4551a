//! Open DART disclosure API.
//!
//! This module provides access to the Korean Financial Supervisory
//! Service's Open DART API:
//! - Company directory (DART id, name and exchange code of every company)
//! - Single-company financial statements
//! - Issued-share counts
//!
//! # Example
//!
//! ```no_run
//! use sdam_data::dart::{DartClient, DocType, FiscalPeriod, extract_accounts};
//! use std::collections::HashSet;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DartClient::new("your-crtfc-key")?;
//!     let directory = client.fetch_corp_directory().await?;
//!     let samsung = directory.find_by_name("삼성전자").expect("listed");
//!
//!     let period = FiscalPeriod::new(2019, 1)?;
//!     let statement = client
//!         .fetch_statement(&samsung.corp_code, period, DocType::Cfs)
//!         .await?;
//!
//!     if let Some(lines) = statement.into_data() {
//!         let wanted: HashSet<String> = ["유동자산".to_string()].into();
//!         println!("{:?}", extract_accounts(&lines, &wanted));
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod corp_code;
pub mod report_code;
pub mod shares;
pub mod statements;

pub use client::{DART_BASE_URL, DartClient};
pub use corp_code::{CorpDirectory, CorpEntry};
pub use report_code::{FiscalPeriod, Quarter, ReportCodes};
pub use shares::{ShareCountEntry, parse_share_count};
pub use statements::{AccountLine, AssetMap, DocType, extract_accounts, parse_amount};
