//! Table schema and output file names.

pub use sdam_indicators::columns::*;

/// Accounts collected when none are configured.
pub const DEFAULT_ACCOUNTS: [&str; 4] = ["유동자산", "유동부채", "비유동자산", "비유동부채"];

/// Table written by the collect stage
pub const FINANCE_TABLE: &str = "finance_table.csv";
/// Table written by the annotate stage
pub const PRICE_ANNOTATED_TABLE: &str = "price_annotated_table.csv";
/// Table written by the indicate stage
pub const NCAV_TABLE: &str = "ncav_table.csv";
/// Table written by the screen
pub const SCREEN_TABLE: &str = "ncav_screen.csv";
/// Per-run report
pub const RUN_REPORT: &str = "run_report.json";
