//! KRX listed-securities reference file.
//!
//! The file is the "전종목 기본정보" export from the KRX data portal: a
//! CP949 CSV with (among others) the columns `단축코드` (short exchange
//! code) and `시장구분` (market segment).

use crate::error::Result;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Column holding the market segment.
pub const MARKET_COLUMN: &str = "시장구분";

/// Column holding the short exchange code.
pub const CODE_COLUMN: &str = "단축코드";

/// Width of a numeric exchange code.
const CODE_WIDTH: usize = 6;

/// Normalize an exchange code.
///
/// Spreadsheet round trips drop leading zeros from numeric codes, so
/// purely numeric codes are zero-padded to six digits. Codes containing a
/// letter pass through unchanged.
pub fn normalize_stock_code(code: &str) -> String {
    let code = code.trim();
    if code.chars().any(char::is_alphabetic) {
        return code.to_string();
    }
    match code.parse::<u64>() {
        Ok(n) => format!("{:0width$}", n, width = CODE_WIDTH),
        Err(_) => code.to_string(),
    }
}

/// Exchange codes of the securities listed on the selected markets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListedSecurities {
    codes: BTreeSet<String>,
}

impl ListedSecurities {
    /// Build from already-normalized codes.
    pub fn new(codes: impl IntoIterator<Item = String>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    /// Read the reference file, keeping rows of the given markets.
    ///
    /// An unreadable file is an error; a file without the expected columns
    /// yields an empty set.
    pub fn from_path<S: AsRef<str>>(path: &Path, markets: &[S]) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let listing = Self::from_bytes(&bytes, markets);
        info!(
            path = %path.display(),
            securities = listing.len(),
            "loaded listed securities"
        );
        Ok(listing)
    }

    /// Decode (CP949, or UTF-8 with a BOM) and parse the reference file.
    pub fn from_bytes<S: AsRef<str>>(bytes: &[u8], markets: &[S]) -> Self {
        let (text, encoding, had_errors) = encoding_rs::EUC_KR.decode(bytes);
        if had_errors {
            warn!(encoding = encoding.name(), "listing file contains undecodable bytes");
        }
        Self::from_csv(&text, markets)
    }

    /// Parse already-decoded CSV text.
    pub fn from_csv<S: AsRef<str>>(text: &str, markets: &[S]) -> Self {
        let markets: HashSet<&str> = markets.iter().map(AsRef::as_ref).collect();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let Ok(headers) = reader.headers().cloned() else {
            warn!("listing file has no readable header");
            return Self::default();
        };
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}') == name)
        };
        let (Some(market_idx), Some(code_idx)) = (position(MARKET_COLUMN), position(CODE_COLUMN))
        else {
            warn!(
                "listing file lacks the {} / {} columns",
                MARKET_COLUMN, CODE_COLUMN
            );
            return Self::default();
        };

        let mut codes = BTreeSet::new();
        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    debug!(line, error = %e, "skipping malformed listing row");
                    continue;
                }
            };
            let (Some(market), Some(code)) = (record.get(market_idx), record.get(code_idx)) else {
                continue;
            };
            if markets.contains(market.trim()) && !code.trim().is_empty() {
                codes.insert(normalize_stock_code(code));
            }
        }

        Self { codes }
    }

    /// Returns true if the exchange code is listed.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Number of listed securities.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if nothing is listed.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Listed exchange codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}
