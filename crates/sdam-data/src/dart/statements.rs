//! Single-company financial statements and account extraction.

use crate::dart::client::DartClient;
use crate::dart::report_code::FiscalPeriod;
use crate::error::{DataError, Result};
use crate::fetch::{Collected, Fetched};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Account name to current-period amount.
pub type AssetMap = HashMap<String, i64>;

/// Statement document served by the DART client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    /// Full consolidated financial statement (`fnlttSinglAcntAll`).
    #[default]
    #[serde(rename = "CFS")]
    Cfs,
    /// Key accounts of the income statement and balance sheet (`fnlttSinglAcnt`).
    #[serde(rename = "IS")]
    Is,
}

impl DocType {
    /// Short code used on the command line and in `fs_div`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Cfs => "CFS",
            Self::Is => "IS",
        }
    }

    const fn endpoint(self) -> &'static str {
        match self {
            Self::Cfs => "fnlttSinglAcntAll.json",
            Self::Is => "fnlttSinglAcnt.json",
        }
    }
}

impl FromStr for DocType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CFS" => Ok(Self::Cfs),
            "IS" => Ok(Self::Is),
            _ => Err(DataError::UnsupportedDocType(s.to_string())),
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One account line of a DART statement.
///
/// Only `account_nm` and `thstrm_amount` are used downstream; the rest is
/// descriptive metadata kept for callers that want it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountLine {
    /// Receipt number of the filing.
    pub rcept_no: Option<String>,
    /// Report code.
    pub reprt_code: Option<String>,
    /// Business year.
    pub bsns_year: Option<String>,
    /// DART company id.
    pub corp_code: Option<String>,
    /// Statement division (BS, IS, CIS, CF, SCE).
    pub sj_div: Option<String>,
    /// Statement name.
    pub sj_nm: Option<String>,
    /// XBRL account id.
    pub account_id: Option<String>,
    /// Account name (Korean).
    pub account_nm: String,
    /// Current-period term name.
    pub thstrm_nm: Option<String>,
    /// Current-period amount as published (string-encoded integer).
    pub thstrm_amount: Option<String>,
    /// Prior-period term name.
    pub frmtrm_nm: Option<String>,
    /// Prior-period amount.
    pub frmtrm_amount: Option<String>,
    /// Display order.
    pub ord: Option<String>,
    /// Currency.
    pub currency: Option<String>,
}

impl AccountLine {
    /// Build a line carrying only a name and a current amount.
    pub fn new(account_nm: impl Into<String>, thstrm_amount: impl Into<String>) -> Self {
        Self {
            account_nm: account_nm.into(),
            thstrm_amount: Some(thstrm_amount.into()),
            ..Self::default()
        }
    }

    /// Current-period amount parsed as an integer.
    ///
    /// Thousands separators are stripped; blank values and the "-"
    /// placeholder yield `None`.
    pub fn current_amount(&self) -> Option<i64> {
        self.thstrm_amount.as_deref().and_then(parse_amount)
    }
}

/// Parse a DART amount string.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}

/// Pick the requested accounts out of a statement.
///
/// The result holds only names present in both `lines` and `names`.
/// Amounts that cannot be parsed are left out. When a name appears more
/// than once, the later line wins.
pub fn extract_accounts(lines: &[AccountLine], names: &HashSet<String>) -> AssetMap {
    let mut assets = AssetMap::new();
    for line in lines {
        if !names.contains(&line.account_nm) {
            continue;
        }
        match line.current_amount() {
            Some(amount) => {
                assets.insert(line.account_nm.clone(), amount);
            }
            None => debug!(
                account = %line.account_nm,
                raw = ?line.thstrm_amount,
                "skipping account without a numeric amount"
            ),
        }
    }
    assets
}

impl DartClient {
    /// Fetch the full statement of one company for one period.
    ///
    /// # Arguments
    /// * `corp_code` - DART company id
    /// * `period` - business year and quarter
    /// * `doc_type` - statement document to query
    ///
    /// # Returns
    /// `Fetched::NoData` when DART reports no filing (status `013`, common:
    /// many companies have not filed for a given quarter). Any other
    /// non-normal status is a `DataError::DartApi`.
    pub async fn fetch_statement(
        &self,
        corp_code: &str,
        period: FiscalPeriod,
        doc_type: DocType,
    ) -> Result<Fetched<Vec<AccountLine>>> {
        if corp_code.is_empty() {
            return Err(DataError::InvalidSymbol("Empty corp_code".to_string()));
        }

        let report_code = self.report_codes().code_for(period.quarter)?;
        let mut params = vec![
            ("corp_code", corp_code.to_string()),
            ("bsns_year", period.year.to_string()),
            ("reprt_code", report_code.to_string()),
        ];
        if doc_type == DocType::Cfs {
            params.push(("fs_div", doc_type.code().to_string()));
        }

        debug!(corp_code, %period, %doc_type, "fetching statement");
        let envelope = self
            .get_json::<AccountLine>(doc_type.endpoint(), &params)
            .await?;

        match envelope.into_fetched()? {
            Fetched::NoData { status, message } => {
                debug!(corp_code, %status, %message, "no statement");
                Ok(Fetched::NoData { status, message })
            }
            data => Ok(data),
        }
    }

    /// Fetch a statement, degrading every soft failure to an empty list.
    ///
    /// Transport and parse failures are followed by the configured failure
    /// delay so a batch loop does not hammer a struggling upstream. The
    /// request is not retried.
    pub async fn statement_or_empty(
        &self,
        corp_code: &str,
        period: FiscalPeriod,
        doc_type: DocType,
    ) -> Result<Collected<Vec<AccountLine>>> {
        match self.fetch_statement(corp_code, period, doc_type).await {
            Ok(Fetched::Data(lines)) => Ok(Collected::found(lines)),
            Ok(Fetched::NoData { .. }) => Ok(Collected::no_data(Vec::new())),
            Err(e @ DataError::UnsupportedQuarter(_)) => Err(e),
            Err(e) => {
                debug!(corp_code, error = %e, "statement request failed");
                self.back_off().await;
                Ok(Collected::failed(Vec::new()))
            }
        }
    }
}
