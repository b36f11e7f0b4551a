//! Issued-share counts (`stockTotqySttus`).

use crate::dart::client::{DartClient, STATUS_OK};
use crate::dart::report_code::FiscalPeriod;
use crate::error::{DataError, Result};
use crate::fetch::{Collected, Fetched};
use serde::Deserialize;
use tracing::debug;

/// One row of the share-count disclosure.
///
/// Counts are published as comma-grouped strings, or "-" when the filer
/// left them out. Some companies omit the table from quarterly reports
/// altogether.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShareCountEntry {
    /// Share class (common, preferred, total).
    pub se: Option<String>,
    /// Total shares authorised.
    pub isu_stock_totqy: Option<String>,
    /// Total shares issued so far.
    pub now_to_isu_stock_totqy: Option<String>,
    /// Total shares retired so far.
    pub now_to_dcrs_stock_totqy: Option<String>,
    /// Shares outstanding (issued minus retired).
    pub istc_totqy: Option<String>,
    /// Treasury shares.
    pub tesstk_co: Option<String>,
    /// Floating shares.
    pub distb_stock_co: Option<String>,
}

/// Parse a share count, mapping the "-" placeholder to `None`.
pub fn parse_share_count(raw: &str) -> Result<Option<i64>> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return Ok(None);
    }
    cleaned
        .parse()
        .map(Some)
        .map_err(|_| DataError::Parse(format!("Invalid share count: {:?}", raw)))
}

impl DartClient {
    /// Fetch the number of outstanding shares reported for one period.
    ///
    /// Reads `istc_totqy` of the first entry. Returns `Fetched::NoData`
    /// when DART reports no filing or the value is not disclosed; other
    /// error statuses are a `DataError::DartApi`.
    pub async fn fetch_issued_shares(
        &self,
        corp_code: &str,
        period: FiscalPeriod,
    ) -> Result<Fetched<i64>> {
        if corp_code.is_empty() {
            return Err(DataError::InvalidSymbol("Empty corp_code".to_string()));
        }

        let report_code = self.report_codes().code_for(period.quarter)?;
        let params = [
            ("corp_code", corp_code.to_string()),
            ("bsns_year", period.year.to_string()),
            ("reprt_code", report_code.to_string()),
        ];

        let envelope = self
            .get_json::<ShareCountEntry>("stockTotqySttus.json", &params)
            .await?;

        let list = match envelope.into_fetched()? {
            Fetched::Data(list) => list,
            Fetched::NoData { status, message } => {
                debug!(corp_code, %status, %message, "no share-count filing");
                return Ok(Fetched::NoData { status, message });
            }
        };

        let raw = list
            .first()
            .and_then(|entry| entry.istc_totqy.as_deref())
            .unwrap_or("-");

        match parse_share_count(raw)? {
            Some(count) => {
                debug!(corp_code, count, "issued shares");
                Ok(Fetched::Data(count))
            }
            None => Ok(Fetched::NoData {
                status: STATUS_OK.to_string(),
                message: "share count not disclosed".to_string(),
            }),
        }
    }

    /// Fetch the issued-share count, degrading every soft failure to 0.
    pub async fn issued_shares_or_zero(
        &self,
        corp_code: &str,
        period: FiscalPeriod,
    ) -> Result<Collected<i64>> {
        match self.fetch_issued_shares(corp_code, period).await {
            Ok(Fetched::Data(count)) => Ok(Collected::found(count)),
            Ok(Fetched::NoData { .. }) => Ok(Collected::no_data(0)),
            Err(e @ DataError::UnsupportedQuarter(_)) => Err(e),
            Err(e) => {
                debug!(corp_code, error = %e, "share-count request failed");
                self.back_off().await;
                Ok(Collected::failed(0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("18,870,000", Some(18_870_000))]
    #[case("5969782550", Some(5_969_782_550))]
    #[case("-", None)]
    #[case("", None)]
    fn test_parse_share_count(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_share_count(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_share_count_garbage() {
        assert!(matches!(parse_share_count("abc"), Err(DataError::Parse(_))));
    }
}
