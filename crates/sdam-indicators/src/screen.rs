//! NCAV screen: rank the companies trading furthest below their net
//! current asset value.

use crate::columns::{NCAV_SHARE, STOCK_PRICE};
use crate::error::{IndicatorError, Result};
use crate::ncav::amount;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Screen parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Minimum `NCAV_SHARE` kept (default: 1.5, price at most two thirds of NCAV)
    pub min_ratio: f64,
    /// Keep at most this many rows
    pub top: Option<usize>,
}

impl ScreenConfig {
    /// Reject a non-finite or negative `min_ratio`.
    pub fn validate(&self) -> Result<()> {
        if !self.min_ratio.is_finite() || self.min_ratio < 0.0 {
            return Err(IndicatorError::InvalidConfig(format!(
                "min_ratio must be finite and non-negative, got {}",
                self.min_ratio
            )));
        }
        Ok(())
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            min_ratio: 1.5,
            top: None,
        }
    }
}

/// Filter and rank an indicated table.
///
/// Rows without a price are dropped; the rest are kept when `NCAV_SHARE`
/// reaches `min_ratio` and sorted by it, highest first.
pub fn screen_ncav(table: &DataFrame, config: ScreenConfig) -> Result<DataFrame> {
    for column in [STOCK_PRICE, NCAV_SHARE] {
        if table.get_column_index(column).is_none() {
            return Err(IndicatorError::MissingColumn {
                indicator: "ncav_screen".to_string(),
                column: column.to_string(),
            });
        }
    }
    config.validate()?;

    let mut screened = table
        .clone()
        .lazy()
        .filter(amount(STOCK_PRICE).gt(lit(0i64)))
        .filter(col(NCAV_SHARE).gt_eq(lit(config.min_ratio)))
        .sort(
            [NCAV_SHARE],
            SortMultipleOptions::default().with_order_descending(true),
        );
    if let Some(top) = config.top {
        screened = screened.limit(IdxSize::try_from(top).unwrap_or(IdxSize::MAX));
    }

    let screened = screened.collect()?;
    info!(
        candidates = table.height(),
        selected = screened.height(),
        min_ratio = config.min_ratio,
        "NCAV screen complete"
    );
    Ok(screened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table() -> DataFrame {
        df!(
            "KRX_CODE" => ["000001", "000002", "000003", "000004", "000005"],
            STOCK_PRICE => [100i64, 0, 50, 80, 10],
            NCAV_SHARE => [2.0f64, 0.0, 3.5, 0.4, 1.5]
        )
        .unwrap()
    }

    fn codes(df: &DataFrame) -> Vec<String> {
        df.column("KRX_CODE")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_default_screen() {
        let out = screen_ncav(&table(), ScreenConfig::default()).unwrap();
        assert_eq!(codes(&out), vec!["000003", "000001", "000005"]);
    }

    #[rstest]
    #[case(Some(1), vec!["000003"])]
    #[case(Some(10), vec!["000003", "000001", "000005"])]
    #[case(Some(0), vec![])]
    fn test_top(#[case] top: Option<usize>, #[case] expected: Vec<&str>) {
        let config = ScreenConfig {
            top,
            ..ScreenConfig::default()
        };
        let out = screen_ncav(&table(), config).unwrap();
        assert_eq!(codes(&out), expected);
    }

    #[test]
    fn test_zero_price_dropped_even_at_zero_threshold() {
        let config = ScreenConfig {
            min_ratio: 0.0,
            top: None,
        };
        let out = screen_ncav(&table(), config).unwrap();
        assert_eq!(out.height(), 4);
        assert!(!codes(&out).contains(&"000002".to_string()));
    }

    #[test]
    fn test_requires_indicated_table() {
        let table = table().drop(NCAV_SHARE).unwrap();
        assert!(matches!(
            screen_ncav(&table, ScreenConfig::default()),
            Err(IndicatorError::MissingColumn { .. })
        ));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_min_ratio(#[case] min_ratio: f64) {
        let config = ScreenConfig {
            min_ratio,
            top: None,
        };
        assert!(config.validate().is_err());
        assert!(matches!(
            screen_ncav(&table(), config),
            Err(IndicatorError::InvalidConfig(_))
        ));
    }
}
