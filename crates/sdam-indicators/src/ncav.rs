//! Net Current Asset Value
//!
//! NCAV is current assets minus all liabilities, with total liabilities
//! approximated by current plus non-current liabilities. `NCAV_SHARE`
//! relates it to market capitalisation (price × issued shares); a value
//! above 1 means the company trades below its liquidation value.

use crate::columns::{
    CURRENT_ASSET, CURRENT_LIAB, ISSUED_STOCK, NCAV, NCAV_SHARE, NON_CURRENT_LIAB, STOCK_PRICE,
};
use crate::error::Result;
use crate::indicator::Indicator;
use polars::prelude::*;
use tracing::debug;

/// NCAV of one company.
pub const fn net_current_asset_value(
    current_asset: i64,
    current_liab: i64,
    non_current_liab: i64,
) -> i64 {
    current_asset - (current_liab + non_current_liab)
}

/// NCAV relative to market capitalisation.
///
/// Returns 0 when either the price or the share count is 0: the ratio is
/// undefined there, which is not an error.
pub fn ncav_per_share(ncav: i64, issued_stock: i64, stock_price: i64) -> f64 {
    if stock_price == 0 || issued_stock == 0 {
        return 0.0;
    }
    ncav as f64 / (stock_price as f64 * issued_stock as f64)
}

/// Integer input column; nulls count as 0.
pub(crate) fn amount(name: &str) -> Expr {
    col(name).cast(DataType::Int64).fill_null(lit(0i64))
}

/// Appends `NCAV` and `NCAV_SHARE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NcavIndicator;

impl Indicator for NcavIndicator {
    fn name(&self) -> &str {
        "ncav"
    }

    fn required_columns(&self) -> &[&str] {
        &[
            CURRENT_ASSET,
            CURRENT_LIAB,
            NON_CURRENT_LIAB,
            ISSUED_STOCK,
            STOCK_PRICE,
        ]
    }

    fn output_columns(&self) -> &[&str] {
        &[NCAV, NCAV_SHARE]
    }

    fn compute(&self, data: LazyFrame) -> Result<LazyFrame> {
        debug!("computing NCAV");
        let ncav = (amount(CURRENT_ASSET) - (amount(CURRENT_LIAB) + amount(NON_CURRENT_LIAB)))
            .alias(NCAV);

        let market_cap =
            amount(STOCK_PRICE).cast(DataType::Float64) * amount(ISSUED_STOCK).cast(DataType::Float64);
        let ratio = when(
            amount(STOCK_PRICE)
                .eq(lit(0i64))
                .or(amount(ISSUED_STOCK).eq(lit(0i64))),
        )
        .then(lit(0.0f64))
        .otherwise(col(NCAV).cast(DataType::Float64) / market_cap)
        .alias(NCAV_SHARE);

        Ok(data.with_columns([ncav]).with_columns([ratio]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn table() -> DataFrame {
        df!(
            "KRX_CODE" => ["000001", "000002", "000003", "000004"],
            CURRENT_ASSET => [1_000i64, 500, 100, 2_000],
            CURRENT_LIAB => [200i64, 400, 300, 100],
            NON_CURRENT_LIAB => [300i64, 0, 100, 100],
            ISSUED_STOCK => [10i64, 10, 0, 100],
            STOCK_PRICE => [10i64, 0, 50, 9]
        )
        .unwrap()
    }

    #[test]
    fn test_net_current_asset_value() {
        assert_eq!(net_current_asset_value(1_000, 200, 300), 500);
        assert_eq!(net_current_asset_value(100, 300, 100), -300);
    }

    #[rstest]
    #[case(500, 10, 10, 5.0)]
    #[case(500, 0, 10, 0.0)]
    #[case(500, 10, 0, 0.0)]
    #[case(-300, 0, 50, 0.0)]
    #[case(-300, 10, 0, 0.0)]
    #[case(-300, 10, 10, -3.0)]
    fn test_ncav_per_share(
        #[case] ncav: i64,
        #[case] issued: i64,
        #[case] price: i64,
        #[case] expected: f64,
    ) {
        assert_relative_eq!(ncav_per_share(ncav, issued, price), expected);
    }

    #[test]
    fn test_indicator_columns() {
        let out = NcavIndicator.apply(table()).unwrap();

        let ncav: Vec<Option<i64>> = out.column(NCAV).unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ncav, vec![Some(500), Some(100), Some(-300), Some(1_800)]);

        let ratio = out.column(NCAV_SHARE).unwrap().f64().unwrap();
        assert_relative_eq!(ratio.get(0).unwrap(), 5.0);
        assert_relative_eq!(ratio.get(1).unwrap(), 0.0);
        assert_relative_eq!(ratio.get(2).unwrap(), 0.0);
        assert_relative_eq!(ratio.get(3).unwrap(), 2.0);
    }

    #[test]
    fn test_input_columns_preserved() {
        let out = NcavIndicator.apply(table()).unwrap();
        assert_eq!(out.width(), 8);
        assert_eq!(out.height(), 4);
        assert!(out.column("KRX_CODE").is_ok());
    }

    #[test]
    fn test_missing_column() {
        let table = table().drop(STOCK_PRICE).unwrap();
        let result = NcavIndicator.apply(table);
        assert!(matches!(
            result,
            Err(IndicatorError::MissingColumn { column, .. }) if column == STOCK_PRICE
        ));
    }
}
