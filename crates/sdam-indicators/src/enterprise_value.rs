//! Enterprise value per share
//!
//! A back-of-the-envelope owner's value:
//!
//! ```text
//! business value = operating profit × earnings multiple
//! asset value    = current assets − current liabilities × liability buffer
//! EV per share   = (business value + asset value
//!                   + non-current assets × discount) / issued shares
//! ```
//!
//! Net working capital is added to the business value, not subtracted.

use crate::columns::{
    CURRENT_ASSET, CURRENT_LIAB, EV_SHARE, ISSUED_STOCK, NON_CURRENT_ASSET, OPERATING_PROFIT,
};
use crate::error::{IndicatorError, Result};
use crate::indicator::Indicator;
use crate::ncav::amount;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the enterprise value indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnterpriseValueConfig {
    /// Multiple applied to operating profit (default: 10)
    pub earnings_multiple: f64,
    /// Markup on current liabilities (default: 1.1)
    pub liability_buffer: f64,
    /// Fraction of non-current assets counted (default: 0.5)
    pub non_current_asset_discount: f64,
}

impl Default for EnterpriseValueConfig {
    fn default() -> Self {
        Self {
            earnings_multiple: 10.0,
            liability_buffer: 1.1,
            non_current_asset_discount: 0.5,
        }
    }
}

impl EnterpriseValueConfig {
    /// Reject non-finite or negative factors and a discount above 1.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("earnings_multiple", self.earnings_multiple),
            ("liability_buffer", self.liability_buffer),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(IndicatorError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.non_current_asset_discount) {
            return Err(IndicatorError::InvalidConfig(format!(
                "non-current asset discount must be within [0, 1], got {}",
                self.non_current_asset_discount
            )));
        }
        Ok(())
    }

    /// Per-share value of one company; 0 when no shares are issued.
    pub fn value_per_share(
        &self,
        operating_profit: i64,
        current_asset: i64,
        current_liab: i64,
        non_current_asset: i64,
        issued_stock: i64,
    ) -> f64 {
        if issued_stock == 0 {
            return 0.0;
        }
        let business = operating_profit as f64 * self.earnings_multiple;
        let assets = current_asset as f64 - current_liab as f64 * self.liability_buffer;
        let non_current = non_current_asset as f64 * self.non_current_asset_discount;
        (business + assets + non_current) / issued_stock as f64
    }
}

/// Appends `EV_SHARE`.
#[derive(Debug, Clone, Default)]
pub struct EnterpriseValueIndicator {
    config: EnterpriseValueConfig,
}

impl EnterpriseValueIndicator {
    /// Create with a custom configuration.
    pub const fn with_config(config: EnterpriseValueConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub const fn config(&self) -> &EnterpriseValueConfig {
        &self.config
    }
}

impl Indicator for EnterpriseValueIndicator {
    fn name(&self) -> &str {
        "enterprise_value"
    }

    fn required_columns(&self) -> &[&str] {
        &[
            OPERATING_PROFIT,
            CURRENT_ASSET,
            CURRENT_LIAB,
            NON_CURRENT_ASSET,
            ISSUED_STOCK,
        ]
    }

    fn output_columns(&self) -> &[&str] {
        &[EV_SHARE]
    }

    fn compute(&self, data: LazyFrame) -> Result<LazyFrame> {
        self.config.validate()?;
        let float = |name: &str| amount(name).cast(DataType::Float64);

        let business = float(OPERATING_PROFIT) * lit(self.config.earnings_multiple);
        let assets = float(CURRENT_ASSET) - float(CURRENT_LIAB) * lit(self.config.liability_buffer);
        let non_current = float(NON_CURRENT_ASSET) * lit(self.config.non_current_asset_discount);

        let ev = when(amount(ISSUED_STOCK).eq(lit(0i64)))
            .then(lit(0.0f64))
            .otherwise((business + assets + non_current) / float(ISSUED_STOCK))
            .alias(EV_SHARE);

        Ok(data.with_columns([ev]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_value_per_share() {
        let config = EnterpriseValueConfig::default();
        // (100 * 10 + (1000 - 500 * 1.1) + 400 * 0.5) / 10
        assert_relative_eq!(
            config.value_per_share(100, 1_000, 500, 400, 10),
            165.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(config.value_per_share(100, 1_000, 500, 400, 0), 0.0);
    }

    #[test]
    fn test_indicator_matches_scalar() {
        let table = df!(
            OPERATING_PROFIT => [100i64, -50],
            CURRENT_ASSET => [1_000i64, 300],
            CURRENT_LIAB => [500i64, 100],
            NON_CURRENT_ASSET => [400i64, 0],
            ISSUED_STOCK => [10i64, 0]
        )
        .unwrap();

        let out = EnterpriseValueIndicator::default().apply(table).unwrap();
        let ev = out.column(EV_SHARE).unwrap().f64().unwrap();

        assert_relative_eq!(ev.get(0).unwrap(), 165.0, epsilon = 1e-9);
        assert_relative_eq!(ev.get(1).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_discount() {
        let config = EnterpriseValueConfig {
            non_current_asset_discount: 1.5,
            ..EnterpriseValueConfig::default()
        };
        assert!(config.validate().is_err());

        let result = EnterpriseValueIndicator::with_config(config).compute(DataFrame::empty().lazy());
        assert!(matches!(result, Err(IndicatorError::InvalidConfig(_))));
    }

    #[rstest]
    #[case(f64::NAN, 1.1)]
    #[case(f64::INFINITY, 1.1)]
    #[case(10.0, f64::NEG_INFINITY)]
    #[case(-1.0, 1.1)]
    fn test_non_finite_factors_rejected(#[case] earnings_multiple: f64, #[case] liability_buffer: f64) {
        let config = EnterpriseValueConfig {
            earnings_multiple,
            liability_buffer,
            ..EnterpriseValueConfig::default()
        };
        assert!(matches!(config.validate(), Err(IndicatorError::InvalidConfig(_))));
    }
}
