//! Indicator Registry
//!
//! Metadata for every available indicator, and construction by name.

use crate::columns::{
    CURRENT_ASSET, CURRENT_LIAB, EV_SHARE, ISSUED_STOCK, NCAV, NCAV_SHARE, NON_CURRENT_ASSET,
    NON_CURRENT_LIAB, OPERATING_PROFIT, STOCK_PRICE,
};
use crate::enterprise_value::{EnterpriseValueConfig, EnterpriseValueIndicator};
use crate::error::{IndicatorError, Result};
use crate::indicator::Indicator;
use crate::ncav::NcavIndicator;

/// Indicator metadata
#[derive(Debug, Clone)]
pub struct IndicatorInfo {
    /// Indicator name (unique identifier)
    pub name: &'static str,
    /// Brief description of what the indicator measures
    pub description: &'static str,
    /// Required column names in input data
    pub required_columns: &'static [&'static str],
    /// Columns appended to the table
    pub output_columns: &'static [&'static str],
}

/// Get all available indicator info
pub fn available_indicators() -> Vec<IndicatorInfo> {
    vec![
        IndicatorInfo {
            name: "ncav",
            description: "Net current asset value and its ratio to market capitalisation",
            required_columns: &[
                CURRENT_ASSET,
                CURRENT_LIAB,
                NON_CURRENT_LIAB,
                ISSUED_STOCK,
                STOCK_PRICE,
            ],
            output_columns: &[NCAV, NCAV_SHARE],
        },
        IndicatorInfo {
            name: "enterprise_value",
            description: "Per-share value from operating profit, working capital and fixed assets",
            required_columns: &[
                OPERATING_PROFIT,
                CURRENT_ASSET,
                CURRENT_LIAB,
                NON_CURRENT_ASSET,
                ISSUED_STOCK,
            ],
            output_columns: &[EV_SHARE],
        },
    ]
}

/// Get indicator info by name
pub fn get_indicator_info(name: &str) -> Option<IndicatorInfo> {
    available_indicators().into_iter().find(|i| i.name == name)
}

/// Build an indicator by name.
pub fn build_indicator(
    name: &str,
    enterprise_value: EnterpriseValueConfig,
) -> Result<Box<dyn Indicator>> {
    match name {
        "ncav" => Ok(Box::new(NcavIndicator)),
        "enterprise_value" => Ok(Box::new(EnterpriseValueIndicator::with_config(
            enterprise_value,
        ))),
        _ => Err(IndicatorError::UnknownIndicator(name.to_string())),
    }
}
