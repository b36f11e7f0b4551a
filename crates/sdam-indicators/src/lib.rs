#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sdam-rs/sdam/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod columns;
pub mod enterprise_value;
pub mod error;
pub mod indicator;
pub mod ncav;
pub mod registry;
pub mod screen;

pub use enterprise_value::{EnterpriseValueConfig, EnterpriseValueIndicator};
pub use error::{IndicatorError, Result};
pub use indicator::Indicator;
pub use ncav::{NcavIndicator, net_current_asset_value, ncav_per_share};
pub use registry::{IndicatorInfo, available_indicators, build_indicator, get_indicator_info};
pub use screen::{ScreenConfig, screen_ncav};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
