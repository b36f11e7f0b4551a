//! Column names of the company table.
//!
//! Account columns carry the English names of the bundled translation
//! file; the rest are added by the pipeline stages.

/// Company display name
pub const CORP_NAME: &str = "CORP_NAME";
/// Exchange code (row key)
pub const KRX_CODE: &str = "KRX_CODE";
/// DART company id
pub const DART_CODE: &str = "DART_CODE";
/// Issued-share count
pub const ISSUED_STOCK: &str = "ISSUED_STOCK";
/// Current trading price
pub const STOCK_PRICE: &str = "STOCK_PRICE";

/// 유동자산
pub const CURRENT_ASSET: &str = "CURRENT_ASSET";
/// 비유동자산
pub const NON_CURRENT_ASSET: &str = "NON_CURRENT_ASSET";
/// 유동부채
pub const CURRENT_LIAB: &str = "CURRENT_LIAB";
/// 비유동부채
pub const NON_CURRENT_LIAB: &str = "NON_CURRENT_LIAB";
/// 영업이익
pub const OPERATING_PROFIT: &str = "OPERATING_PROFIT";

/// Net current asset value
pub const NCAV: &str = "NCAV";
/// NCAV relative to market capitalisation
pub const NCAV_SHARE: &str = "NCAV_SHARE";
/// Enterprise value per share
pub const EV_SHARE: &str = "EV_SHARE";

/// Columns holding exchange or DART codes. They must be read back as
/// strings or leading zeros are lost.
pub const CODE_COLUMNS: [&str; 2] = [KRX_CODE, DART_CODE];
