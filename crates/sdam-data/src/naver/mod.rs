//! Naver Finance data providers.

pub mod price;

pub use price::{
    LANDING_PAGE_TITLE, NAVER_FINANCE_BASE_URL, NaverPriceScraper, decode_page, parse_quote_page,
};
