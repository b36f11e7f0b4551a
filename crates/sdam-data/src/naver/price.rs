//! Current trading price from the Naver Finance quote page.
//!
//! There is no API behind this: the price is read out of the HTML of
//! `item/main.naver`. Everything that depends on the page layout lives in
//! [`parse_quote_page`], so a markup change touches one function.

use crate::error::{DataError, Result};
use crate::fetch::Collected;
use crate::rate_limit::RateLimiter;
use encoding_rs::Encoding;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Naver Finance base URL
pub const NAVER_FINANCE_BASE_URL: &str = "https://finance.naver.com";

/// Title of the portal landing page. Unknown codes are silently
/// redirected there instead of answering with an error status.
pub const LANDING_PAGE_TITLE: &str = "네이버 :: 세상의 모든 지식, 네이버";

/// Paragraph holding today's price. The numeral is split across child
/// spans, the first of which is a screen-reader copy of the whole value.
const PRICE_SELECTOR: &str = "p.no_today span";

/// Browser-like user agent; the default reqwest agent gets a stripped page.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::Parse(format!("Invalid selector {}: {}", css, e)))
}

/// Extract the current price from a decoded quote page.
///
/// # Errors
/// * `DataError::TickerNotFound` - the page is the portal landing page
/// * `DataError::Parse` - the price markup is missing or not numeric
pub fn parse_quote_page(code: &str, html: &str) -> Result<i64> {
    let document = Html::parse_document(html);

    let title: String = document
        .select(&selector("title")?)
        .next()
        .map(|t| t.text().collect())
        .unwrap_or_default();
    if title.trim() == LANDING_PAGE_TITLE {
        return Err(DataError::TickerNotFound(code.to_string()));
    }

    let digits: String = document
        .select(&selector(PRICE_SELECTOR)?)
        .skip(1)
        .flat_map(|span| span.text())
        .collect::<String>()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if digits.is_empty() {
        return Err(DataError::Parse(format!("No price markup for {}", code)));
    }

    digits
        .parse()
        .map_err(|_| DataError::Parse(format!("Invalid price {:?} for {}", digits, code)))
}

/// Decode a quote page body.
///
/// Uses the charset announced in `Content-Type` and falls back to EUC-KR
/// (CP949), the encoding the quote pages have always been served in.
pub fn decode_page(content_type: Option<&str>, body: &[u8]) -> String {
    let encoding = content_type
        .and_then(|ct| {
            ct.split(';').find_map(|part| {
                let part = part.trim();
                part.get(..8)
                    .filter(|p| p.eq_ignore_ascii_case("charset="))
                    .map(|_| part[8..].trim_matches('"'))
            })
        })
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::EUC_KR);

    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = encoding.name(), "quote page contains undecodable bytes");
    }
    text.into_owned()
}

/// Naver Finance price scraper with request spacing.
///
/// The spacing is shared by every concurrent `fetch_price` call on one
/// scraper, so the request rate stays at one per `request_delay`
/// whatever the caller's fan-out.
pub struct NaverPriceScraper {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    base_url: String,
    request_delay: Duration,
}

impl std::fmt::Debug for NaverPriceScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverPriceScraper")
            .field("base_url", &self.base_url)
            .field("request_delay", &self.request_delay)
            .finish_non_exhaustive()
    }
}

impl NaverPriceScraper {
    /// Create a scraper with the default request spacing (200ms).
    pub fn new() -> Result<Self> {
        Self::with_delay(Duration::from_millis(200))
    }

    /// Create a scraper with custom request spacing.
    pub fn with_delay(request_delay: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(request_delay))),
            base_url: NAVER_FINANCE_BASE_URL.to_string(),
            request_delay,
        })
    }

    /// Point the scraper at another host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Minimum spacing between two requests.
    pub const fn request_delay(&self) -> Duration {
        self.request_delay
    }

    /// Fetch the current price of one exchange code.
    pub async fn fetch_price(&self, code: &str) -> Result<i64> {
        if code.trim().is_empty() {
            return Err(DataError::InvalidSymbol("Empty exchange code".to_string()));
        }

        self.rate_limiter.lock().await.wait().await;
        debug!(code, "fetching quote page");
        let url = format!("{}/item/main.naver", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("code", code)])
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Quote page for {} returned HTTP {}",
                code,
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(DataError::Network)?;
        let html = decode_page(content_type.as_deref(), &body);
        parse_quote_page(code, &html)
    }

    /// Fetch the current price, degrading every failure to 0.
    ///
    /// A missing price must not abort a batch: the failure is logged and
    /// reported through the returned outcome.
    pub async fn price_or_zero(&self, code: &str) -> Collected<i64> {
        match self.fetch_price(code).await {
            Ok(price) => Collected::found(price),
            Err(DataError::TickerNotFound(_)) => {
                warn!(code, "ticker was not found on the quote page");
                Collected::no_data(0)
            }
            Err(e) => {
                warn!(code, error = %e, "could not read price");
                Collected::failed(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const QUOTE_PAGE: &str = r#"<html><head><title>삼성전자 : 네이버 증권</title></head>
<body><div class="rate_info"><div class="today">
<p class="no_today">
  <em class="no_down">
    <span class="blind">72,300</span>
    <span class="no7">7</span><span class="no2">2</span><span class="shim">,</span><span class="no3">3</span><span class="no0">0</span><span class="no0">0</span>
  </em>
</p>
</div></div></body></html>"#;

    const LANDING_PAGE: &str =
        "<html><head><title>네이버 :: 세상의 모든 지식, 네이버</title></head><body></body></html>";

    #[test]
    fn test_parse_quote_page() {
        assert_eq!(parse_quote_page("005930", QUOTE_PAGE).unwrap(), 72_300);
    }

    #[test]
    fn test_parse_landing_page() {
        assert!(matches!(
            parse_quote_page("999999", LANDING_PAGE),
            Err(DataError::TickerNotFound(code)) if code == "999999"
        ));
    }

    #[test]
    fn test_parse_missing_markup() {
        let html = "<html><head><title>삼성전자 : 네이버 증권</title></head><body></body></html>";
        assert!(matches!(
            parse_quote_page("005930", html),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_non_numeric_markup() {
        let html = r#"<p class="no_today"><span class="blind">N/A</span><span>N</span><span>A</span></p>"#;
        assert!(matches!(
            parse_quote_page("005930", html),
            Err(DataError::Parse(_))
        ));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("text/html;charset=EUC-KR"))]
    #[case(Some("text/html; charset=\"euc-kr\""))]
    fn test_decode_euc_kr(#[case] content_type: Option<&str>) {
        let (bytes, _, _) = encoding_rs::EUC_KR.encode(QUOTE_PAGE);
        assert_eq!(decode_page(content_type, &bytes), QUOTE_PAGE);
    }

    #[test]
    fn test_decode_utf8_header() {
        let decoded = decode_page(Some("text/html; Charset=UTF-8"), LANDING_PAGE.as_bytes());
        assert_eq!(decoded, LANDING_PAGE);
    }

    #[tokio::test]
    async fn test_fetch_price_empty_code() {
        let scraper = NaverPriceScraper::new().unwrap();
        assert!(matches!(
            scraper.fetch_price("").await,
            Err(DataError::InvalidSymbol(_))
        ));
    }
}
