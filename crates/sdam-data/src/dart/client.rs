//! Open DART API client with rate limiting.

use crate::dart::report_code::ReportCodes;
use crate::error::{DataError, Result};
use crate::fetch::Fetched;
use crate::rate_limit::RateLimiter;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Open DART API base URL
pub const DART_BASE_URL: &str = "https://opendart.fss.or.kr";

/// Default spacing between requests. DART blocks keys that exceed
/// roughly 1,000 requests per minute.
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(60);

/// Default pause after a failed request before the caller moves on.
const DEFAULT_FAILURE_DELAY: Duration = Duration::from_secs(3);

/// Status code DART uses for a normal reply.
pub(crate) const STATUS_OK: &str = "000";

/// Status message DART uses for a normal reply.
pub(crate) const MESSAGE_OK: &str = "정상";

/// Status code DART uses when no filing matches the query.
pub(crate) const STATUS_NO_DATA: &str = "013";

/// Common envelope of DART JSON replies.
///
/// `list` is absent when the status is not normal.
#[derive(Debug, Deserialize)]
pub(crate) struct DartEnvelope<T> {
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default = "Vec::new")]
    pub(crate) list: Vec<T>,
}

impl<T> DartEnvelope<T> {
    pub(crate) fn is_ok(&self) -> bool {
        self.status == STATUS_OK || self.message == MESSAGE_OK
    }

    /// Split a reply into data, a missing filing, or an API error.
    ///
    /// Only `013` means the filing does not exist. Key, quota and
    /// maintenance statuses (`010`, `020`, `800`, ...) are errors.
    pub(crate) fn into_fetched(self) -> Result<Fetched<Vec<T>>> {
        if self.is_ok() {
            return Ok(Fetched::Data(self.list));
        }
        if self.status == STATUS_NO_DATA {
            return Ok(Fetched::NoData {
                status: self.status,
                message: self.message,
            });
        }
        Err(DataError::DartApi(format!("{}: {}", self.status, self.message)))
    }
}

/// Open DART API client with rate limiting
pub struct DartClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    api_key: String,
    base_url: String,
    report_codes: ReportCodes,
    failure_delay: Duration,
}

impl DartClient {
    /// Create a new DART client with default settings
    ///
    /// # Arguments
    /// * `api_key` - Open DART certificate key (`crtfc_key`)
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_rate_limit(api_key, DEFAULT_RATE_LIMIT)
    }

    /// Create a new DART client with custom request spacing
    ///
    /// # Example
    /// ```no_run
    /// use sdam_data::dart::DartClient;
    /// use std::time::Duration;
    ///
    /// # fn example() -> sdam_data::Result<()> {
    /// // At most 5 requests per second
    /// let client = DartClient::with_rate_limit("my-key", Duration::from_millis(200))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_rate_limit(api_key: impl Into<String>, min_interval: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DataError::DartApi("Empty API key".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
            api_key,
            base_url: DART_BASE_URL.to_string(),
            report_codes: ReportCodes::default(),
            failure_delay: DEFAULT_FAILURE_DELAY,
        })
    }

    /// Point the client at another host (a mirror or a local test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the quarter to report-code mapping.
    pub fn with_report_codes(mut self, report_codes: ReportCodes) -> Self {
        self.report_codes = report_codes;
        self
    }

    /// Set the pause taken after a failed per-company request.
    pub const fn with_failure_delay(mut self, failure_delay: Duration) -> Self {
        self.failure_delay = failure_delay;
        self
    }

    /// Quarter to report-code mapping in use.
    pub const fn report_codes(&self) -> &ReportCodes {
        &self.report_codes
    }

    /// Pause taken after a failed per-company request.
    pub const fn failure_delay(&self) -> Duration {
        self.failure_delay
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Issue a rate-limited GET and return the raw body.
    pub(crate) async fn get_bytes(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<u8>> {
        self.rate_limiter.lock().await.wait().await;

        let url = self.endpoint(path);
        let response = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.api_key())])
            .query(params)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "GET {} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response.bytes().await.map_err(DataError::Network)?;
        Ok(body.to_vec())
    }

    /// Issue a rate-limited GET against a JSON endpoint.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<DartEnvelope<T>> {
        let body = self.get_bytes(path, params).await?;
        let envelope = serde_json::from_slice(&body)?;
        Ok(envelope)
    }

    /// Sleep for the configured failure delay.
    pub(crate) async fn back_off(&self) {
        sleep(self.failure_delay).await;
    }
}

impl std::fmt::Debug for DartClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DartClient")
            .field("base_url", &self.base_url)
            .field("failure_delay", &self.failure_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        let result = DartClient::new("  ");
        assert!(matches!(result, Err(DataError::DartApi(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = DartClient::new("key").unwrap().with_base_url("http://localhost:1234/");
        assert_eq!(
            client.endpoint("corpCode.xml"),
            "http://localhost:1234/api/corpCode.xml"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let client = DartClient::new("secret-key").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("DartClient"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_envelope_without_list() {
        let envelope: DartEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"status":"013","message":"조회된 데이타가 없습니다."}"#)
                .unwrap();
        assert!(!envelope.is_ok());
        assert!(envelope.list.is_empty());
        assert!(matches!(
            envelope.into_fetched(),
            Ok(Fetched::NoData { status, .. }) if status == "013"
        ));
    }

    #[rstest::rstest]
    #[case("010", "등록되지 않은 키입니다.")]
    #[case("020", "요청 제한을 초과하였습니다.")]
    #[case("800", "시스템 점검으로 인한 서비스가 중지 중입니다.")]
    #[case("900", "정의되지 않은 오류가 발생하였습니다.")]
    fn test_error_status_is_not_no_data(#[case] status: &str, #[case] message: &str) {
        let envelope: DartEnvelope<serde_json::Value> = DartEnvelope {
            status: status.to_string(),
            message: message.to_string(),
            list: Vec::new(),
        };
        match envelope.into_fetched() {
            Err(DataError::DartApi(text)) => assert!(text.starts_with(status)),
            other => panic!("expected an API error, got {:?}", other),
        }
    }
}
