//! Run configuration.
//!
//! One immutable [`SdamConfig`] is read at start-up and handed by
//! reference to every component. Every field has a default, so a file
//! only needs the values it changes:
//!
//! ```yaml
//! dart:
//!   api_key: "0123456789abcdef0123456789abcdef01234567"
//!   report_codes: { 1: "11013", 2: "11012", 3: "11014", 4: "11011" }
//! files:
//!   listing: data/krx_listing.csv
//! markets: [KOSPI, KOSDAQ]
//! output_dir: results
//! ```

use crate::error::{Result, SdamError};
use crate::schema::DEFAULT_ACCOUNTS;
use sdam_data::dart::{DART_BASE_URL, DartClient, ReportCodes};
use sdam_data::naver::{NAVER_FINANCE_BASE_URL, NaverPriceScraper};
use sdam_indicators::{EnterpriseValueConfig, ScreenConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Open DART settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DartConfig {
    /// Open DART certificate key (`crtfc_key`).
    pub api_key: String,
    /// API host.
    pub base_url: String,
    /// Quarter to `reprt_code` mapping.
    pub report_codes: ReportCodes,
    /// Minimum spacing between requests, in milliseconds.
    pub min_request_interval_ms: u64,
    /// Pause after a failed per-company request, in milliseconds.
    pub failure_delay_ms: u64,
}

impl Default for DartConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DART_BASE_URL.to_string(),
            report_codes: ReportCodes::default(),
            min_request_interval_ms: 60,
            failure_delay_ms: 3_000,
        }
    }
}

impl fmt::Debug for DartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DartConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("report_codes", &self.report_codes)
            .field("min_request_interval_ms", &self.min_request_interval_ms)
            .field("failure_delay_ms", &self.failure_delay_ms)
            .finish()
    }
}

/// Naver Finance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaverConfig {
    /// Quote page host.
    pub base_url: String,
    /// Minimum spacing between page requests, in milliseconds.
    pub request_delay_ms: u64,
}

impl Default for NaverConfig {
    fn default() -> Self {
        Self {
            base_url: NAVER_FINANCE_BASE_URL.to_string(),
            request_delay_ms: 200,
        }
    }
}

/// Local reference files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// KRX listed-securities export (CP949 CSV).
    pub listing: PathBuf,
    /// Account name translation file.
    pub translation: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            listing: PathBuf::from("data/krx_listing.csv"),
            translation: PathBuf::from("data/kr2eng.txt"),
        }
    }
}

/// Indicator and screen parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    /// Enterprise value indicator.
    pub enterprise_value: EnterpriseValueConfig,
    /// NCAV screen.
    pub screen: ScreenConfig,
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdamConfig {
    /// Open DART settings.
    pub dart: DartConfig,
    /// Naver Finance settings.
    pub naver: NaverConfig,
    /// Local reference files.
    pub files: FileConfig,
    /// KRX market segments to include.
    pub markets: Vec<String>,
    /// Accounts (Korean names) collected per company, in column order.
    pub accounts: Vec<String>,
    /// Directory receiving tables and reports.
    pub output_dir: PathBuf,
    /// Companies fetched at the same time.
    pub concurrency: usize,
    /// Indicator and screen parameters.
    pub indicators: IndicatorSettings,
}

impl Default for SdamConfig {
    fn default() -> Self {
        Self {
            dart: DartConfig::default(),
            naver: NaverConfig::default(),
            files: FileConfig::default(),
            markets: vec!["KOSPI".to_string(), "KOSDAQ".to_string()],
            accounts: DEFAULT_ACCOUNTS.iter().map(|s| s.to_string()).collect(),
            output_dir: PathBuf::from("results"),
            concurrency: 8,
            indicators: IndicatorSettings::default(),
        }
    }
}

impl SdamConfig {
    /// Read a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SdamError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse YAML configuration text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `explicit` if given, else the first existing default location,
    /// else the built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(&path),
            None => {
                debug!("no configuration file found; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Copy with a different API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.dart.api_key = api_key.into();
        self
    }

    /// Copy with a different output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Reject values no run can work with.
    pub fn validate(&self) -> Result<()> {
        if self.dart.api_key.trim().is_empty() {
            return Err(SdamError::InvalidConfig(
                "DART API key is empty; set dart.api_key or pass --key".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(SdamError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.accounts.is_empty() {
            return Err(SdamError::InvalidConfig(
                "no accounts requested".to_string(),
            ));
        }
        self.indicators.enterprise_value.validate()?;
        self.indicators.screen.validate()?;
        Ok(())
    }

    /// DART client built from these settings.
    pub fn dart_client(&self) -> Result<DartClient> {
        let client = DartClient::with_rate_limit(
            self.dart.api_key.clone(),
            Duration::from_millis(self.dart.min_request_interval_ms),
        )?
        .with_base_url(self.dart.base_url.clone())
        .with_report_codes(self.dart.report_codes.clone())
        .with_failure_delay(Duration::from_millis(self.dart.failure_delay_ms));
        Ok(client)
    }

    /// Price scraper built from these settings.
    pub fn price_scraper(&self) -> Result<NaverPriceScraper> {
        let scraper =
            NaverPriceScraper::with_delay(Duration::from_millis(self.naver.request_delay_ms))?
                .with_base_url(self.naver.base_url.clone());
        Ok(scraper)
    }

    /// Path of a file inside the output directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Candidate configuration paths, in lookup order.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("sdam").join(CONFIG_FILE_NAME));
    }
    paths
}
