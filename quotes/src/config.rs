//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

/// Default feed base URL.
pub const DEFAULT_BASE_URL: &str = "https://economia.awesomeapi.com.br/json/last/";

/// Configuration for the quote pipeline and the tracker binary.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Feed base URL; pair expressions are appended to its path.
    pub base_url: String,
    /// Location of the JSON quote store.
    pub store_path: PathBuf,
    /// HTTP request timeout.
    pub request_timeout: Duration,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit logs as JSON.
    pub log_json: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            store_path: PathBuf::from("quotes.json"),
            request_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("TRACKER_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(path) = std::env::var("TRACKER_STORE_PATH") {
            config.store_path = PathBuf::from(path);
        }

        if let Ok(secs) = std::env::var("TRACKER_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(json) = std::env::var("TRACKER_LOG_JSON") {
            config.log_json = matches!(json.as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Parsed feed base URL.
    pub fn parsed_base_url(&self) -> Result<Url, String> {
        let url = Url::parse(&self.base_url).map_err(|e| format!("Invalid base URL: {e}"))?;
        if url.cannot_be_a_base() {
            return Err(format!("Base URL cannot carry a path: {}", self.base_url));
        }
        Ok(url)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.parsed_base_url()?;

        if self.store_path.as_os_str().is_empty() {
            return Err("Store path cannot be empty".to_string());
        }

        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        Ok(())
    }
}
