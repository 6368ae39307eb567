//! Client configuration (layered: code > env).

use std::time::Duration;

/// Default backend origin when nothing is configured.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the docent client.
///
/// Resolution order: explicit setters > environment (`DOCENT_BASE_URL`,
/// `DOCENT_TIMEOUT_SECS`) > built-in defaults.
#[derive(Debug, Clone)]
pub struct DocentConfig {
    base_url: String,
    timeout: Duration,
}

impl Default for DocentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DocentConfig {
    /// Create config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables, reading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();

        if let Ok(url) = std::env::var("DOCENT_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(secs) = std::env::var("DOCENT_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Override the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
