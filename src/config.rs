use crate::error::{RepoClientError, Result};
use crate::logging::HttpLogLevel;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = "GitHub Repos Demo/0.1.0";

/// Settings for the shared HTTP client. Built once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Must end with `/`; endpoint paths are resolved relative to it.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub log_level: HttpLogLevel,
    pub user_agent: String,
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
            log_level: HttpLogLevel::Body,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Applies the same ceiling to connect, read and write.
    pub fn with_timeouts(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.read_timeout = timeout;
        self.write_timeout = timeout;
        self
    }

    pub fn with_log_level(mut self, log_level: HttpLogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Parses and checks the base URL.
    pub fn validate(&self) -> Result<Url> {
        if !self.base_url.ends_with('/') {
            return Err(RepoClientError::InvalidBaseUrl(format!(
                "base URL must end in /: {}",
                self.base_url
            )));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| RepoClientError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;

        if url.cannot_be_a_base() {
            return Err(RepoClientError::InvalidBaseUrl(format!(
                "not a hierarchical URL: {}",
                self.base_url
            )));
        }

        Ok(url)
    }

    /// Whole-request ceiling handed to the transport.
    pub fn total_timeout(&self) -> Duration {
        self.connect_timeout + self.read_timeout + self.write_timeout
    }
}
