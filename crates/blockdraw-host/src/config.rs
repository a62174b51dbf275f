//! Host connection configuration

use serde::Deserialize;
use std::time::Duration;

/// Default host base URL (local SiYuan kernel)
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:6806";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the SiYuan host
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Base URL of the host kernel
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token, sent as `Authorization: Token <t>` when set
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HostConfig {
    /// Create a config pointing at the given base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create from environment variables
    ///
    /// Reads `BLOCKDRAW_BASE_URL`, `BLOCKDRAW_TOKEN`, and
    /// `BLOCKDRAW_TIMEOUT_SECS`; all optional.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("BLOCKDRAW_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(token) = std::env::var("BLOCKDRAW_TOKEN") {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }
        if let Some(secs) = std::env::var("BLOCKDRAW_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }
        config
    }

    /// Set the API token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for a host-relative API path
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = HostConfig::new("http://localhost:6806/");
        assert_eq!(
            config.endpoint("/api/attr/getBlockAttrs"),
            "http://localhost:6806/api/attr/getBlockAttrs"
        );
    }

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:6806");
        assert!(config.token.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builder_style() {
        let config = HostConfig::new("http://host:1234")
            .with_token("secret")
            .with_timeout_secs(5);
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
    }
}
