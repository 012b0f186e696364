//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable that overrides the API base URL
pub const TAIGA_URL_ENV: &str = "TAIGA_URL";

/// Public Taiga API
pub const DEFAULT_BASE_URL: &str = "https://api.taiga.io/api/v1";

/// Tracker API settings
///
/// Passed explicitly to [`TaigaClient::new`](crate::TaigaClient::new); the
/// client never reads process state on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaigaConfig {
    /// API base, e.g. `https://api.taiga.io/api/v1`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Ask list endpoints for the whole collection in one response
    pub disable_pagination: bool,
}

impl TaigaConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Join `path` onto the base URL
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for TaigaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            disable_pagination: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = TaigaConfig::new().with_base_url("http://localhost:8000/api/v1/");
        assert_eq!(
            config.endpoint("/milestones/3"),
            "http://localhost:8000/api/v1/milestones/3"
        );
    }

    #[test]
    fn defaults() {
        let config = TaigaConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.disable_pagination);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config: TaigaConfig =
            serde_json::from_str(r#"{"base_url": "http://tracker"}"#).unwrap();
        assert_eq!(config.base_url, "http://tracker");
        assert_eq!(config.request_timeout_secs, 30);
    }
}
