//! Configuration for page fetching.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for HTTP fetching performed by the document loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string sent with every fetch.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Whether a non-2xx response status fails the fetch.
    #[serde(default = "default_fail_on_http_error")]
    pub fail_on_http_error: bool,
    /// Whether `visit` resolves a relative href against the originating
    /// document's URL. Off by default: the raw href is passed through
    /// as-is, preserving the historical behavior for existing callers.
    #[serde(default)]
    pub resolve_relative_hrefs: bool,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("domql/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_fail_on_http_error() -> bool {
    true
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            fail_on_http_error: default_fail_on_http_error(),
            resolve_relative_hrefs: false,
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets whether non-2xx statuses fail the fetch.
    #[must_use]
    pub fn with_fail_on_http_error(mut self, fail: bool) -> Self {
        self.fail_on_http_error = fail;
        self
    }

    /// Sets whether relative hrefs are resolved against the originating
    /// document's URL during `visit`.
    #[must_use]
    pub fn with_resolve_relative_hrefs(mut self, resolve: bool) -> Self {
        self.resolve_relative_hrefs = resolve;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert!((config.timeout_seconds - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("domql/"));
        assert!(config.fail_on_http_error);
        assert!(!config.resolve_relative_hrefs);
    }

    #[test]
    fn test_builder_methods() {
        let config = FetchConfig::new()
            .with_timeout(5.0)
            .with_user_agent("custom/1.0")
            .with_fail_on_http_error(false)
            .with_resolve_relative_hrefs(true);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent, "custom/1.0");
        assert!(!config.fail_on_http_error);
        assert!(config.resolve_relative_hrefs);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: FetchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_redirects, 10);
        assert!(!config.resolve_relative_hrefs);
    }
}
