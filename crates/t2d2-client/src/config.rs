//! Client configuration

use std::time::Duration;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://develop.t2d2.ai/api-v2/";

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// API endpoint URL
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("t2d2-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Create a new config with the given endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL guaranteed to end with a trailing slash, so paths can be
    /// appended directly.
    pub(crate) fn normalized_base_url(&self) -> String {
        if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_appended() {
        let config = Config::new("https://api.example.com/v2");
        assert_eq!(config.normalized_base_url(), "https://api.example.com/v2/");
    }

    #[test]
    fn trailing_slash_is_kept() {
        let config = Config::new("https://api.example.com/v2/");
        assert_eq!(config.normalized_base_url(), "https://api.example.com/v2/");
    }

    #[test]
    fn default_points_at_production() {
        assert_eq!(Config::default().base_url, DEFAULT_BASE_URL);
        assert_eq!(Config::default().timeout, Duration::from_secs(30));
    }
}
