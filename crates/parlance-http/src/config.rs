//! Public configuration for the API client.

use std::time::Duration;

use parlance_core::ClientSettings;

/// Configuration for the API client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use parlance_http::ApiClientConfig;
/// use std::time::Duration;
///
/// let config = ApiClientConfig::new()
///     .with_base_url("http://localhost:5000")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the evaluation service
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Retry attempts for idempotent requests. Evaluations are never retried.
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: parlance_core::DEFAULT_API_BASE_URL.to_string(),
            user_agent: concat!("parlance/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(parlance_core::settings::DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(250),
        }
    }
}

impl ApiClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a configuration from validated client settings.
    #[must_use]
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new()
            .with_base_url(settings.effective_api_base_url())
            .with_timeout(Duration::from_secs(settings.effective_timeout_secs()))
    }

    /// Set the base URL of the evaluation service.
    ///
    /// Defaults to `http://localhost:5000`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for catalog requests.
    ///
    /// Defaults to 2 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiClientConfig::new();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert!(config.user_agent.starts_with("parlance/"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ApiClientConfig::new()
            .with_base_url("https://speech.example.com/api")
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0)
            .with_retry_delay(Duration::from_millis(1));

        assert_eq!(config.base_url, "https://speech.example.com/api");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.retry_base_delay, Duration::from_millis(1));
    }

    #[test]
    fn test_from_settings() {
        let settings = ClientSettings {
            api_base_url: Some("http://10.0.0.2:8080".to_string()),
            request_timeout_secs: Some(90),
            ..ClientSettings::default()
        };
        let config = ApiClientConfig::from_settings(&settings);
        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.timeout, Duration::from_secs(90));
    }
}
