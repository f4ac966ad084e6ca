//! Client configuration.

use std::time::Duration;

/// Default base URL of the diagram service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Default per-request timeout. Diagram generation waits on a language model.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for retry with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_ms: 5_000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(max_attempts: u32, initial_delay_ms: u64, max_delay_ms: u64, multiplier: f64) -> Self {
        Self {
            max_attempts,
            initial_delay_ms,
            max_delay_ms,
            multiplier,
        }
    }

    /// A single attempt, no retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff before retry `attempt` (0-indexed): the initial delay grown
    /// by `multiplier` per attempt, capped at `max_delay_ms`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let grown = self.initial_delay_ms as f64 * self.multiplier.powi(exponent);
        grown.min(self.max_delay_ms as f64) as u64
    }
}

/// Configuration for [`DiagramClient`](crate::DiagramClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL, e.g. `http://localhost:8001`.
    pub base_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for transport failures.
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("sketch-client/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_delay_ms, 200);
        assert_eq!(config.max_delay_ms, 5_000);
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let config = RetryConfig::new(10, 100, 1_000, 2.0);
        assert_eq!(config.delay_for_attempt(0), 100);
        assert_eq!(config.delay_for_attempt(1), 200);
        assert_eq!(config.delay_for_attempt(3), 800);
        assert_eq!(config.delay_for_attempt(9), 1_000);
        assert_eq!(config.delay_for_attempt(u32::MAX), 1_000);
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.starts_with("sketch-client/"));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_with_retry() {
        let config = ClientConfig::with_base_url("http://example.test").with_retry(RetryConfig::none());
        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.retry.max_attempts, 1);
    }
}
