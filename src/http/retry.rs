//! Retry policies for HTTP requests.

use std::time::Duration;

/// Retry policy for an HTTP request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt, no retries.
    None,
    /// Retry transport failures and any non-2xx status using the client's
    /// configured [`RetryConfig`]. Default for every GET endpoint.
    #[default]
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

/// Configuration for retry behavior.
///
/// Backoff is linear: the delay after failed attempt `k` (1-indexed) is
/// `base_delay * k`. There is no cap and no jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, including the first request.
    pub max_attempts: u32,
    /// Delay unit multiplied by the number of failed attempts so far.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// A config that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-indexed).
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Attempts actually made; a zero config still makes one request.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
