//! Bounded retry with exponential backoff.

use std::time::Duration;

/// Retry budget and backoff schedule for one delivery.
///
/// A delivery gets one initial attempt plus `max_retries` retries. The wait
/// before retry `n` is `base_delay * 2^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub base_delay: Duration,
    /// Ceiling for the doubling schedule.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Total attempts a delivery may consume, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Backoff to wait before retry `retry` (1-based).
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let doublings = retry.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << doublings)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}
