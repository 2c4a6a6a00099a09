//! Bounded retry with exponential backoff for broker and transport calls.

use std::time::Duration;

/// Maximum backoff between attempts. Caps exponential growth so high attempt
/// counts do not produce excessively long delays.
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Retry policy applied to transient broker and transport failures.
///
/// Permanent rejections are never retried; a user-initiated retry is always
/// expressed as re-submitting the file, which creates a fresh session.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first. 0 disables retries entirely.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
            max_delay: MAX_RETRY_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Computes the backoff delay before retry number `attempt` (0-based),
    /// exponential with cap.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}
