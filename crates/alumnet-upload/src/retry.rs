use std::time::Duration;

use alumnet_core::TransferOptions;
use alumnet_storage::StorageError;

/// Upper bound for a single backoff wait, whatever the attempt number.
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(60);

/// Bounded exponential backoff.
///
/// With the default 1 s base the waits after failed attempts 1, 2, 3 are
/// 2 s, 4 s, 8 s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first try; zero is treated as one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_options(options: &TransferOptions) -> Self {
        Self::new(options.max_retries, options.backoff_base)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait after failed attempt `attempt` (1-based): `base * 2^attempt`, capped.
    #[inline]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .saturating_mul(factor)
            .min(MAX_RETRY_BACKOFF)
    }

    /// Whether a failure on `attempt` earns another try.
    pub fn should_retry(&self, attempt: u32, err: &StorageError) -> bool {
        err.is_transient() && attempt < self.max_attempts
    }

    /// Every wait the policy can produce, in order.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts)
            .map(|attempt| self.delay_for_attempt(attempt))
            .collect()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_options(&TransferOptions::default())
    }
}
