//! Bounded exponential backoff.

use std::time::Duration;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay after failed attempt `attempt` (1-based), or `None` when it was the last.
    ///
    /// Retry n waits `base_delay * 2^(n-1)`.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        Some(self.base_delay.saturating_mul(factor))
    }

    /// Sum of every delay the policy can impose.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts)
            .filter_map(|attempt| self.delay_after(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Whether the final attempt can still start before `deadline`.
    pub fn fits_within(&self, deadline: Duration) -> bool {
        self.total_backoff() < deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        assert_eq!(policy.delay_after(1), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_after(3), None);
        assert_eq!(policy.total_backoff(), Duration::from_secs(3));
    }

    #[test]
    fn test_backoff_against_deadline() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        assert!(policy.fits_within(Duration::from_secs(20)));
        assert!(!policy.fits_within(Duration::from_secs(3)));
    }

    #[test]
    fn test_single_attempt_never_sleeps() {
        let policy = RetryPolicy::new(1, Duration::from_secs(1));
        assert_eq!(policy.delay_after(1), None);
        assert_eq!(policy.total_backoff(), Duration::ZERO);
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        assert_eq!(RetryPolicy::new(0, Duration::from_millis(5)).max_attempts, 1);
    }

    #[test]
    fn test_large_attempt_saturates() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_secs(1));
        assert!(policy.delay_after(40).is_some());
    }
}
