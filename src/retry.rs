/*!
 * Retry policy for remote API calls.
 *
 * Both remote services retry on failure with a bounded attempt count and a
 * delay between attempts. The policy is a plain value passed into each
 * service at construction, so tests can substitute a zero-delay variant.
 */

use std::time::Duration;

/// Delay schedule between retry attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// No delay between attempts
    None,
    /// The same delay before every retry
    Fixed(Duration),
    /// `base + attempt` seconds before retry number `attempt` (1-based)
    Linear { base_secs: u64 },
}

/// Bounded retry schedule for one call site
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first (minimum 1)
    pub max_attempts: u32,
    /// Delay schedule applied between attempts
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Policy that tries once with no delays, for tests
    pub fn no_retry() -> Self {
        Self::new(1, Backoff::None)
    }

    /// Delay to observe before retry number `attempt` (1-based)
    pub fn delay_before(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(d) => d,
            Backoff::Linear { base_secs } => Duration::from_secs(base_secs + u64::from(attempt)),
        }
    }

    /// Sleep out the delay before retry number `attempt` (1-based)
    pub async fn wait_before(&self, attempt: u32) {
        let delay = self.delay_before(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
