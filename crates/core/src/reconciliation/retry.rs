//! Bounded retry of transactions that lost a lock or serialization race.

use super::error::InventoryError;

/// Number of attempts used when no configuration is supplied.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Decides whether a failed transaction should be run again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` runs in total (at least one).
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Total runs allowed, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns true if `attempt` (1-based) failed with `err` and another run is allowed.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, err: &InventoryError) -> bool {
        err.is_retryable() && attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}
