//! Retry policies for automatic reconnection
//!
//! When the channel drops without a clean close, the policy decides how long
//! to wait before the next attempt and when to give up. The chat protocol's
//! own policy is a fixed delay with a small bounded budget; the trait exists
//! so tests and embedders can substitute their own behavior.
//!
//! # Built-in Policies
//!
//! - **FixedDelay**: constant delay between attempts, optional budget
//! - **NoReconnect**: give up immediately
//!
//! # Examples
//!
//! ```rust
//! use chatwire_client::FixedDelay;
//! use std::time::Duration;
//!
//! // The reference client's policy: 5 seconds, 3 attempts
//! let policy = FixedDelay::new(Duration::from_secs(5)).with_max_attempts(3);
//! ```

use std::time::Duration;

/// Trait for reconnection policies
///
/// The policy is consulted once per reconnection attempt. `reset()` is called
/// after every successful open, restoring the full budget; this is what makes
/// the retry counter "reset to maximum" on reconnection.
pub trait RetryPolicy: Send + Sync {
    /// Delay before attempt number `attempt` (0-indexed)
    ///
    /// Returns `None` when the budget is exhausted and the manager should
    /// stop permanently.
    fn next_delay(&mut self, attempt: u32) -> Option<Duration>;

    /// Restore the full retry budget after a successful open
    fn reset(&mut self);
}

/// Fixed delay between reconnection attempts
///
/// Deliberately not a backoff: the protocol favors a short, predictable
/// recovery window over spreading load, because each manager serves a single
/// interactive session.
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<u32>,
}

impl FixedDelay {
    /// Create a fixed-delay policy with an unlimited budget
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Bound the number of attempts before giving up
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl RetryPolicy for FixedDelay {
    fn next_delay(&mut self, attempt: u32) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if attempt >= max {
                return None;
            }
        }
        Some(self.delay)
    }

    fn reset(&mut self) {
        // The budget is derived from the attempt counter, nothing to restore
    }
}

/// Policy that never reconnects
pub struct NoReconnect;

impl RetryPolicy for NoReconnect {
    fn next_delay(&mut self, _attempt: u32) -> Option<Duration> {
        None
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay_constant() {
        let mut policy = FixedDelay::new(Duration::from_secs(5)).with_max_attempts(3);

        assert_eq!(policy.next_delay(0), Some(Duration::from_secs(5)));
        assert_eq!(policy.next_delay(1), Some(Duration::from_secs(5)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_secs(5)));
        assert_eq!(policy.next_delay(3), None);
    }

    #[test]
    fn test_fixed_delay_unlimited() {
        let mut policy = FixedDelay::new(Duration::from_millis(10));
        assert!(policy.next_delay(1000).is_some());
    }

    #[test]
    fn test_fixed_delay_budget_is_attempt_driven() {
        // reset() has no state of its own; the budget comes back because the
        // manager restarts its attempt counter at zero.
        let mut policy = FixedDelay::new(Duration::from_secs(1)).with_max_attempts(2);
        assert!(policy.next_delay(2).is_none());
        policy.reset();
        assert!(policy.next_delay(0).is_some());
    }

    #[test]
    fn test_no_reconnect() {
        let mut policy = NoReconnect;
        assert!(policy.next_delay(0).is_none());
        assert!(policy.next_delay(1).is_none());
    }
}
