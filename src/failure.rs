//! Consecutive-failure circuit breaker
//!
//! Trips after a configured number of consecutive processing errors. There is
//! no automatic recovery: only `reset` (a new session) clears the fatal state.

use tracing::error;

#[derive(Debug, Clone)]
pub struct FailureTracker {
    max_consecutive_errors: u32,
    consecutive_errors: u32,
    total_errors: u64,
    fatal: bool,
}

impl Default for FailureTracker {
    fn default() -> Self {
        Self::new(5)
    }
}

impl FailureTracker {
    pub fn new(max_consecutive_errors: u32) -> Self {
        Self {
            max_consecutive_errors: max_consecutive_errors.max(1),
            consecutive_errors: 0,
            total_errors: 0,
            fatal: false,
        }
    }

    pub fn record_success(&mut self) {
        if !self.fatal {
            self.consecutive_errors = 0;
        }
    }

    /// Count an error. Returns true when this error trips the breaker.
    pub fn record_error(&mut self) -> bool {
        self.total_errors += 1;
        if self.fatal {
            return false;
        }

        self.consecutive_errors += 1;
        if self.consecutive_errors >= self.max_consecutive_errors {
            self.fatal = true;
            error!(
                consecutive_errors = self.consecutive_errors,
                "Too many consecutive processing errors; session is halted"
            );
            return true;
        }
        false
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn total_errors(&self) -> u64 {
        self.total_errors
    }

    pub fn max_consecutive_errors(&self) -> u32 {
        self.max_consecutive_errors
    }

    pub fn reset(&mut self) {
        self.consecutive_errors = 0;
        self.total_errors = 0;
        self.fatal = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_resets_counter() {
        let mut tracker = FailureTracker::new(3);
        tracker.record_error();
        tracker.record_error();
        tracker.record_success();
        assert_eq!(tracker.consecutive_errors(), 0);
        assert!(!tracker.record_error());
        assert!(!tracker.is_fatal());
        assert_eq!(tracker.total_errors(), 3);
    }

    #[test]
    fn test_trips_at_maximum() {
        let mut tracker = FailureTracker::new(3);
        assert!(!tracker.record_error());
        assert!(!tracker.record_error());
        assert!(tracker.record_error());
        assert!(tracker.is_fatal());

        // Already tripped: reported once
        assert!(!tracker.record_error());
        assert_eq!(tracker.consecutive_errors(), 3);
    }

    #[test]
    fn test_no_recovery_without_reset() {
        let mut tracker = FailureTracker::new(1);
        tracker.record_error();
        tracker.record_success();
        assert!(tracker.is_fatal());

        tracker.reset();
        assert!(!tracker.is_fatal());
        assert_eq!(tracker.consecutive_errors(), 0);
    }
}
