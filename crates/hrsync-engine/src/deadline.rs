//! Cooperative run deadline.

use std::time::{Duration, Instant};

/// A run budget measured from a fixed start instant.
///
/// Checked between records only, so a single slow remote call can overrun
/// the budget by up to that call's own timeout.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start the clock now.
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// The configured budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// True once the elapsed time reaches the budget. A zero budget is
    /// expired immediately.
    pub fn expired(&self) -> bool {
        self.elapsed() >= self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_is_expired() {
        assert!(Deadline::start(Duration::ZERO).expired());
    }

    #[test]
    fn generous_budget_is_not_expired() {
        let d = Deadline::start(Duration::from_secs(3600));
        assert!(!d.expired());
        assert_eq!(d.budget(), Duration::from_secs(3600));
    }

    #[test]
    fn expires_after_budget_elapses() {
        let d = Deadline::start(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(10));
        assert!(d.expired());
        assert!(d.elapsed() >= Duration::from_millis(5));
    }
}
