//! Deadline-based debouncing.
//!
//! A [`Debouncer`] defers an action by a fixed window; every new trigger
//! inside the window pushes the deadline out again.  It holds no timer of
//! its own: callers pass the current [`Instant`] in and poll
//! [`fire`](Debouncer::fire) from their event loop, which keeps it
//! deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Arm the debouncer, or restart the window if already armed.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Returns `true` exactly once per armed window, when `now` has reached
    /// the deadline.  Disarms on firing.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// How long until the pending action fires, if one is pending.
    ///
    /// The event loop uses this to shorten its input poll timeout.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
