//! Trailing-edge debouncer.
//!
//! Each push replaces the pending value and moves the deadline. The value is
//! released once the deadline passes with no further push.

use std::time::Duration;
use tokio::time::Instant;

/// Holds at most one pending value until its deadline.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Queues `value`, replacing anything pending, due at `now + delay`.
    pub fn push(&mut self, value: T, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.pending = Some((deadline, value));
        deadline
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the pending value if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.pending.take() {
            Some((deadline, value)) if now >= deadline => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }
}
