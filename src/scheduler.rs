//! Single-slot tick scheduler.
//!
//! Holds at most one pending deadline. Scheduling replaces whatever was
//! pending, so pause/resume/restart can never stack two ticks.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub struct TickScheduler {
    deadline: Option<Instant>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the next tick `after` from `now`. Returns true if an earlier
    /// pending tick was replaced.
    pub fn schedule(&mut self, now: Instant, after: Duration) -> bool {
        self.deadline.replace(now + after).is_some()
    }

    /// Drops the pending tick. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending tick, zero if overdue.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Consumes the pending tick if it is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
