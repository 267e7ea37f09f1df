//! `TimeQueue` — sparse per-second agent activation queue.
//!
//! # Why this exists
//!
//! Most agents are idle most seconds (mid-activity, mid-teleport).  Scanning
//! all N agents every step to ask "is it your turn?" would cost O(N) per step
//! regardless of how many agents actually transition.  `TimeQueue` inverts
//! the problem: when an agent computes its next transition time it registers
//! here, and each step the engine drains only the agents due at that second —
//! O(active) work instead of O(N).
//!
//! The engine keeps two of these: the activity-end schedule and the
//! teleport-arrival schedule.
//!
//! `BTreeMap` gives O(log W) insert/pop where W = distinct future times with
//! at least one entry; for a single simulated day W stays small.

use std::collections::BTreeMap;

use qnet_core::{PersonId, Time};

/// A priority queue mapping simulation times → agents due at that time.
#[derive(Default)]
pub struct TimeQueue {
    inner: BTreeMap<Time, Vec<PersonId>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl TimeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `person` to be processed at `time`.
    pub fn push(&mut self, time: Time, person: PersonId) {
        self.inner.entry(time).or_default().push(person);
        self.total += 1;
    }

    /// Remove and return all agents due at exactly `now`, sorted ascending by
    /// person id so simultaneous transitions are processed in a fixed order.
    ///
    /// Returns an empty vec if nothing is due (common case — no allocation).
    pub fn drain_due(&mut self, now: Time) -> Vec<PersonId> {
        debug_assert!(
            self.inner.keys().next().is_none_or(|&t| t >= now),
            "time queue holds entries in the past"
        );
        match self.inner.remove(&now) {
            None => Vec::new(),
            Some(mut due) => {
                self.total -= due.len();
                due.sort_unstable();
                due
            }
        }
    }

    /// The earliest time with at least one queued agent, or `None` if empty.
    pub fn next_time(&self) -> Option<Time> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
