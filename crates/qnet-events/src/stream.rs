//! `EventStream` — append-only, deterministically ordered event collection.
//!
//! # Why buffering exists
//!
//! The engine emits events in *processing* order within a time step, which is
//! not the declared *output* order (a departure in the activity phase is
//! processed before any link-leave of the same step, but must sort after
//! them).  Events for the current step are therefore buffered and flushed in
//! priority order when the clock advances.  The sort is stable, so events
//! with equal (time, priority) keep emission order — which is itself
//! deterministic because the engine processes ids in ascending order.  Two
//! runs of identical input yield byte-identical streams.

use qnet_core::Time;

use crate::{Event, EventKind};

/// Append-only event stream with per-step priority ordering.
pub struct EventStream {
    /// Step currently being emitted into.
    now: Time,
    /// Events of the current step, in emission order.
    pending: Vec<Event>,
    /// Flushed, fully ordered events.
    log: Vec<Event>,
    finished: bool,
}

impl EventStream {
    pub fn new(start: Time) -> Self {
        Self {
            now:      start,
            pending:  Vec::new(),
            log:      Vec::new(),
            finished: false,
        }
    }

    /// Record `kind` at the current step.
    ///
    /// # Panics
    /// Panics if called after [`finish`](Self::finish) — the stream is the
    /// immutable output contract once frozen.
    pub fn emit(&mut self, kind: EventKind) {
        assert!(!self.finished, "emit() on a finished event stream");
        self.pending.push(Event { time: self.now, kind });
    }

    /// Advance the stream clock to `to`, flushing the previous step's events
    /// in priority order.  The engine calls this once per time step; calling
    /// it with `to == now` is a no-op.
    ///
    /// # Panics
    /// Panics in debug mode if time moves backwards.
    pub fn advance(&mut self, to: Time) {
        debug_assert!(to >= self.now, "event stream time moved backwards: {} -> {}", self.now, to);
        if to == self.now {
            return;
        }
        self.flush_pending();
        self.now = to;
    }

    /// Flush the final step and freeze the stream.  Idempotent.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.flush_pending();
        self.finished = true;
    }

    /// All flushed events in output order.  Complete only after
    /// [`finish`](Self::finish).
    pub fn events(&self) -> &[Event] {
        &self.log
    }

    /// Consume the stream, yielding the ordered events.
    ///
    /// # Panics
    /// Panics if the stream was not finished — dropping buffered events
    /// silently would corrupt scoring.
    pub fn into_events(self) -> Vec<Event> {
        assert!(self.finished, "into_events() on an unfinished event stream");
        self.log
    }

    pub fn len(&self) -> usize {
        self.log.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty() && self.pending.is_empty()
    }

    fn flush_pending(&mut self) {
        // Stable: equal-priority events keep deterministic emission order.
        self.pending.sort_by_key(|e| e.kind.priority());
        self.log.append(&mut self.pending);
    }
}
