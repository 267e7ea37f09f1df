//! `qnet-events` — the simulation's output contract.
//!
//! An append-only, strictly time-ordered stream of typed events.  Events at
//! identical times are ordered by a declared priority (activity-end before
//! link-leave before arrival before link-enter before departure, with the
//! remaining kinds in a fixed order after them), so two runs of identical
//! input always yield byte-identical streams, and an occupancy replay sees a
//! parked vehicle's slot freed before a same-second admission.  Scoring and
//! learning consume this stream and nothing else.

pub mod error;
pub mod event;
pub mod stream;
pub mod writer;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::EventsError;
pub use event::{Event, EventKind};
pub use stream::EventStream;
pub use writer::EventWriter;
