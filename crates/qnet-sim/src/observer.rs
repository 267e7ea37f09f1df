//! Hooks into the running simulation.
//!
//! All methods default to no-ops so an observer implements only what it
//! needs.  Observers see the clock and the final report; the event stream
//! remains the canonical output and is read from the [`Sim`](crate::Sim)
//! after the run.

use qnet_core::Time;

use crate::engine::SimReport;

pub trait SimObserver {
    /// Called once before the first step.
    fn on_sim_start(&mut self, _now: Time, _persons: usize) {}

    /// Called at the start of every step, before any transition.
    fn on_step_start(&mut self, _now: Time) {}

    /// Called at the end of every step.
    fn on_step_end(&mut self, _now: Time) {}

    /// Called once after the last step, with the final report.
    fn on_sim_end(&mut self, _report: &SimReport) {}
}

/// Observer that does nothing — for runs that only want the event stream.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
