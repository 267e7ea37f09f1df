//! The vehicle record held by link queues.

use qnet_core::{PersonId, Time, VehicleId};

/// One vehicle inside a link queue or wait list.
///
/// `entered` is when the vehicle joined the current link (or, for a departing
/// vehicle, when its driver ended the preceding activity) — the stuck-time
/// threshold counts from here.  `earliest_exit` is entry time plus the link's
/// free-flow traversal time; for departing vehicles it equals `entered`
/// because the departure link is not traversed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueuedVehicle {
    pub vehicle:       VehicleId,
    pub driver:        PersonId,
    pub entered:       Time,
    pub earliest_exit: Time,
}

impl QueuedVehicle {
    /// `true` once the free-flow traversal time has elapsed.
    #[inline]
    pub fn eligible(&self, now: Time) -> bool {
        now >= self.earliest_exit
    }
}
