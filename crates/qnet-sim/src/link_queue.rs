//! The per-link vehicle queue — the physical heart of the flow model.
//!
//! # Design
//!
//! Each link holds two collections:
//!
//! | collection | contents | bounded by |
//! |------------|----------|------------|
//! | `queue`    | vehicles traversing the link, in entry order | storage capacity |
//! | `waiting`  | vehicles departing *from* this link, not yet admitted | nothing |
//!
//! Storage capacity is the link's physical cell count, raised where needed
//! to one free-flow traversal's worth of outflow so that flow capacity, not
//! storage, is the binding constraint on short fast links.
//!
//! A vehicle in `queue` becomes *eligible* to leave once its free-flow
//! traversal time has elapsed.  Actually leaving additionally requires outflow
//! budget (flow capacity) and storage space on the next link — the engine
//! checks both and drives the release; this type only answers "who may go
//! next" and enforces its own storage bound.
//!
//! # Outflow budget
//!
//! Flow capacity is enforced with a fractional token bucket: every step the
//! budget grows by the link's per-second flow and is capped at
//! `max(flow_per_step, 1.0)`; each release costs exactly 1.0.  A link with
//! 0.5 veh/s thus releases on every second step, and a link with 3 veh/s can
//! release three vehicles in one step but cannot bank idle seconds into a
//! later burst beyond its per-step rate.
//!
//! Vehicles arriving at their destination on this link park off the roadway:
//! they consume neither budget nor a downstream slot.

use std::collections::VecDeque;

use qnet_core::{LinkId, PersonId, QueueDiscipline, SimConfig, Time, VehicleId};
use qnet_network::Link;

use crate::vehicle::QueuedVehicle;

pub struct LinkQueue {
    link:        LinkId,
    discipline:  QueueDiscipline,
    freeflow_tt: u32,

    storage_capacity: u32,
    flow_per_step:    f64,
    budget_cap:       f64,
    budget:           f64,

    /// Vehicles on the roadway, in entry order.
    queue: VecDeque<QueuedVehicle>,

    /// Vehicles wanting to depart from this link, in departure order.  Not
    /// counted against storage until admitted.
    waiting: VecDeque<QueuedVehicle>,
}

impl LinkQueue {
    pub fn new(link: &Link, config: &SimConfig) -> Self {
        let flow_per_step = config.flow_per_second(link.capacity);
        let freeflow_tt = link.freeflow_travel_time();
        // The roadway must hold at least one free-flow traversal's worth of
        // outflow, or a short link would throttle below its own flow
        // capacity.
        let flow_floor = (freeflow_tt as f64 * flow_per_step).ceil() as u32;
        Self {
            link:             link.id,
            discipline:       config.queue_discipline,
            freeflow_tt,
            storage_capacity: link
                .storage_capacity(config.storage_capacity_factor)
                .max(flow_floor),
            flow_per_step,
            budget_cap:       flow_per_step.max(1.0),
            // Start full so the first vehicle of the day is not throttled.
            budget:           flow_per_step.max(1.0),
            queue:            VecDeque::new(),
            waiting:          VecDeque::new(),
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn link(&self) -> LinkId {
        self.link
    }

    /// Vehicles currently on the roadway (excludes the wait list).
    pub fn occupancy(&self) -> usize {
        self.queue.len()
    }

    pub fn storage_capacity(&self) -> u32 {
        self.storage_capacity
    }

    /// `true` if one more vehicle fits on the roadway.
    #[inline]
    pub fn has_space(&self) -> bool {
        (self.queue.len() as u32) < self.storage_capacity
    }

    pub fn outflow_budget(&self) -> f64 {
        self.budget
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.waiting.is_empty()
    }

    // ── Step bookkeeping ──────────────────────────────────────────────────

    /// Accrue one step's worth of outflow budget.  Called once per step by
    /// the engine before any release attempt.
    pub fn refresh_budget(&mut self) {
        self.budget = (self.budget + self.flow_per_step).min(self.budget_cap);
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Enter a vehicle from the upstream intersection at `now`.
    ///
    /// # Panics
    /// Panics if the link is full — callers must check [`has_space`] first;
    /// admission past the storage bound is an engine defect, not a runtime
    /// condition.
    pub fn admit(&mut self, vehicle: VehicleId, driver: PersonId, now: Time) {
        assert!(
            self.has_space(),
            "{} admitted beyond storage capacity {}",
            self.link,
            self.storage_capacity
        );
        self.queue.push_back(QueuedVehicle {
            vehicle,
            driver,
            entered:       now,
            earliest_exit: now.offset(self.freeflow_tt),
        });
    }

    /// Register a vehicle departing from this link.  The departure link is
    /// not traversed, so the record is eligible as soon as it is admitted;
    /// `entered`/`earliest_exit` are both the departure time, which anchors
    /// the stuck clock.
    pub fn push_waiting(&mut self, vehicle: VehicleId, driver: PersonId, departed: Time) {
        self.waiting.push_back(QueuedVehicle {
            vehicle,
            driver,
            entered:       departed,
            earliest_exit: departed,
        });
    }

    /// Move waiting departures onto the roadway while storage space remains,
    /// in departure order.  Returns how many were admitted.
    pub fn admit_waiting(&mut self) -> usize {
        let mut admitted = 0;
        while self.has_space() {
            match self.waiting.pop_front() {
                Some(veh) => {
                    self.queue.push_back(veh);
                    admitted += 1;
                }
                None => break,
            }
        }
        admitted
    }

    // ── Release ───────────────────────────────────────────────────────────

    /// The position of the next vehicle that may attempt to leave, scanning
    /// from `from` in entry order.
    ///
    /// FIFO only ever offers the front: a held-back front vehicle blocks the
    /// whole queue, so any `from > 0` yields `None`.  Passing offers every
    /// eligible vehicle in turn, letting the engine skip one that is blocked
    /// downstream.
    pub fn next_candidate(&self, now: Time, from: usize) -> Option<usize> {
        match self.discipline {
            QueueDiscipline::Fifo => {
                (from == 0 && self.queue.front().is_some_and(|v| v.eligible(now))).then_some(0)
            }
            QueueDiscipline::Passing => (from..self.queue.len())
                .find(|&pos| self.queue[pos].eligible(now)),
        }
    }

    #[inline]
    pub fn vehicle_at(&self, pos: usize) -> &QueuedVehicle {
        &self.queue[pos]
    }

    /// Remove the vehicle at `pos` for a move onto the next link, consuming
    /// one unit of outflow budget.
    ///
    /// # Panics
    /// Panics if the budget is insufficient — the engine checks before
    /// releasing.
    pub fn release_at(&mut self, pos: usize) -> QueuedVehicle {
        assert!(self.budget >= 1.0, "{} released without outflow budget", self.link);
        self.budget -= 1.0;
        self.queue.remove(pos).expect("release position out of bounds")
    }

    /// Remove the vehicle at `pos` because it arrives here — parking consumes
    /// no outflow budget and frees the storage slot immediately.
    pub fn remove_arrival(&mut self, pos: usize) -> QueuedVehicle {
        self.queue.remove(pos).expect("arrival position out of bounds")
    }

    // ── Stuck detection ───────────────────────────────────────────────────

    /// Remove and return every vehicle that has been trying to advance for at
    /// least `stuck_time` seconds: eligible roadway vehicles still present
    /// after the release phase, and waiting departures that never found
    /// storage space.  Entry order is preserved in the result.
    pub fn take_stuck(&mut self, now: Time, stuck_time: u32) -> Vec<QueuedVehicle> {
        let overdue =
            |v: &QueuedVehicle| v.eligible(now) && now.since(v.entered) >= stuck_time;

        let mut stuck = Vec::new();
        self.queue.retain(|v| {
            if overdue(v) {
                stuck.push(*v);
                false
            } else {
                true
            }
        });
        self.waiting.retain(|v| {
            if overdue(v) {
                stuck.push(*v);
                false
            } else {
                true
            }
        });
        stuck
    }
}
