//! Typed simulation events.
//!
//! The event stream is the sole observable contract the simulation core
//! exposes to scoring and learning — no other mutable state is shared
//! outward.  Events are plain data: every field is an id or a label, never a
//! reference into engine state.

use qnet_core::{LegMode, LinkId, PersonId, Time, VehicleId};

/// One record in the simulation's output stream.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub time: Time,
    pub kind: EventKind,
}

/// What happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A person finished an activity and is about to take control of its day.
    ActivityEnd { person: PersonId, link: LinkId, act_type: String },

    /// A vehicle was released from a link.
    LinkLeave { vehicle: VehicleId, link: LinkId },

    /// A vehicle was admitted to a link.
    LinkEnter { vehicle: VehicleId, link: LinkId },

    /// A person started a leg at a link.
    Departure { person: PersonId, link: LinkId, mode: LegMode },

    /// A person completed a leg at a link.
    Arrival { person: PersonId, link: LinkId, mode: LegMode },

    /// A person began an activity at a link.
    ActivityStart { person: PersonId, link: LinkId, act_type: String },

    /// A person exceeded the stuck-time threshold and was removed from its
    /// queue (teleport-out policy; under the abort policy the run dies and no
    /// event is logged).
    Stuck { person: PersonId, link: LinkId },
}

impl EventKind {
    /// Tie-break rank for events at identical times — lower flushes first.
    ///
    /// Activity-end before link-leave before link-enter before departure is
    /// the declared output contract.  Arrival ranks between link-leave and
    /// link-enter so that a parking vehicle frees its storage slot in the
    /// stream before a same-second admission reuses it — a replay that
    /// tracks per-link occupancy never sees a link above capacity.  The
    /// remaining kinds slot after, so the full stream is total.
    pub fn priority(&self) -> u8 {
        match self {
            EventKind::ActivityEnd { .. }   => 0,
            EventKind::LinkLeave { .. }     => 1,
            EventKind::Arrival { .. }       => 2,
            EventKind::LinkEnter { .. }     => 3,
            EventKind::Departure { .. }     => 4,
            EventKind::ActivityStart { .. } => 5,
            EventKind::Stuck { .. }         => 6,
        }
    }

    /// Stable type label used in the CSV output.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::ActivityEnd { .. }   => "actend",
            EventKind::LinkLeave { .. }     => "left_link",
            EventKind::LinkEnter { .. }     => "entered_link",
            EventKind::Departure { .. }     => "departure",
            EventKind::Arrival { .. }       => "arrival",
            EventKind::ActivityStart { .. } => "actstart",
            EventKind::Stuck { .. }         => "stuck",
        }
    }

    /// The person an event refers to, where applicable.
    pub fn person(&self) -> Option<PersonId> {
        match self {
            EventKind::ActivityEnd { person, .. }
            | EventKind::Departure { person, .. }
            | EventKind::Arrival { person, .. }
            | EventKind::ActivityStart { person, .. }
            | EventKind::Stuck { person, .. } => Some(*person),
            EventKind::LinkLeave { .. } | EventKind::LinkEnter { .. } => None,
        }
    }

    /// The link an event refers to.
    pub fn link(&self) -> LinkId {
        match self {
            EventKind::ActivityEnd { link, .. }
            | EventKind::LinkLeave { link, .. }
            | EventKind::LinkEnter { link, .. }
            | EventKind::Departure { link, .. }
            | EventKind::Arrival { link, .. }
            | EventKind::ActivityStart { link, .. }
            | EventKind::Stuck { link, .. } => *link,
        }
    }
}
