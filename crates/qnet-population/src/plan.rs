//! Plan model: activities, legs, routes, and the alternating element sequence.
//!
//! # Genotype vs. phenotype
//!
//! A person's selected `Plan` is the *genotype*: it is immutable for the
//! duration of one simulated day.  All execution state (current element,
//! computed end times, current link) is the *phenotype* and lives in the
//! engine's per-agent cursor, referencing the plan by index only.  Learning
//! algorithms that mutate plans between days therefore never corrupt a run in
//! progress, and the engine never writes through a plan reference.

use qnet_core::{Coord, LegMode, LinkId, Time, VehicleId};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The concrete realization of a leg.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Route {
    /// An ordered link path through the network, driven through the
    /// link-queue model.  The first link is the departure location and is not
    /// traversed; the last link is where the leg arrives.
    Network {
        links:   Vec<LinkId>,
        /// Vehicle used for the leg; `None` means the person's default
        /// vehicle.
        vehicle: Option<VehicleId>,
    },
    /// An opaque description for teleported modes: the leg completes after a
    /// fixed number of seconds without touching any link queue.  The travel
    /// time may live here or on the leg; validation requires at least one.
    Generic {
        travel_time: Option<u32>,
        /// Crow-fly or routed distance in metres, for scoring only.
        distance: Option<f64>,
    },
}

impl Route {
    /// `true` for routes executed on the link-queue model.
    #[inline]
    pub fn is_network(&self) -> bool {
        matches!(self, Route::Network { .. })
    }

    /// The arrival link of a network route (its last link).
    pub fn end_link(&self) -> Option<LinkId> {
        match self {
            Route::Network { links, .. } => links.last().copied(),
            Route::Generic { .. } => None,
        }
    }
}

// ── Activity / Leg ────────────────────────────────────────────────────────────

/// A stay at one location.
///
/// At least one of `link`/`coord` must be present; a missing `link` is
/// resolved from `coord` via the network's nearest-link index at load time.
/// Exactly one of `end_time`/`max_duration` determines the departure, except
/// on a plan's final activity, which may leave both unset (the agent simply
/// stays until the simulated day ends).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    /// Application-defined type tag (e.g. "home", "work").  The engine only
    /// carries it into events; scoring assigns it meaning.
    pub act_type: String,

    pub link:  Option<LinkId>,
    pub coord: Option<Coord>,

    /// Absolute time at which the agent intends to leave.
    pub end_time: Option<Time>,

    /// Maximum stay in seconds, counted from arrival.
    pub max_duration: Option<u32>,
}

impl Activity {
    /// An activity pinned to a link with an absolute end time.
    pub fn at_link(act_type: &str, link: LinkId, end_time: Option<Time>) -> Self {
        Self {
            act_type: act_type.to_owned(),
            link: Some(link),
            coord: None,
            end_time,
            max_duration: None,
        }
    }

    /// An activity located only by coordinate; the link is filled in by
    /// location resolution.
    pub fn at_coord(act_type: &str, coord: Coord, end_time: Option<Time>) -> Self {
        Self {
            act_type: act_type.to_owned(),
            link: None,
            coord: Some(coord),
            end_time,
            max_duration: None,
        }
    }
}

/// A trip between two activities.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub mode: LegMode,

    /// Planned departure time — informational; the actual departure is the
    /// preceding activity's computed end.
    pub dep_time: Option<Time>,

    /// Planned travel time in seconds.  Required for teleported legs unless
    /// the generic route carries one; ignored for network legs, whose travel
    /// time emerges from the queue model.
    pub travel_time: Option<u32>,

    pub route: Route,
}

impl Leg {
    /// A car leg along a network route.
    pub fn drive(links: Vec<LinkId>) -> Self {
        Self {
            mode:        LegMode::Car,
            dep_time:    None,
            travel_time: None,
            route:       Route::Network { links, vehicle: None },
        }
    }

    /// A teleported leg of the given mode and duration.
    pub fn teleport(mode: LegMode, travel_time: u32) -> Self {
        Self {
            mode,
            dep_time:    None,
            travel_time: Some(travel_time),
            route:       Route::Generic { travel_time: Some(travel_time), distance: None },
        }
    }

    /// The seconds a teleported leg takes: the leg's own travel time, falling
    /// back to the generic route's.  `None` for network routes (their travel
    /// time emerges from the queue model) and for unvalidated legs that carry
    /// neither.
    pub fn teleport_travel_time(&self) -> Option<u32> {
        match &self.route {
            Route::Network { .. } => None,
            Route::Generic { travel_time, .. } => self.travel_time.or(*travel_time),
        }
    }
}

// ── PlanElement / Plan ────────────────────────────────────────────────────────

/// One element of a plan: a stay or a trip.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanElement {
    Activity(Activity),
    Leg(Leg),
}

impl PlanElement {
    #[inline]
    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            PlanElement::Activity(a) => Some(a),
            PlanElement::Leg(_) => None,
        }
    }

    #[inline]
    pub fn as_leg(&self) -> Option<&Leg> {
        match self {
            PlanElement::Leg(l) => Some(l),
            PlanElement::Activity(_) => None,
        }
    }
}

/// An ordered, non-empty sequence of elements alternating strictly between
/// activities and legs, beginning and ending with an activity.
///
/// The structural invariants are checked by population validation at load
/// time, not by this type — construction is cheap and infallible so loaders
/// and tests can assemble malformed plans and watch them be rejected.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    elements: Vec<PlanElement>,
}

impl Plan {
    pub fn from_elements(elements: Vec<PlanElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[PlanElement] {
        &self.elements
    }

    /// Consume the plan, yielding its elements (used by location resolution).
    pub fn into_elements(self) -> Vec<PlanElement> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn element(&self, idx: usize) -> Option<&PlanElement> {
        self.elements.get(idx)
    }

    /// The first activity — where the agent's day starts.
    pub fn first_activity(&self) -> Option<&Activity> {
        self.elements.first().and_then(PlanElement::as_activity)
    }
}

// ── PlanBuilder ───────────────────────────────────────────────────────────────

/// Fluent plan assembly for loaders, tests, and scenario generators.
///
/// ```
/// use qnet_core::{LinkId, hms};
/// use qnet_population::{Leg, PlanBuilder};
///
/// let plan = PlanBuilder::new()
///     .act_at("home", LinkId(0), Some(hms(8, 0, 0)))
///     .leg(Leg::drive(vec![LinkId(0), LinkId(1)]))
///     .act_open("work", LinkId(1))
///     .build();
/// assert_eq!(plan.len(), 3);
/// ```
#[derive(Default)]
pub struct PlanBuilder {
    elements: Vec<PlanElement>,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an activity at `link` ending at `end_time`.
    pub fn act_at(mut self, act_type: &str, link: qnet_core::LinkId, end_time: Option<Time>) -> Self {
        self.elements.push(PlanElement::Activity(Activity::at_link(act_type, link, end_time)));
        self
    }

    /// Append an activity with a maximum duration instead of an end time.
    pub fn act_for(mut self, act_type: &str, link: qnet_core::LinkId, max_duration: u32) -> Self {
        let mut act = Activity::at_link(act_type, link, None);
        act.max_duration = Some(max_duration);
        self.elements.push(PlanElement::Activity(act));
        self
    }

    /// Append an open-ended activity (no end time, no duration) — only valid
    /// as a plan's final element.
    pub fn act_open(mut self, act_type: &str, link: qnet_core::LinkId) -> Self {
        self.elements.push(PlanElement::Activity(Activity::at_link(act_type, link, None)));
        self
    }

    /// Append an arbitrary activity.
    pub fn activity(mut self, act: Activity) -> Self {
        self.elements.push(PlanElement::Activity(act));
        self
    }

    /// Append a leg.
    pub fn leg(mut self, leg: Leg) -> Self {
        self.elements.push(PlanElement::Leg(leg));
        self
    }

    pub fn build(self) -> Plan {
        Plan::from_elements(self.elements)
    }
}
