//! Plan-executing agents.
//!
//! # Design
//!
//! The plan is the genotype and stays immutable; `PlanAgent` is the
//! phenotype — a cursor into the plan plus the minimal execution state (where
//! am I, in which vehicle, how far along the route).  Control alternates
//! between the agent and the engine:
//!
//! - while the agent rests at an activity or rides a teleport, the engine
//!   only holds a wake-up entry in a time queue;
//! - while the agent drives, its vehicle lives in link queues and the engine
//!   moves it; the agent is consulted for "where next?".
//!
//! The two `*_and_assume_control` transitions mirror that hand-over: the
//! agent takes the clock, emits its events, advances the cursor, and installs
//! whatever the engine needs to wake it again.
//!
//! Load-time validation guarantees structural soundness of every plan, so a
//! transition that walks off the end of a plan or finds a leg where an
//! activity belongs is an engine defect and panics rather than erroring.

use qnet_core::{LinkId, PersonId, Time, VehicleId};
use qnet_events::EventKind;
use qnet_population::{Plan, PlanElement, Route};

use crate::context::SimContext;

// ── AgentState ────────────────────────────────────────────────────────────────

/// Where an agent currently is in its day.
///
/// `Departing` and `Arriving` are transient within a single transition; the
/// states observable between steps are the other four.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AgentState {
    /// Resting at an activity; a wake-up is registered at its end time.
    AtActivity,
    /// Mid-transition out of an activity.
    Departing,
    /// Driving: the agent's vehicle is in some link queue or wait list.
    OnLink,
    /// Riding a teleported leg; a wake-up is registered at arrival time.
    Teleporting,
    /// Mid-transition into an activity.
    Arriving,
    /// The plan is exhausted; the agent takes no further part in the day.
    Finished,
}

// ── PlanAgent ─────────────────────────────────────────────────────────────────

/// Execution state of one person's day.
pub struct PlanAgent {
    person: PersonId,
    state:  AgentState,

    /// Index of the current plan element.
    cursor: usize,

    /// End of the current activity; `Time::NEVER` while traveling or done.
    activity_end: Time,

    /// The link the agent is currently at or on.
    current_link: LinkId,

    /// Vehicle of the current network leg; `INVALID` otherwise.
    vehicle: VehicleId,

    /// Index into the current network route's link sequence.
    route_pos: usize,
}

impl PlanAgent {
    /// Set up an agent at its first activity.
    ///
    /// The initial activity's end is its absolute end time, or `start` plus
    /// its maximum duration, clamped to no earlier than `start`.  A
    /// single-element plan is complete before the day begins.
    pub fn new(person: PersonId, plan: &Plan, start: Time) -> Self {
        let act = plan.first_activity().expect("validated plan starts with an activity");
        let current_link = act.link.expect("validated activity has a link");

        let (state, activity_end) = if plan.len() == 1 {
            (AgentState::Finished, Time::NEVER)
        } else {
            let end = act
                .end_time
                .unwrap_or_else(|| {
                    start.offset(act.max_duration.expect("validated activity has a departure"))
                })
                .max(start);
            (AgentState::AtActivity, end)
        };

        Self {
            person,
            state,
            cursor: 0,
            activity_end,
            current_link,
            vehicle: VehicleId::INVALID,
            route_pos: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn person(&self) -> PersonId {
        self.person
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == AgentState::Finished
    }

    /// End of the current activity; `Time::NEVER` while traveling.
    pub fn activity_end_time(&self) -> Time {
        self.activity_end
    }

    pub fn current_link(&self) -> LinkId {
        self.current_link
    }

    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    /// The plan element the cursor points at.
    pub fn current_plan_element<'p>(&self, plan: &'p Plan) -> Option<&'p PlanElement> {
        plan.element(self.cursor)
    }

    /// The plan element after the current one; `None` once the cursor is on
    /// the plan's last element.  Read-only lookahead — the cursor does not
    /// move.
    pub fn next_plan_element<'p>(&self, plan: &'p Plan) -> Option<&'p PlanElement> {
        plan.element(self.cursor + 1)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Leave the current activity and start the following leg.
    ///
    /// Emits the activity-end and departure events, then either registers the
    /// vehicle on the departure link's wait list (network leg) or a teleport
    /// arrival wake-up (teleported leg).
    pub fn end_activity_and_assume_control(
        &mut self,
        now:  Time,
        plan: &Plan,
        ctx:  &mut SimContext,
    ) {
        assert_eq!(self.state, AgentState::AtActivity, "{} ended a non-activity", self.person);
        let act = plan
            .element(self.cursor)
            .and_then(PlanElement::as_activity)
            .expect("cursor on an activity");
        ctx.events.emit(EventKind::ActivityEnd {
            person:   self.person,
            link:     self.current_link,
            act_type: act.act_type.clone(),
        });

        self.state = AgentState::Departing;
        self.activity_end = Time::NEVER;
        self.cursor += 1;
        let leg = plan
            .element(self.cursor)
            .and_then(PlanElement::as_leg)
            .expect("validated plan alternates activity and leg");
        ctx.events.emit(EventKind::Departure {
            person: self.person,
            link:   self.current_link,
            mode:   leg.mode,
        });

        match &leg.route {
            Route::Network { links, vehicle } => {
                self.vehicle = vehicle.unwrap_or_else(|| VehicleId::for_person(self.person));
                self.route_pos = 0;
                self.current_link = links[0];
                self.state = AgentState::OnLink;
                ctx.queue_mut(links[0]).push_waiting(self.vehicle, self.person, now);
            }
            Route::Generic { .. } => {
                let travel_time =
                    leg.teleport_travel_time().expect("validated teleported leg");
                self.state = AgentState::Teleporting;
                ctx.teleport_schedule.push(now.offset(travel_time), self.person);
            }
        }
    }

    /// Complete the current leg and start the following activity.
    ///
    /// Emits the arrival and activity-start events.  On a non-final activity,
    /// computes the end time (absolute end, or arrival plus maximum duration,
    /// but never earlier than the next step) and registers the wake-up.  On
    /// the final activity the agent is finished, whatever end fields it
    /// carries — there is no leg left to depart on.
    pub fn end_leg_and_assume_control(
        &mut self,
        now:  Time,
        plan: &Plan,
        ctx:  &mut SimContext,
    ) {
        assert!(
            matches!(self.state, AgentState::OnLink | AgentState::Teleporting),
            "{} ended a leg it was not on",
            self.person
        );
        self.state = AgentState::Arriving;
        let leg = plan
            .element(self.cursor)
            .and_then(PlanElement::as_leg)
            .expect("cursor on a leg");
        ctx.events.emit(EventKind::Arrival {
            person: self.person,
            link:   self.current_link,
            mode:   leg.mode,
        });

        self.cursor += 1;
        self.vehicle = VehicleId::INVALID;
        self.route_pos = 0;
        let act = plan
            .element(self.cursor)
            .and_then(PlanElement::as_activity)
            .expect("validated plan alternates leg and activity");
        self.current_link = act.link.expect("validated activity has a link");
        ctx.events.emit(EventKind::ActivityStart {
            person:   self.person,
            link:     self.current_link,
            act_type: act.act_type.clone(),
        });

        if self.cursor + 1 == plan.len() {
            self.state = AgentState::Finished;
            return;
        }

        let end = match (act.end_time, act.max_duration) {
            (Some(end), _)       => end,
            (None, Some(dur))    => now.offset(dur),
            (None, None)         => unreachable!("validated non-final activity has a departure"),
        };
        // Arriving after the planned end still means staying one step: an
        // agent never ends an activity in the same step it started it.
        let end = end.max(now.offset(1));
        self.activity_end = end;
        self.state = AgentState::AtActivity;
        ctx.activity_schedule.push(end, self.person);
    }

    /// Place the agent at `link` without traversing the network — used when a
    /// teleported leg completes and when a stuck vehicle is pulled out.
    pub fn notify_teleport_to_link(&mut self, link: LinkId) {
        self.current_link = link;
    }

    // ── Route queries ─────────────────────────────────────────────────────

    /// The link after the current one on the active network route, or `None`
    /// when the current link is the route's last (the vehicle arrives there).
    pub fn next_route_link(&self, plan: &Plan) -> Option<LinkId> {
        let leg = plan
            .element(self.cursor)
            .and_then(PlanElement::as_leg)
            .expect("cursor on a leg");
        match &leg.route {
            Route::Network { links, .. } => links.get(self.route_pos + 1).copied(),
            Route::Generic { .. } => None,
        }
    }

    /// Advance the route cursor after the engine moved the vehicle onto
    /// `link`.
    pub fn advance_to_link(&mut self, link: LinkId) {
        debug_assert_eq!(self.state, AgentState::OnLink);
        self.route_pos += 1;
        self.current_link = link;
    }

    /// Where the current leg ends: the network route's last link, or the
    /// upcoming activity's link for teleported legs.
    pub fn leg_destination(&self, plan: &Plan) -> LinkId {
        let leg = plan
            .element(self.cursor)
            .and_then(PlanElement::as_leg)
            .expect("cursor on a leg");
        match &leg.route {
            Route::Network { .. } => {
                leg.route.end_link().expect("validated network route is non-empty")
            }
            Route::Generic { .. } => plan
                .element(self.cursor + 1)
                .and_then(PlanElement::as_activity)
                .expect("validated plan alternates leg and activity")
                .link
                .expect("validated activity has a link"),
        }
    }
}
