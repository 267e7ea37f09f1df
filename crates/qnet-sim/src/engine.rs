//! The deterministic step loop.
//!
//! # Step structure
//!
//! Every simulated second runs three phases in fixed order:
//!
//! 1. **Activity phase** — agents whose activity ends now depart, in
//!    ascending person id order.
//! 2. **Link phase** — outflow budgets accrue, then every link admits
//!    waiting departures and releases eligible vehicles, sweeping all links
//!    in ascending link id order and repeating the sweep until no vehicle
//!    moves.  The fixed point lets storage freed anywhere this step propagate
//!    upstream through an arbitrarily long spillback chain within the same
//!    second.  Afterwards, vehicles that have been blocked past the stuck
//!    threshold are pulled out.
//! 3. **Teleport phase** — teleported legs arriving now complete, in
//!    ascending person id order.
//!
//! Identical input therefore yields an identical event stream: all iteration
//! orders are id-derived and the event stream itself orders same-second
//! events by a declared priority.

use qnet_core::{PersonId, SimConfig, StuckPolicy, Time};
use qnet_events::{Event, EventKind};
use qnet_network::Network;
use qnet_population::Population;

use crate::agent::PlanAgent;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::link_queue::LinkQueue;
use crate::observer::{NoopObserver, SimObserver};

// ── SimReport ─────────────────────────────────────────────────────────────────

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct SimReport {
    /// Clock value after the last executed step.  Earlier than the configured
    /// end when every agent finished and the network drained before it.
    pub completed_at: Time,

    pub persons: usize,

    /// Agents still mid-plan when the day ended, ascending by id.  Being
    /// unfinished is a scoring concern, not an error.
    pub unfinished: Vec<PersonId>,

    pub events_emitted: usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// A fully assembled simulation, ready to run one day.
///
/// Construct via [`SimBuilder`](crate::SimBuilder).
pub struct Sim {
    pub(crate) config:     SimConfig,
    pub(crate) now:        Time,
    pub(crate) population: Population,
    pub(crate) agents:     Vec<PlanAgent>,
    pub(crate) ctx:        SimContext,
}

impl Sim {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn now(&self) -> Time {
        self.now
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        self.ctx.network()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn agents(&self) -> &[PlanAgent] {
        &self.agents
    }

    #[inline]
    pub fn agent(&self, person: PersonId) -> Option<&PlanAgent> {
        self.agents.get(person.index())
    }

    /// The flushed event stream.  Complete only after [`run`](Self::run)
    /// returned.
    pub fn events(&self) -> &[Event] {
        self.ctx.events.events()
    }

    /// Consume the simulation, yielding the full event log.
    ///
    /// # Panics
    /// Panics if the run never completed.
    pub fn into_events(self) -> Vec<Event> {
        self.ctx.events.into_events()
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Run the whole day without an observer.
    pub fn run(&mut self) -> SimResult<SimReport> {
        self.run_with(&mut NoopObserver)
    }

    /// Run the whole day, reporting progress to `observer`.
    ///
    /// Stops at the configured end time, or earlier once every agent is done
    /// and the network is empty.  Under [`StuckPolicy::Abort`] the first
    /// stuck vehicle fails the run.
    pub fn run_with(&mut self, observer: &mut impl SimObserver) -> SimResult<SimReport> {
        observer.on_sim_start(self.now, self.agents.len());

        while self.now < self.config.end_time {
            let now = self.now;
            self.ctx.events.advance(now);
            observer.on_step_start(now);
            self.step(now)?;
            observer.on_step_end(now);
            self.now = now + 1;
            if self.is_drained() {
                break;
            }
        }

        self.ctx.events.finish();
        let unfinished: Vec<PersonId> = self
            .agents
            .iter()
            .filter(|a| !a.is_finished())
            .map(PlanAgent::person)
            .collect();
        let report = SimReport {
            completed_at:   self.now,
            persons:        self.agents.len(),
            unfinished,
            events_emitted: self.ctx.events.len(),
        };
        observer.on_sim_end(&report);
        Ok(report)
    }

    /// Nothing scheduled and no vehicle anywhere: the rest of the day is
    /// silence.
    fn is_drained(&self) -> bool {
        self.ctx.activity_schedule.is_empty()
            && self.ctx.teleport_schedule.is_empty()
            && self.ctx.queues.iter().all(LinkQueue::is_idle)
    }

    // ── One step ──────────────────────────────────────────────────────────

    fn step(&mut self, now: Time) -> SimResult<()> {
        // Phase 1: activity ends.
        for person in self.ctx.activity_schedule.drain_due(now) {
            let plan = &self.population.person(person).expect("scheduled person exists").plan;
            self.agents[person.index()].end_activity_and_assume_control(now, plan, &mut self.ctx);
        }

        // Phase 2: link flow.
        for queue in &mut self.ctx.queues {
            queue.refresh_budget();
        }
        loop {
            let mut progress = false;
            for idx in 0..self.ctx.queues.len() {
                progress |= self.process_link(idx, now);
            }
            if !progress {
                break;
            }
        }
        self.resolve_stuck(now)?;

        // Phase 3: teleport arrivals.
        for person in self.ctx.teleport_schedule.drain_due(now) {
            let plan = &self.population.person(person).expect("scheduled person exists").plan;
            let agent = &mut self.agents[person.index()];
            let destination = agent.leg_destination(plan);
            agent.notify_teleport_to_link(destination);
            agent.end_leg_and_assume_control(now, plan, &mut self.ctx);
        }

        Ok(())
    }

    /// Admit and release what can move on link `idx`; `true` if anything did.
    ///
    /// Each inner scan picks at most one vehicle to move, so a release that
    /// changes eligibility (or frees space on this very link, for self-loops)
    /// is observed by the next scan rather than invalidating positions
    /// mid-iteration.
    fn process_link(&mut self, idx: usize, now: Time) -> bool {
        let mut progress = self.ctx.queues[idx].admit_waiting() > 0;

        loop {
            let mut from = 0;
            let mut released = false;
            while let Some(pos) = self.ctx.queues[idx].next_candidate(now, from) {
                let driver = self.ctx.queues[idx].vehicle_at(pos).driver;
                let plan = &self.population.person(driver).expect("driver in population").plan;
                match self.agents[driver.index()].next_route_link(plan) {
                    // Final route link: the vehicle parks and its driver
                    // starts the next activity.  No budget, no link events.
                    None => {
                        self.ctx.queues[idx].remove_arrival(pos);
                        self.agents[driver.index()]
                            .end_leg_and_assume_control(now, plan, &mut self.ctx);
                        released = true;
                        break;
                    }
                    Some(next) => {
                        let movable = self.ctx.queues[idx].outflow_budget() >= 1.0
                            && self.ctx.queue(next).has_space();
                        if movable {
                            let veh  = self.ctx.queues[idx].release_at(pos);
                            let link = self.ctx.queues[idx].link();
                            self.ctx.events.emit(EventKind::LinkLeave {
                                vehicle: veh.vehicle,
                                link,
                            });
                            self.ctx.queue_mut(next).admit(veh.vehicle, veh.driver, now);
                            self.ctx.events.emit(EventKind::LinkEnter {
                                vehicle: veh.vehicle,
                                link:    next,
                            });
                            self.agents[driver.index()].advance_to_link(next);
                            released = true;
                            break;
                        }
                        // Blocked by budget or downstream storage.  Under
                        // FIFO the scan ends here (next_candidate yields
                        // nothing past the front); under Passing the next
                        // eligible vehicle gets its turn.
                        from = pos + 1;
                    }
                }
            }
            if !released {
                break;
            }
            progress = true;
        }
        progress
    }

    /// Pull out vehicles blocked past the stuck threshold.
    fn resolve_stuck(&mut self, now: Time) -> SimResult<()> {
        for idx in 0..self.ctx.queues.len() {
            let stuck = self.ctx.queues[idx].take_stuck(now, self.config.stuck_time);
            if stuck.is_empty() {
                continue;
            }
            let link = self.ctx.queues[idx].link();
            for veh in stuck {
                match self.config.stuck_policy {
                    StuckPolicy::Abort => {
                        return Err(SimError::Stuck { person: veh.driver, link, time: now });
                    }
                    StuckPolicy::TeleportOut => {
                        self.ctx.events.emit(EventKind::Stuck { person: veh.driver, link });
                        let plan =
                            &self.population.person(veh.driver).expect("driver in population").plan;
                        let agent = &mut self.agents[veh.driver.index()];
                        let destination = agent.leg_destination(plan);
                        agent.notify_teleport_to_link(destination);
                        agent.end_leg_and_assume_control(now, plan, &mut self.ctx);
                    }
                }
            }
        }
        Ok(())
    }
}
