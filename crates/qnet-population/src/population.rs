//! `Person`, `Population`, location resolution, and load-time validation.
//!
//! Malformed plans are rejected here, before simulation starts — the engine
//! may assume every plan it executes is structurally sound and treats any
//! violation it still encounters as an internal defect, not bad input.

use qnet_core::PersonId;
use qnet_network::Network;

use crate::plan::{Plan, PlanElement, Route};
use crate::PopulationError;

// ── Person / Population ───────────────────────────────────────────────────────

/// One traveler with a selected plan.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    pub id:   PersonId,
    pub plan: Plan,
}

/// All travelers, indexed by `PersonId`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    persons: Vec<Person>,
}

impl Population {
    /// Build from a plan per person; ids are assigned sequentially from 0.
    pub fn from_plans(plans: Vec<Plan>) -> Self {
        let persons = plans
            .into_iter()
            .enumerate()
            .map(|(i, plan)| Person { id: PersonId(i as u32), plan })
            .collect();
        Self { persons }
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    #[inline]
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(id.index())
    }

    // ── Location resolution ───────────────────────────────────────────────

    /// Fill in each activity's missing `link` from its coordinate via the
    /// network's nearest-link index.
    ///
    /// Runs before [`validate`](Self::validate); activities with neither link
    /// nor coordinate are left untouched and rejected there.
    pub fn resolve_locations(&mut self, network: &Network) {
        for person in &mut self.persons {
            // Plans are immutable during a simulated day; this pass is part
            // of loading, before the day starts.
            let elements = std::mem::take(&mut person.plan);
            let mut elements = elements.into_elements();
            for element in &mut elements {
                if let PlanElement::Activity(act) = element {
                    if act.link.is_none() {
                        if let Some(coord) = act.coord {
                            act.link = network.nearest_link(coord);
                        }
                    }
                }
            }
            person.plan = Plan::from_elements(elements);
        }
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Check every person's plan against the structural rules.
    ///
    /// Rules (all fatal at load):
    /// - plan is non-empty, starts and ends with an activity, and alternates
    ///   strictly between activities and legs;
    /// - every activity names a link (after location resolution);
    /// - every non-final activity has exactly one of end time / max duration;
    /// - every network route is a non-empty contiguous path of known links;
    /// - every teleported leg has a travel time.
    ///
    /// With the `parallel` feature the per-person checks run on Rayon; the
    /// reported error is always the lowest-id offender, so the result is
    /// deterministic either way.
    pub fn validate(&self, network: &Network) -> Result<(), PopulationError> {
        #[cfg(not(feature = "parallel"))]
        {
            for person in &self.persons {
                validate_plan(person.id, &person.plan, network)?;
            }
            Ok(())
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let mut failures: Vec<PopulationError> = self
                .persons
                .par_iter()
                .filter_map(|person| validate_plan(person.id, &person.plan, network).err())
                .collect();
            failures.sort_by_key(PopulationError::person);
            match failures.into_iter().next() {
                None      => Ok(()),
                Some(err) => Err(err),
            }
        }
    }
}

// ── Per-plan validation ───────────────────────────────────────────────────────

fn validate_plan(
    person:  PersonId,
    plan:    &Plan,
    network: &Network,
) -> Result<(), PopulationError> {
    if plan.is_empty() {
        return Err(PopulationError::EmptyPlan(person));
    }

    let elements = plan.elements();
    let last = elements.len() - 1;

    for (index, element) in elements.iter().enumerate() {
        let expect_activity = index % 2 == 0;
        match element {
            PlanElement::Activity(act) => {
                if !expect_activity {
                    return Err(PopulationError::BadAlternation { person, index });
                }
                if act.link.is_none() {
                    return Err(PopulationError::MissingLocation { person, index });
                }
                let determinants =
                    act.end_time.is_some() as u8 + act.max_duration.is_some() as u8;
                if index != last && determinants != 1 {
                    return Err(PopulationError::BadDeparture { person, index });
                }
            }
            PlanElement::Leg(leg) => {
                if expect_activity {
                    return Err(PopulationError::BadAlternation { person, index });
                }
                match &leg.route {
                    Route::Network { links, .. } => {
                        if links.is_empty() {
                            return Err(PopulationError::EmptyRoute { person, index });
                        }
                        if !network.is_contiguous_path(links) {
                            return Err(PopulationError::DiscontiguousRoute { person, index });
                        }
                    }
                    Route::Generic { .. } => {
                        if leg.teleport_travel_time().is_none() {
                            return Err(PopulationError::MissingTravelTime { person, index });
                        }
                    }
                }
            }
        }
    }

    // Even length means the plan ends with a leg.
    if elements.len() % 2 == 0 {
        return Err(PopulationError::BadAlternation { person, index: last });
    }

    Ok(())
}
