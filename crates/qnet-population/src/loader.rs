//! CSV plan loader — scenario tooling, not part of the core contract.
//!
//! # CSV format
//!
//! One row per plan element, grouped by person:
//!
//! ```csv
//! person_id,element,kind,label,link,x,y,end_time,max_duration,travel_time,route
//! 0,0,act,home,0,,,28800,,,
//! 0,1,leg,car,,,,,,,0 1 2
//! 0,2,act,work,2,,,,,,
//! 1,0,act,home,,100.0,50.0,30600,,,
//! 1,1,leg,walk,,,,,,900,
//! 1,2,act,shop,3,,,,,,
//! ```
//!
//! | Column         | `act` rows                  | `leg` rows                    |
//! |----------------|-----------------------------|-------------------------------|
//! | `label`        | activity type tag           | mode (`car`, `walk`, …)       |
//! | `link`         | link id (optional if x/y)   | —                             |
//! | `x`, `y`       | coordinate (optional)       | —                             |
//! | `end_time`     | end, seconds since midnight | —                             |
//! | `max_duration` | max stay, seconds           | —                             |
//! | `travel_time`  | —                           | teleport duration, seconds    |
//! | `route`        | —                           | space-separated link ids; a   |
//! |                |                             | present route ⇒ network leg   |
//!
//! Person ids must be dense (`0..n`); element indices must be dense within
//! each person.  Rows may appear in any order.  The loader only assembles
//! plans — structural validation happens in
//! [`Population::validate`](crate::Population::validate).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use qnet_core::{Coord, LegMode, LinkId, Time};

use crate::plan::{Activity, Leg, Plan, PlanElement, Route};
use crate::{Population, PopulationError};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PlanRecord {
    person_id:    u32,
    element:      u32,
    kind:         String,
    label:        String,
    link:         Option<u32>,
    x:            Option<f64>,
    y:            Option<f64>,
    end_time:     Option<u32>,
    max_duration: Option<u32>,
    travel_time:  Option<u32>,
    route:        Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Population`] from a plans CSV file.
pub fn load_population(path: &Path) -> Result<Population, PopulationError> {
    load_population_from_reader(std::fs::File::open(path)?)
}

/// Load a [`Population`] from any `Read` source.
pub fn load_population_from_reader<R: Read>(reader: R) -> Result<Population, PopulationError> {
    let mut rows: BTreeMap<u32, Vec<(u32, PlanElement)>> = BTreeMap::new();

    for result in csv::Reader::from_reader(reader).deserialize() {
        let rec: PlanRecord = result?;
        let element = parse_element(&rec)?;
        rows.entry(rec.person_id).or_default().push((rec.element, element));
    }

    let mut plans: Vec<Plan> = Vec::with_capacity(rows.len());
    for (expected_id, (person_id, mut elements)) in rows.into_iter().enumerate() {
        if person_id as usize != expected_id {
            return Err(PopulationError::Parse(format!(
                "person ids must be dense: expected {expected_id}, found {person_id}"
            )));
        }
        elements.sort_by_key(|(idx, _)| *idx);
        for (slot, (idx, _)) in elements.iter().enumerate() {
            if *idx as usize != slot {
                return Err(PopulationError::Parse(format!(
                    "person {person_id}: element indices must be dense, found {idx} at slot {slot}"
                )));
            }
        }
        plans.push(Plan::from_elements(
            elements.into_iter().map(|(_, e)| e).collect(),
        ));
    }

    Ok(Population::from_plans(plans))
}

// ── Row parsing ───────────────────────────────────────────────────────────────

fn parse_element(rec: &PlanRecord) -> Result<PlanElement, PopulationError> {
    match rec.kind.as_str() {
        "act" => {
            let coord = match (rec.x, rec.y) {
                (Some(x), Some(y)) => Some(Coord::new(x, y)),
                (None, None) => None,
                _ => {
                    return Err(PopulationError::Parse(format!(
                        "person {}: activity row needs both x and y or neither",
                        rec.person_id
                    )));
                }
            };
            Ok(PlanElement::Activity(Activity {
                act_type:     rec.label.clone(),
                link:         rec.link.map(LinkId),
                coord,
                end_time:     rec.end_time.map(Time),
                max_duration: rec.max_duration,
            }))
        }
        "leg" => {
            let route = match rec.route.as_deref().map(str::trim) {
                Some(s) if !s.is_empty() => {
                    let links = s
                        .split_whitespace()
                        .map(|tok| {
                            tok.parse::<u32>().map(LinkId).map_err(|_| {
                                PopulationError::Parse(format!(
                                    "person {}: bad link id {tok:?} in route",
                                    rec.person_id
                                ))
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    Route::Network { links, vehicle: None }
                }
                _ => Route::Generic { travel_time: rec.travel_time, distance: None },
            };
            Ok(PlanElement::Leg(Leg {
                mode:        LegMode::parse(&rec.label),
                dep_time:    None,
                travel_time: rec.travel_time,
                route,
            }))
        }
        other => Err(PopulationError::Parse(format!(
            "person {}: unknown element kind {other:?} (expected \"act\" or \"leg\")",
            rec.person_id
        ))),
    }
}
