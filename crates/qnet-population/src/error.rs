use qnet_core::PersonId;
use thiserror::Error;

/// Load-time plan rejection.  `index` is the offending element's position in
/// the person's plan.
#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("person {0} has an empty plan")]
    EmptyPlan(PersonId),

    #[error("person {person}: plan element {index} breaks the activity/leg alternation")]
    BadAlternation { person: PersonId, index: usize },

    #[error("person {person}: activity at element {index} has neither link nor coordinate")]
    MissingLocation { person: PersonId, index: usize },

    #[error(
        "person {person}: activity at element {index} must have exactly one of \
         end_time / max_duration"
    )]
    BadDeparture { person: PersonId, index: usize },

    #[error("person {person}: leg at element {index} has an empty network route")]
    EmptyRoute { person: PersonId, index: usize },

    #[error("person {person}: leg at element {index} has a route that is not a contiguous path")]
    DiscontiguousRoute { person: PersonId, index: usize },

    #[error("person {person}: teleported leg at element {index} has no travel time")]
    MissingTravelTime { person: PersonId, index: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PopulationError {
    /// The person a validation error refers to, for deterministic
    /// lowest-id-first reporting.  I/O and CSV errors sort last.
    pub fn person(&self) -> PersonId {
        match self {
            PopulationError::EmptyPlan(p)
            | PopulationError::BadAlternation { person: p, .. }
            | PopulationError::MissingLocation { person: p, .. }
            | PopulationError::BadDeparture { person: p, .. }
            | PopulationError::EmptyRoute { person: p, .. }
            | PopulationError::DiscontiguousRoute { person: p, .. }
            | PopulationError::MissingTravelTime { person: p, .. } => *p,
            _ => PersonId::INVALID,
        }
    }
}
