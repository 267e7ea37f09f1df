//! Simulation error type.

use thiserror::Error;

use qnet_core::{LinkId, PersonId, QnetError, Time};
use qnet_population::PopulationError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration: {0}")]
    Config(#[from] QnetError),

    #[error("population: {0}")]
    Population(#[from] PopulationError),

    /// Raised only under [`StuckPolicy::Abort`](qnet_core::StuckPolicy); the
    /// default policy teleports stuck agents out and keeps running.
    #[error("{person} stuck on {link} at {time}")]
    Stuck {
        person: PersonId,
        link:   LinkId,
        time:   Time,
    },
}

pub type SimResult<T> = Result<T, SimError>;
