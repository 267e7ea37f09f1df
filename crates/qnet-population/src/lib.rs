//! `qnet-population` — travelers and their day plans for rust_qnet.
//!
//! A [`Population`] holds one [`Person`] per traveler; each person owns one
//! *selected* [`Plan`]: an alternating Activity/Leg sequence that is
//! immutable while a simulated day runs.  Execution state lives in the
//! engine, never here.
//!
//! Structural rules (alternation, locations, route contiguity) are enforced
//! by [`Population::validate`] before any simulation starts; the CSV loader
//! deliberately accepts malformed plans so rejection happens in exactly one
//! place.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                          |
//! |------------|-------------------------------------------------|
//! | `parallel` | Validates persons on Rayon's thread pool.       |

pub mod error;
pub mod loader;
pub mod plan;
pub mod population;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::PopulationError;
pub use loader::{load_population, load_population_from_reader};
pub use plan::{Activity, Leg, Plan, PlanBuilder, PlanElement, Route};
pub use population::{Person, Population};

pub use qnet_core::LegMode;
