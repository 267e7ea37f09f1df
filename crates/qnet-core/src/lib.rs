//! `qnet-core` — foundational types for the `rust_qnet` traffic simulation.
//!
//! This crate is a dependency of every other `qnet-*` crate.  It intentionally
//! has no `qnet-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `PersonId`, `NodeId`, `LinkId`, `VehicleId`               |
//! | [`coord`]   | Planar `Coord`, Euclidean distance                        |
//! | [`time`]    | `Time` (simulation seconds), `hms` helper                 |
//! | [`config`]  | `SimConfig`, `QueueDiscipline`, `StuckPolicy`             |
//! | [`mode`]    | `LegMode` enum                                            |
//! | [`rng`]     | `SimRng` (scenario synthesis / calibration)               |
//! | [`error`]   | `QnetError`, `QnetResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod config;
pub mod coord;
pub mod error;
pub mod ids;
pub mod mode;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{QueueDiscipline, SimConfig, StuckPolicy};
pub use coord::Coord;
pub use error::{QnetError, QnetResult};
pub use ids::{LinkId, NodeId, PersonId, VehicleId};
pub use mode::LegMode;
pub use rng::SimRng;
pub use time::{Time, hms};
