//! `qnet-network` — network graph for the rust_qnet traffic simulation.
//!
//! Nodes and links with physical attributes (length, free-flow speed, lanes,
//! flow capacity), a builder that validates topology, CSR out-link adjacency,
//! an R-tree nearest-link index for resolving coordinate-only activity
//! locations, and a CSV scenario loader.
//!
//! Links are immutable after load; the per-day mutable queue state lives in
//! `qnet-sim`, keyed by `LinkId`.

pub mod error;
pub mod loader;
pub mod network;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::NetworkError;
pub use loader::{load_network, load_network_from_readers};
pub use network::{CELL_SIZE_M, Link, Network, NetworkBuilder, Node};
