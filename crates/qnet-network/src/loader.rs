//! CSV network loader — scenario tooling, not part of the core contract.
//!
//! # CSV formats
//!
//! `nodes.csv`, one row per node:
//!
//! ```csv
//! node_id,x,y
//! 0,0.0,0.0
//! 1,1000.0,0.0
//! ```
//!
//! `links.csv`, one row per directed link:
//!
//! ```csv
//! link_id,from_node,to_node,length,freespeed,lanes,capacity
//! 0,0,1,1000.0,13.9,1,1800
//! ```
//!
//! Ids must be dense (`0..n`) but rows may appear in any order.  Units:
//! metres, metres/second, vehicles per capacity period.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use qnet_core::{Coord, NodeId};

use crate::{Network, NetworkBuilder, NetworkError};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: u32,
    x:       f64,
    y:       f64,
}

#[derive(Deserialize)]
struct LinkRecord {
    link_id:   u32,
    from_node: u32,
    to_node:   u32,
    length:    f64,
    freespeed: f64,
    lanes:     f64,
    capacity:  f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Network`] from `nodes.csv` and `links.csv` files.
pub fn load_network(nodes_path: &Path, links_path: &Path) -> Result<Network, NetworkError> {
    let nodes = std::fs::File::open(nodes_path)?;
    let links = std::fs::File::open(links_path)?;
    load_network_from_readers(nodes, links)
}

/// Load a [`Network`] from any `Read` sources (files, in-memory buffers, …).
pub fn load_network_from_readers<N: Read, L: Read>(
    nodes: N,
    links: L,
) -> Result<Network, NetworkError> {
    let mut node_rows: Vec<Option<Coord>> = Vec::new();
    for result in csv::Reader::from_reader(nodes).deserialize() {
        let rec: NodeRecord = result?;
        let idx = rec.node_id as usize;
        if idx >= node_rows.len() {
            node_rows.resize(idx + 1, None);
        }
        if node_rows[idx].is_some() {
            return Err(NetworkError::DuplicateId { what: "node", id: rec.node_id });
        }
        node_rows[idx] = Some(Coord::new(rec.x, rec.y));
    }

    let mut link_rows: Vec<Option<LinkRecord>> = Vec::new();
    for result in csv::Reader::from_reader(links).deserialize() {
        let rec: LinkRecord = result?;
        let idx = rec.link_id as usize;
        if idx >= link_rows.len() {
            link_rows.resize_with(idx + 1, || None);
        }
        if link_rows[idx].is_some() {
            return Err(NetworkError::DuplicateId { what: "link", id: rec.link_id });
        }
        link_rows[idx] = Some(rec);
    }

    let mut builder = NetworkBuilder::with_capacity(node_rows.len(), link_rows.len());
    for (i, coord) in node_rows.into_iter().enumerate() {
        let Some(coord) = coord else {
            return Err(NetworkError::MissingId { what: "node", id: i as u32 });
        };
        builder.add_node(coord);
    }
    for (i, rec) in link_rows.into_iter().enumerate() {
        let Some(rec) = rec else {
            return Err(NetworkError::MissingId { what: "link", id: i as u32 });
        };
        builder.add_link(
            NodeId(rec.from_node),
            NodeId(rec.to_node),
            rec.length,
            rec.freespeed,
            rec.lanes,
            rec.capacity,
        );
    }

    builder.build()
}
