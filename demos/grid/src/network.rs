//! Synthetic grid network plus a small breadth-first router for demo plans.
//!
//! Production scenarios ship pre-routed plans; this router exists only so the
//! demo can synthesize contiguous routes on the fly.

use std::collections::VecDeque;

use qnet_core::{Coord, LinkId};
use qnet_network::{Network, NetworkBuilder, NetworkError};

pub const GRID_N: usize = 6;

const SPACING_M:   f64 = 500.0;
const FREESPEED:   f64 = 13.9;    // ~50 km/h
const LANES:       f64 = 1.0;
const CAPACITY_VH: f64 = 1_000.0; // vehicles per hour

/// An `N × N` Manhattan grid with one directed link per direction between
/// neighboring nodes.
pub fn build_grid() -> Result<Network, NetworkError> {
    let mut b = NetworkBuilder::with_capacity(GRID_N * GRID_N, 4 * GRID_N * (GRID_N - 1));

    let mut nodes = Vec::with_capacity(GRID_N * GRID_N);
    for y in 0..GRID_N {
        for x in 0..GRID_N {
            nodes.push(b.add_node(Coord::new(x as f64 * SPACING_M, y as f64 * SPACING_M)));
        }
    }
    let at = |x: usize, y: usize| nodes[y * GRID_N + x];

    for y in 0..GRID_N {
        for x in 0..GRID_N {
            if x + 1 < GRID_N {
                b.add_link(at(x, y), at(x + 1, y), SPACING_M, FREESPEED, LANES, CAPACITY_VH);
                b.add_link(at(x + 1, y), at(x, y), SPACING_M, FREESPEED, LANES, CAPACITY_VH);
            }
            if y + 1 < GRID_N {
                b.add_link(at(x, y), at(x, y + 1), SPACING_M, FREESPEED, LANES, CAPACITY_VH);
                b.add_link(at(x, y + 1), at(x, y), SPACING_M, FREESPEED, LANES, CAPACITY_VH);
            }
        }
    }

    b.build()
}

/// Shortest link path from `from` to `to` by hop count, both ends inclusive.
/// `None` only if `to` is unreachable, which cannot happen on the grid.
pub fn route_between(network: &Network, from: LinkId, to: LinkId) -> Option<Vec<LinkId>> {
    if from == to {
        return Some(vec![from]);
    }

    let mut prev: Vec<Option<LinkId>> = vec![None; network.link_count()];
    let mut frontier = VecDeque::new();
    prev[from.index()] = Some(from); // visited marker
    frontier.push_back(from);

    while let Some(current) = frontier.pop_front() {
        let junction = network.link(current).expect("link ids are dense").to;
        for &next in network.out_links(junction) {
            if prev[next.index()].is_some() {
                continue;
            }
            prev[next.index()] = Some(current);
            if next == to {
                let mut path = vec![to];
                let mut at = current;
                while at != from {
                    path.push(at);
                    at = prev[at.index()].expect("predecessor recorded");
                }
                path.push(from);
                path.reverse();
                return Some(path);
            }
            frontier.push_back(next);
        }
    }
    None
}
