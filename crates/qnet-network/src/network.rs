//! Network representation and builder.
//!
//! # Data layout
//!
//! Nodes and links live in `Vec`s indexed by their ids, which are assigned
//! sequentially by the builder and stable thereafter (routes reference links
//! by id, so links are never re-ordered).  Out-link adjacency uses a
//! **Compressed Sparse Row (CSR)** indirection: given a `NodeId n`, the ids
//! of its outgoing links occupy the slice
//!
//! ```text
//! out_links[ out_start[n] .. out_start[n+1] ]
//! ```
//!
//! Iteration over a node's out-links is therefore a contiguous memory scan.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps planar coordinates to the nearest link's
//! midpoint.  Used at load time to resolve coordinate-only activities to a
//! link; never queried on the per-step hot path.
//!
//! Links are immutable after `build()` — capacity changes between simulated
//! days go through rebuilding the network, not mutation.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use qnet_core::{Coord, LinkId, NodeId};

use crate::NetworkError;

/// Vehicle cell length in metres: how much link length one queued vehicle
/// occupies when computing storage capacity.
pub const CELL_SIZE_M: f64 = 7.5;

// ── Node / Link ───────────────────────────────────────────────────────────────

/// A network vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id:    NodeId,
    pub coord: Coord,
}

/// A directed network edge with physical attributes.
///
/// Exactly one upstream (`from`) and one downstream (`to`) node — enforced by
/// the builder.  `capacity` is expressed in vehicles per the configured
/// capacity period (conventionally one hour); the per-second outflow is
/// derived at simulation setup, not stored here.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub id:   LinkId,
    pub from: NodeId,
    pub to:   NodeId,

    /// Physical length in metres.
    pub length: f64,

    /// Free-flow speed in metres per second.
    pub freespeed: f64,

    /// Number of lanes (fractional lanes allowed, as in lane-sharing setups).
    pub lanes: f64,

    /// Flow capacity in vehicles per capacity period.
    pub capacity: f64,
}

impl Link {
    /// Free-flow traversal time in whole seconds, never less than one.
    ///
    /// Rounded up: a vehicle may not exit earlier than its physics allow.
    #[inline]
    pub fn freeflow_travel_time(&self) -> u32 {
        ((self.length / self.freespeed).ceil() as u32).max(1)
    }

    /// Maximum vehicles held concurrently, scaled by the configured storage
    /// capacity factor.  Never below one — every link must be able to hold at
    /// least the vehicle currently traversing it.
    #[inline]
    pub fn storage_capacity(&self, storage_factor: f64) -> u32 {
        ((self.length * self.lanes / CELL_SIZE_M * storage_factor).ceil() as u32).max(1)
    }
}

// ── R-tree link entry ─────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a link's midpoint with its id.
#[derive(Clone, Debug)]
struct LinkEntry {
    point: [f64; 2],
    id:    LinkId,
}

impl RTreeObject for LinkEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LinkEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Immutable directed network plus a spatial index for location resolution.
///
/// Do not construct directly; use [`NetworkBuilder`].
#[derive(Debug)]
pub struct Network {
    nodes: Vec<Node>,
    links: Vec<Link>,

    /// CSR row pointer: out-links of node `n` are
    /// `out_links[out_start[n]..out_start[n+1]]`.  Length = node_count + 1.
    out_start: Vec<u32>,
    /// Link ids grouped by upstream node (ascending node, then ascending id).
    out_links: Vec<LinkId>,

    spatial_idx: RTree<LinkEntry>,
}

impl Network {
    /// A network with no nodes or links.  Any location resolution against it
    /// fails; useful only for teleport-only scenarios and tests.
    pub fn empty() -> Self {
        NetworkBuilder::new().build().expect("empty network is always valid")
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index())
    }

    /// All links in id order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ids of all links leaving `node`, ascending.  Contiguous scan, no
    /// allocation.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> &[LinkId] {
        let start = self.out_start[node.index()] as usize;
        let end   = self.out_start[node.index() + 1] as usize;
        &self.out_links[start..end]
    }

    // ── Route support ─────────────────────────────────────────────────────

    /// `true` if every link exists and each link's downstream node is the
    /// next link's upstream node.  An empty sequence is not contiguous.
    pub fn is_contiguous_path(&self, links: &[LinkId]) -> bool {
        if links.is_empty() {
            return false;
        }
        let mut prev_to: Option<NodeId> = None;
        for &id in links {
            let Some(link) = self.link(id) else { return false };
            if let Some(expected_from) = prev_to {
                if link.from != expected_from {
                    return false;
                }
            }
            prev_to = Some(link.to);
        }
        true
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The link whose midpoint is nearest to `coord`, or `None` on an empty
    /// network.
    pub fn nearest_link(&self, coord: Coord) -> Option<LinkId> {
        self.spatial_idx
            .nearest_neighbor(&[coord.x, coord.y])
            .map(|e| e.id)
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// Nodes and links may be added in any order; `build()` validates link
/// endpoints, constructs the CSR adjacency, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use qnet_core::Coord;
/// use qnet_network::NetworkBuilder;
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node(Coord::new(0.0, 0.0));
/// let c = b.add_node(Coord::new(1_000.0, 0.0));
/// b.add_link(a, c, 1_000.0, 13.9, 1.0, 1_800.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.link_count(), 1);
/// ```
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), links: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and links.
    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            links: Vec::with_capacity(links),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, coord: Coord) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { id, coord });
        id
    }

    /// Add a directed link and return its `LinkId` (sequential from 0).
    ///
    /// - `length`: metres.  - `freespeed`: m/s.  - `lanes`: lane count.
    /// - `capacity`: vehicles per capacity period.
    pub fn add_link(
        &mut self,
        from:      NodeId,
        to:        NodeId,
        length:    f64,
        freespeed: f64,
        lanes:     f64,
        capacity:  f64,
    ) -> LinkId {
        let id = LinkId(self.links.len() as u32);
        self.links.push(Link { id, from, to, length, freespeed, lanes, capacity });
        id
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    /// Consume the builder and produce a [`Network`].
    ///
    /// # Errors
    ///
    /// [`NetworkError::UnknownNode`] if any link references a node that was
    /// never added, or has a non-positive length, speed, lane count, or
    /// negative capacity ([`NetworkError::BadAttribute`]).
    pub fn build(self) -> Result<Network, NetworkError> {
        let node_count = self.nodes.len();
        let link_count = self.links.len();

        for link in &self.links {
            for node in [link.from, link.to] {
                if node.index() >= node_count {
                    return Err(NetworkError::UnknownNode { link: link.id, node });
                }
            }
            if !(link.length > 0.0) || !(link.freespeed > 0.0) || !(link.lanes > 0.0) {
                return Err(NetworkError::BadAttribute(link.id));
            }
            if link.capacity < 0.0 {
                return Err(NetworkError::BadAttribute(link.id));
            }
        }

        // CSR adjacency: counting sort of link ids by upstream node keeps
        // out-link order ascending within each node.
        let mut out_start = vec![0u32; node_count + 1];
        for link in &self.links {
            out_start[link.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            out_start[i] += out_start[i - 1];
        }
        let mut cursor = out_start.clone();
        let mut out_links = vec![LinkId::INVALID; link_count];
        for link in &self.links {
            let slot = cursor[link.from.index()] as usize;
            out_links[slot] = link.id;
            cursor[link.from.index()] += 1;
        }
        debug_assert_eq!(out_start[node_count] as usize, link_count);

        // Bulk-load the R-tree over link midpoints.
        let entries: Vec<LinkEntry> = self
            .links
            .iter()
            .map(|link| {
                let mid = self.nodes[link.from.index()]
                    .coord
                    .midpoint(self.nodes[link.to.index()].coord);
                LinkEntry { point: [mid.x, mid.y], id: link.id }
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(Network {
            nodes: self.nodes,
            links: self.links,
            out_start,
            out_links,
            spatial_idx,
        })
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
