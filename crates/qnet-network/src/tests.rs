//! Unit tests for qnet-network.

use qnet_core::{Coord, LinkId, NodeId};

use crate::{NetworkBuilder, NetworkError, load_network_from_readers};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Three nodes in a line with two forward links: 0 →(L0)→ 1 →(L1)→ 2.
fn line_network() -> crate::Network {
    let mut b = NetworkBuilder::new();
    let n0 = b.add_node(Coord::new(0.0, 0.0));
    let n1 = b.add_node(Coord::new(1_000.0, 0.0));
    let n2 = b.add_node(Coord::new(2_000.0, 0.0));
    b.add_link(n0, n1, 1_000.0, 10.0, 1.0, 1_800.0);
    b.add_link(n1, n2, 1_000.0, 10.0, 1.0, 1_800.0);
    b.build().unwrap()
}

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn sequential_ids() {
        let net = line_network();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.link_count(), 2);
        assert_eq!(net.link(LinkId(0)).unwrap().from, NodeId(0));
        assert_eq!(net.link(LinkId(1)).unwrap().to, NodeId(2));
    }

    #[test]
    fn out_links_grouped_by_node() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coord::new(0.0, 0.0));
        let n1 = b.add_node(Coord::new(100.0, 0.0));
        let n2 = b.add_node(Coord::new(0.0, 100.0));
        let l_a = b.add_link(n0, n1, 100.0, 10.0, 1.0, 600.0);
        let l_b = b.add_link(n1, n2, 150.0, 10.0, 1.0, 600.0);
        let l_c = b.add_link(n0, n2, 100.0, 10.0, 1.0, 600.0);
        let net = b.build().unwrap();

        assert_eq!(net.out_links(n0), &[l_a, l_c]);
        assert_eq!(net.out_links(n1), &[l_b]);
        assert!(net.out_links(n2).is_empty());
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coord::new(0.0, 0.0));
        b.add_link(n0, NodeId(99), 100.0, 10.0, 1.0, 600.0);
        assert!(matches!(b.build(), Err(NetworkError::UnknownNode { .. })));
    }

    #[test]
    fn non_positive_attributes_rejected() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coord::new(0.0, 0.0));
        let n1 = b.add_node(Coord::new(100.0, 0.0));
        b.add_link(n0, n1, 0.0, 10.0, 1.0, 600.0);
        assert!(matches!(b.build(), Err(NetworkError::BadAttribute(_))));
    }
}

#[cfg(test)]
mod derived_quantities {
    use super::*;

    #[test]
    fn freeflow_travel_time_rounds_up_with_floor_of_one() {
        let net = line_network();
        // 1000 m at 10 m/s → exactly 100 s.
        assert_eq!(net.link(LinkId(0)).unwrap().freeflow_travel_time(), 100);

        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coord::new(0.0, 0.0));
        let n1 = b.add_node(Coord::new(5.0, 0.0));
        b.add_link(n0, n1, 5.0, 50.0, 1.0, 600.0); // 0.1 s physical → 1 s floor
        b.add_link(n0, n1, 105.0, 10.0, 1.0, 600.0); // 10.5 s → 11 s ceil
        let net = b.build().unwrap();
        assert_eq!(net.link(LinkId(0)).unwrap().freeflow_travel_time(), 1);
        assert_eq!(net.link(LinkId(1)).unwrap().freeflow_travel_time(), 11);
    }

    #[test]
    fn storage_capacity_scales_with_lanes_and_factor() {
        let net = line_network();
        let link = net.link(LinkId(0)).unwrap();
        // 1000 m * 1 lane / 7.5 m = 133.3… → 134 cells.
        assert_eq!(link.storage_capacity(1.0), 134);
        // Quarter sample: 33.3… → 34.
        assert_eq!(link.storage_capacity(0.25), 34);
    }

    #[test]
    fn storage_capacity_floor_is_one() {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coord::new(0.0, 0.0));
        let n1 = b.add_node(Coord::new(5.0, 0.0));
        b.add_link(n0, n1, 5.0, 10.0, 1.0, 600.0);
        let net = b.build().unwrap();
        assert_eq!(net.link(LinkId(0)).unwrap().storage_capacity(0.01), 1);
    }
}

#[cfg(test)]
mod paths {
    use super::*;

    #[test]
    fn contiguous_path_accepted() {
        let net = line_network();
        assert!(net.is_contiguous_path(&[LinkId(0), LinkId(1)]));
        assert!(net.is_contiguous_path(&[LinkId(1)]));
    }

    #[test]
    fn gaps_and_unknown_links_rejected() {
        let net = line_network();
        assert!(!net.is_contiguous_path(&[LinkId(1), LinkId(0)]));
        assert!(!net.is_contiguous_path(&[LinkId(0), LinkId(7)]));
        assert!(!net.is_contiguous_path(&[]));
    }
}

#[cfg(test)]
mod spatial {
    use super::*;

    #[test]
    fn nearest_link_picks_closest_midpoint() {
        let net = line_network();
        // L0 midpoint (500, 0); L1 midpoint (1500, 0).
        assert_eq!(net.nearest_link(Coord::new(400.0, 50.0)), Some(LinkId(0)));
        assert_eq!(net.nearest_link(Coord::new(1_600.0, -20.0)), Some(LinkId(1)));
    }

    #[test]
    fn empty_network_has_no_nearest_link() {
        let net = crate::Network::empty();
        assert_eq!(net.nearest_link(Coord::new(0.0, 0.0)), None);
    }
}

#[cfg(test)]
mod loader {
    use super::*;

    const NODES: &str = "node_id,x,y\n0,0.0,0.0\n2,2000.0,0.0\n1,1000.0,0.0\n";
    const LINKS: &str = "link_id,from_node,to_node,length,freespeed,lanes,capacity\n\
                         1,1,2,1000.0,10.0,1,1800\n\
                         0,0,1,1000.0,10.0,1,1800\n";

    #[test]
    fn loads_out_of_order_rows() {
        let net = load_network_from_readers(NODES.as_bytes(), LINKS.as_bytes()).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.link_count(), 2);
        assert!(net.is_contiguous_path(&[LinkId(0), LinkId(1)]));
    }

    #[test]
    fn duplicate_node_id_rejected() {
        let nodes = "node_id,x,y\n0,0.0,0.0\n0,1.0,1.0\n";
        let err = load_network_from_readers(nodes.as_bytes(), LINKS.as_bytes()).unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateId { what: "node", id: 0 }));
    }

    #[test]
    fn gap_in_link_ids_rejected() {
        let links = "link_id,from_node,to_node,length,freespeed,lanes,capacity\n\
                     1,0,1,1000.0,10.0,1,1800\n";
        let err = load_network_from_readers(NODES.as_bytes(), links.as_bytes()).unwrap_err();
        assert!(matches!(err, NetworkError::MissingId { what: "link", id: 0 }));
    }
}
