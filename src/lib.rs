// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Circular walking and running routes over [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Raw OSM nodes and ways are turned into an undirected street [Graph] with all
//! dead ends removed. Starting from the node closest to a requested point,
//! many candidate loops are grown by steering along a slowly rotating bearing,
//! closed back to the start with A*, and the best distinct ones are kept.
//! Candidates are ranked by how close they are to the desired length, how few
//! sharp turns they make, how little they retrace themselves and how close their
//! end is to their start.
//!
//! # Example
//!
//! ```no_run
//! use rand::SeedableRng;
//!
//! let options = looproute::osm::Options {
//!     file_format: looproute::osm::FileFormat::Xml,
//! };
//! let g = looproute::osm::load_graph_from_file(&options, "path/to/area.osm")
//!     .expect("failed to load area.osm");
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
//! let routes = looproute::plan_routes(
//!     &g,
//!     51.5308,
//!     -0.1461,
//!     5_000.0,
//!     &looproute::PlannerOptions::default(),
//!     &mut rng,
//! )
//! .expect("no routable area");
//!
//! for route in &routes {
//!     println!("{:.0} m, {} turns", route.length(), route.turns());
//! }
//! ```

use std::collections::HashMap;

mod astar;
mod distance;
mod error;
mod graph;
pub mod osm;
pub mod routing;

pub use astar::{find_route, AStarError, DEFAULT_STEP_LIMIT};
pub use distance::{
    bearing_difference, earth_distance, initial_bearing, normalize_bearing, sector_angle,
};
pub use error::Error;
pub use graph::Graph;
pub use routing::{plan_routes, PlannerOptions, Rotation, Route, RouteSummary};

/// Represents a vertex of the [Graph] - a point of the street network.
///
/// `adjacent` and the keys of `edges` always hold the same set of node ids;
/// `adjacent` preserves the order in which connections were made,
/// which keeps neighbor scans deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub adjacent: Vec<i64>,
    pub edges: HashMap<i64, Edge>,
}

impl Node {
    /// Creates a node without any connections.
    pub fn new(id: i64, lat: f64, lon: f64) -> Self {
        Self {
            id,
            lat,
            lon,
            adjacent: Vec::default(),
            edges: HashMap::default(),
        }
    }

    /// Returns the number of neighbors of this node.
    pub fn degree(&self) -> usize {
        self.adjacent.len()
    }

    /// Removes the connection to `target` from both `adjacent` and `edges`.
    /// Does nothing if `target` is not a neighbor.
    ///
    /// Only this end of the connection is touched; use [Graph::delete_node]
    /// to keep both ends in sync.
    pub fn remove_edge(&mut self, target: i64) {
        if let Some(idx) = self.adjacent.iter().position(|&id| id == target) {
            self.adjacent.swap_remove(idx);
            self.edges.remove(&target);
        }
    }

    pub(crate) fn insert_edge(&mut self, to: i64, edge: Edge) {
        if self.edges.insert(to, edge).is_none() {
            self.adjacent.push(to);
        }
    }
}

/// Represents one direction of a connection between two [Nodes](Node).
///
/// `distance` is the same in both directions, while `bearing` is the initial
/// great-circle bearing from the owning node towards the neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Great-circle distance, in meters.
    pub distance: f64,

    /// Direction of travel, in degrees within `[0, 360)`.
    pub bearing: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_neighbors(neighbors: &[i64]) -> Node {
        let mut n = Node::new(1, 0.0, 0.0);
        for &to in neighbors {
            n.insert_edge(
                to,
                Edge {
                    distance: 1.0,
                    bearing: 0.0,
                },
            );
        }
        n
    }

    #[test]
    fn remove_edge_missing_target_is_noop() {
        let mut n = node_with_neighbors(&[2, 3]);
        let before = n.clone();
        n.remove_edge(4);
        assert_eq!(n, before);

        let mut lonely = Node::new(1, 0.0, 0.0);
        lonely.remove_edge(1);
        assert_eq!(lonely, Node::new(1, 0.0, 0.0));
    }

    #[test]
    fn remove_edge_existing_target() {
        let mut n = node_with_neighbors(&[2, 3]);
        n.remove_edge(3);
        assert_eq!(n.adjacent, vec![2]);
        assert_eq!(n.edges.len(), 1);
        assert!(n.edges.contains_key(&2));
        assert_eq!(n.degree(), 1);
    }

    #[test]
    fn insert_edge_does_not_duplicate() {
        let mut n = node_with_neighbors(&[2, 2, 3]);
        assert_eq!(n.adjacent, vec![2, 3]);
        n.insert_edge(
            3,
            Edge {
                distance: 5.0,
                bearing: 90.0,
            },
        );
        assert_eq!(n.adjacent, vec![2, 3]);
        assert_eq!(n.edges[&3].distance, 5.0);
    }
}
