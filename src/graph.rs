// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, initial_bearing, Edge, Node};
use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::VecDeque;

/// Represents a street network as a set of [Nodes](Node) joined by undirected
/// connections.
///
/// Nodes refer to each other only by id, so deleting a node never leaves a
/// dangling reference behind - [Graph::delete_node] unlinks it from its
/// neighbors as well. Every connection is stored twice, once in each endpoint,
/// with the same distance and opposite bearings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(BTreeMap<i64, Node>);

impl Graph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the graph contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.values()
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<&Node> {
        self.0.get(&id)
    }

    /// Adds an unconnected [Node] at the given position.
    ///
    /// Returns `false` (and leaves the graph untouched) if a node with the
    /// same id already exists - moving a connected node would invalidate the
    /// distances and bearings of its edges.
    pub fn add_node(&mut self, id: i64, lat: f64, lon: f64) -> bool {
        match self.0.entry(id) {
            Entry::Vacant(e) => {
                e.insert(Node::new(id, lat, lon));
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Deletes a [Node] with a given `id`, together with all of its connections.
    pub fn delete_node(&mut self, id: i64) -> Option<Node> {
        let node = self.0.remove(&id)?;
        for &neighbor_id in &node.adjacent {
            if let Some(neighbor) = self.0.get_mut(&neighbor_id) {
                neighbor.remove_edge(id);
            }
        }
        Some(node)
    }

    /// Gets the [Edge] from one node to another, if they are connected.
    pub fn get_edge(&self, from_id: i64, to_id: i64) -> Option<Edge> {
        self.0
            .get(&from_id)
            .and_then(|n| n.edges.get(&to_id))
            .cloned()
    }

    /// Connects two existing nodes in both directions, computing the distance
    /// and both bearings once.
    ///
    /// Returns `false` if either node doesn't exist, if `a == b`
    /// (a zero-length self-loop has no meaningful bearing) or if the
    /// nodes are already connected.
    pub fn connect(&mut self, a: i64, b: i64) -> bool {
        if a == b {
            return false;
        }

        let (a_lat, a_lon, b_lat, b_lon) = match (self.0.get(&a), self.0.get(&b)) {
            (Some(left), Some(right)) => {
                if left.edges.contains_key(&b) {
                    return false;
                }
                (left.lat, left.lon, right.lat, right.lon)
            }
            _ => return false,
        };

        let distance = earth_distance(a_lat, a_lon, b_lat, b_lon);
        let forward = initial_bearing(a_lat, a_lon, b_lat, b_lon);
        let backward = initial_bearing(b_lat, b_lon, a_lat, a_lon);

        if let Some(left) = self.0.get_mut(&a) {
            left.insert_edge(
                b,
                Edge {
                    distance,
                    bearing: forward,
                },
            );
        }
        if let Some(right) = self.0.get_mut(&b) {
            right.insert_edge(
                a,
                Edge {
                    distance,
                    bearing: backward,
                },
            );
        }
        true
    }

    /// Finds the closest [Node] to the given position.
    ///
    /// This function requires computing the distance to every [Node] in the graph,
    /// which is fine for the small, single-area graphs loops are planned on.
    pub fn find_nearest_node(&self, lat: f64, lon: f64) -> Option<&Node> {
        self.0
            .values()
            .map(|nd| (earth_distance(lat, lon, nd.lat, nd.lon), nd))
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.total_cmp(b_dist))
            .map(|(_, nd)| nd)
    }

    /// Removes all nodes with fewer than two neighbors, repeating until
    /// every remaining node has at least two neighbors (or the graph is empty).
    ///
    /// Such nodes are dead ends - a loop can never pass through them.
    /// Removing a dead end may expose another one (e.g. the rest of a cul-de-sac),
    /// so this is done with a worklist until a fixed point is reached.
    /// The result is the [2-core](https://en.wikipedia.org/wiki/Degeneracy_(graph_theory))
    /// of the graph, which does not depend on the order in which nodes are visited.
    ///
    /// Returns the number of deleted nodes.
    pub fn remove_dead_ends(&mut self) -> usize {
        let mut queue: VecDeque<i64> = self
            .0
            .values()
            .filter(|n| n.degree() < 2)
            .map(|n| n.id)
            .collect();
        let mut removed = 0;

        while let Some(id) = queue.pop_front() {
            // A node may be queued more than once - skip stale entries
            match self.0.get(&id) {
                Some(n) if n.degree() < 2 => {}
                _ => continue,
            }

            if let Some(node) = self.0.remove(&id) {
                for neighbor_id in node.adjacent {
                    if let Some(neighbor) = self.0.get_mut(&neighbor_id) {
                        neighbor.remove_edge(id);
                        if neighbor.degree() < 2 {
                            queue.push_back(neighbor_id);
                        }
                    }
                }
                removed += 1;
            }
        }

        removed
    }
}
