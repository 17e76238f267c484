// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Generation, completion and ranking of circular routes.

use std::collections::HashMap;

use serde::Serialize;

use crate::{earth_distance, AStarError, Node};

mod complete;
mod generator;
mod planner;
mod ranker;

pub use complete::complete_route;
pub use generator::{generate_route, pick_along_bearing};
pub use planner::{plan_candidate, plan_routes, PlannerOptions};
pub use ranker::{similarity, RouteRanker};

/// Direction in which the target bearing of a [generated](generate_route) route rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    Anticlockwise,
}

impl Rotation {
    pub const ALL: [Rotation; 2] = [Rotation::Clockwise, Rotation::Anticlockwise];
}

/// A single point of a [Route], copied out of the [Graph](crate::Graph)
/// so that routes can outlive it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

impl From<&Node> for Waypoint {
    fn from(n: &Node) -> Self {
        Self {
            id: n.id,
            lat: n.lat,
            lon: n.lon,
        }
    }
}

/// An ordered walk over the street network, starting at the first waypoint,
/// together with the statistics used for [scoring](Route::score).
///
/// Routes are produced by [generate_route] and [complete_route], and are
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
    length: f64,
    desired_length: f64,
    turns: usize,
    visited: HashMap<i64, usize>,
    repeat_visits: usize,
}

impl Route {
    fn new(start: &Node, desired_length: f64) -> Self {
        Self {
            waypoints: vec![Waypoint::from(start)],
            length: 0.0,
            desired_length,
            turns: 0,
            visited: HashMap::from([(start.id, 1)]),
            repeat_visits: 0,
        }
    }

    /// Appends a node reached over an edge of the provided length.
    ///
    /// `closes_loop` marks the final arrival back at the start,
    /// which is not counted as a repeated visit.
    fn push(&mut self, node: &Node, distance: f64, closes_loop: bool) {
        self.waypoints.push(Waypoint::from(node));
        self.length += distance;

        if !closes_loop {
            let count = self.visited.entry(node.id).or_default();
            *count += 1;
            if *count > 1 {
                self.repeat_visits += 1;
            }
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Returns the ids of all nodes of the route, in order.
    pub fn ids(&self) -> Vec<i64> {
        self.waypoints.iter().map(|w| w.id).collect()
    }

    /// Returns the `[lat, lon]` pairs of all nodes of the route, in order.
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.waypoints.iter().map(|w| [w.lat, w.lon]).collect()
    }

    pub fn start(&self) -> Waypoint {
        self.waypoints[0]
    }

    pub fn end(&self) -> Waypoint {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Returns `true` if the route ends where it started.
    pub fn is_closed(&self) -> bool {
        self.start().id == self.end().id
    }

    /// Sum of all traversed edges, in meters.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn desired_length(&self) -> f64 {
        self.desired_length
    }

    /// Number of sharp changes of direction.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Number of times each node was departed from or passed through.
    pub fn visited(&self) -> &HashMap<i64, usize> {
        &self.visited
    }

    /// Number of arrivals at an already visited node.
    pub fn repeat_visits(&self) -> usize {
        self.repeat_visits
    }

    /// Calculates the badness of the route - lower is better.
    ///
    /// Sharp turns, a gap between the end and the start, a difference
    /// from the desired length and retracing previously visited nodes
    /// are all penalized.
    pub fn score(&self, weights: &ScoreWeights) -> f64 {
        let start = self.start();
        let end = self.end();
        let gap = earth_distance(start.lat, start.lon, end.lat, end.lon);
        let length_error = (self.desired_length - self.length).abs();

        self.turns as f64 * weights.turn_weight
            + gap / weights.distance_divisor
            + length_error / weights.distance_divisor
            + self.repeat_visits as f64 * weights.repeat_weight / self.waypoints.len() as f64
    }

    /// Condenses the route into its serializable form.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            path: self.coordinates(),
            distance: self.length,
        }
    }
}

/// Weights of the components of [Route::score].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Penalty for every sharp turn.
    pub turn_weight: f64,

    /// Meters of end-to-start gap or of length error worth a single point.
    pub distance_divisor: f64,

    /// Penalty for every repeated visit, spread over all waypoints.
    pub repeat_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            turn_weight: 30.0,
            distance_divisor: 3.0,
            repeat_weight: 10_000.0,
        }
    }
}

/// Serializable form of a [Route]: `{"path": [[lat, lon], ...], "distance": meters}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub path: Vec<[f64; 2]>,
    pub distance: f64,
}

impl From<&Route> for RouteSummary {
    fn from(r: &Route) -> Self {
        r.summary()
    }
}

/// Reasons for abandoning a single candidate route.
///
/// Candidate failures are expected while planning - the planner logs
/// and drops them, and they never fail a whole request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CandidateError {
    /// The start node is not part of the graph.
    #[error("start node {0} is not part of the graph")]
    InvalidStart(i64),

    /// The walk got stuck on a node with no way forward.
    #[error("no eligible neighbor of node {0}")]
    NoEligibleNeighbor(i64),

    /// The end of the walk has no connection back to its start.
    #[error("no path from {from} back to {to}")]
    UnreachableGoal { from: i64, to: i64 },

    /// The walk did not reach its length in the allowed number of steps.
    #[error("too many steps")]
    TooManySteps,

    #[error("closing path search failed: {0}")]
    Search(#[from] AStarError),
}
