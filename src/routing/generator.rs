// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::f64::consts::TAU;

use rand::Rng;

use super::{CandidateError, PlannerOptions, Rotation, Route};
use crate::{bearing_difference, normalize_bearing, sector_angle, Graph, Node};

/// Returns the neighbor of `node` reached by the edge with the bearing
/// closest to `target`, skipping `exclude`.
///
/// Neighbors are scanned in the order of [Node::adjacent];
/// on ties the first one wins.
pub fn pick_along_bearing(node: &Node, target: f64, exclude: Option<i64>) -> Option<i64> {
    let mut best: Option<(i64, f64)> = None;

    for &id in &node.adjacent {
        if Some(id) == exclude {
            continue;
        }

        let Some(edge) = node.edges.get(&id) else {
            continue;
        };

        let difference = bearing_difference(target, edge.bearing);
        if best.map_or(true, |(_, min)| difference < min) {
            best = Some((id, difference));
        }
    }

    best.map(|(id, _)| id)
}

/// Walks from `start` until at least `stop_fraction` of `desired_length`
/// is covered, trying to trace a circle of that circumference.
///
/// At every step two neighbors are considered (never going straight back):
/// the one best matching the target bearing, which starts at
/// `initial_bearing` and sweeps a full circle in the given [Rotation] as
/// the walk grows, and the one best continuing the current direction.
/// If they differ, one is picked at random.
///
/// The returned route is open - see [complete_route](super::complete_route).
pub fn generate_route<R: Rng + ?Sized>(
    g: &Graph,
    start: i64,
    desired_length: f64,
    initial_bearing: f64,
    rotation: Rotation,
    rng: &mut R,
    options: &PlannerOptions,
) -> Result<Route, CandidateError> {
    let mut current = g.get_node(start).ok_or(CandidateError::InvalidStart(start))?;
    let mut route = Route::new(current, desired_length);

    let radius = desired_length / TAU;
    let stop_length = desired_length * options.stop_fraction;
    let initial_bearing = normalize_bearing(initial_bearing);

    let mut target = initial_bearing;
    let mut heading = initial_bearing;
    let mut previous: Option<i64> = None;
    let mut steps: usize = 0;

    while route.length < stop_length {
        steps += 1;
        if steps > options.max_steps {
            return Err(CandidateError::TooManySteps);
        }

        let steer = pick_along_bearing(current, target, previous);
        let straight = pick_along_bearing(current, heading, previous);

        let next_id = match (steer, straight) {
            (Some(steer), Some(straight)) if steer != straight => {
                if rng.gen_bool(0.5) {
                    steer
                } else {
                    straight
                }
            }
            (Some(steer), _) => steer,
            _ => return Err(CandidateError::NoEligibleNeighbor(current.id)),
        };

        let (Some(&edge), Some(next)) = (current.edges.get(&next_id), g.get_node(next_id)) else {
            return Err(CandidateError::NoEligibleNeighbor(current.id));
        };

        if previous.is_some() && bearing_difference(heading, edge.bearing) > options.turn_threshold
        {
            route.turns += 1;
        }

        route.push(next, edge.distance, false);
        heading = edge.bearing;
        previous = Some(current.id);
        current = next;

        let swept = sector_angle(route.length, radius);
        target = match rotation {
            Rotation::Clockwise => normalize_bearing(initial_bearing + swept),
            Rotation::Anticlockwise => normalize_bearing(initial_bearing - swept),
        };
    }

    log::trace!(
        "generated walk from {} ({:?}, initial bearing {:.0}°): {} nodes, {:.0} m, {} turns",
        start,
        rotation,
        initial_bearing,
        route.waypoints.len(),
        route.length,
        route.turns,
    );

    Ok(route)
}
