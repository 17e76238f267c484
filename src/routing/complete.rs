// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::{CandidateError, PlannerOptions, Route};
use crate::{bearing_difference, find_route, AStarError, Graph};

/// Closes a route into a loop with the shortest path from its end back to its start.
///
/// If the closing path begins by retracing the end of the route, the
/// retraced part is cut off instead of being walked twice. Length, turns
/// and visits are recalculated for the resulting loop.
pub fn complete_route(
    g: &Graph,
    route: &Route,
    options: &PlannerOptions,
) -> Result<Route, CandidateError> {
    let ids = route.ids();
    let from = route.end().id;
    let to = route.start().id;

    let closing = find_route(g, from, to, options.step_limit)?;
    if closing.is_empty() {
        return Err(CandidateError::UnreachableGoal { from, to });
    }

    let overlap = closing
        .iter()
        .zip(ids.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let mut spliced = ids;
    spliced.truncate(spliced.len() + 1 - overlap);
    spliced.extend_from_slice(&closing[overlap..]);

    if overlap > 1 {
        log::trace!("closing path of {} retraces {} nodes", to, overlap - 1);
    }

    replay(
        g,
        to,
        &spliced[1..],
        route.desired_length,
        options.turn_threshold,
    )
}

/// Rebuilds a [Route] going from `first` through `rest`,
/// recalculating all of its statistics.
fn replay(
    g: &Graph,
    first: i64,
    rest: &[i64],
    desired_length: f64,
    turn_threshold: f64,
) -> Result<Route, CandidateError> {
    let get = |id: i64| {
        g.get_node(id)
            .ok_or(CandidateError::Search(AStarError::InvalidReference(id)))
    };

    let mut current = get(first)?;
    let mut route = Route::new(current, desired_length);
    let mut heading: Option<f64> = None;

    for (i, &id) in rest.iter().enumerate() {
        let next = get(id)?;
        let edge = current
            .edges
            .get(&id)
            .ok_or(CandidateError::NoEligibleNeighbor(current.id))?;

        if heading.is_some_and(|h| bearing_difference(h, edge.bearing) > turn_threshold) {
            route.turns += 1;
        }

        let closes_loop = i == rest.len() - 1 && id == first;
        route.push(next, edge.distance, closes_loop);
        heading = Some(edge.bearing);
        current = next;
    }

    Ok(route)
}
