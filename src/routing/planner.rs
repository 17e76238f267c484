// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use rand::Rng;

use super::{
    complete_route, generate_route, CandidateError, Rotation, Route, RouteRanker, ScoreWeights,
};
use crate::{Error, Graph, DEFAULT_STEP_LIMIT};

/// Tunables of [plan_routes].
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerOptions {
    /// Maximum number of returned routes.
    pub capacity: usize,

    /// [Similarity](super::similarity) (in percent) above which two routes
    /// are considered duplicates.
    pub similarity_threshold: f64,

    /// Change of direction (in degrees) above which a step counts as a turn.
    pub turn_threshold: f64,

    /// Fraction of the desired length at which a generated walk stops
    /// and gets closed into a loop.
    pub stop_fraction: f64,

    pub weights: ScoreWeights,

    /// Difference between consecutive initial bearings, in degrees.
    pub bearing_step: usize,

    /// Number of candidates generated per initial bearing and [Rotation].
    pub attempts: usize,

    /// Node expansion limit of every closing path search.
    pub step_limit: usize,

    /// Maximum number of steps of a single generated walk.
    pub max_steps: usize,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            capacity: 25,
            similarity_threshold: 70.0,
            turn_threshold: 45.0,
            stop_fraction: 0.98,
            weights: ScoreWeights::default(),
            bearing_step: 10,
            attempts: 30,
            step_limit: DEFAULT_STEP_LIMIT,
            max_steps: 10_000,
        }
    }
}

/// Generates a single walk from `start` and closes it into a loop.
pub fn plan_candidate<R: Rng + ?Sized>(
    g: &Graph,
    start: i64,
    desired_length: f64,
    initial_bearing: f64,
    rotation: Rotation,
    rng: &mut R,
    options: &PlannerOptions,
) -> Result<Route, CandidateError> {
    let open = generate_route(g, start, desired_length, initial_bearing, rotation, rng, options)?;
    complete_route(g, &open, options)
}

/// Plans circular routes of roughly `desired_length` meters, starting and
/// ending at the node closest to the provided position.
///
/// Candidates are generated for every initial bearing (every
/// [bearing_step](PlannerOptions::bearing_step) degrees) in both [rotations](Rotation),
/// [attempts](PlannerOptions::attempts) times each. The best distinct ones
/// are returned, best first - possibly fewer than
/// [capacity](PlannerOptions::capacity), or none at all.
pub fn plan_routes<R: Rng + ?Sized>(
    g: &Graph,
    lat: f64,
    lon: f64,
    desired_length: f64,
    options: &PlannerOptions,
    rng: &mut R,
) -> Result<Vec<Route>, Error> {
    let start = g.find_nearest_node(lat, lon).ok_or(Error::NoRoutableArea)?;
    if !desired_length.is_finite() || desired_length <= 0.0 {
        return Err(Error::InvalidDistance(desired_length));
    }

    log::debug!(
        "planning {:.0} m loops from node {} ({}, {})",
        desired_length,
        start.id,
        start.lat,
        start.lon,
    );

    let mut ranker = RouteRanker::new(
        options.capacity,
        options.similarity_threshold,
        options.weights,
    );
    let mut generated: usize = 0;
    let mut discarded: usize = 0;
    let mut kept: usize = 0;

    for bearing in (0..360).step_by(options.bearing_step.max(1)) {
        for _ in 0..options.attempts {
            for rotation in Rotation::ALL {
                generated += 1;
                let candidate = plan_candidate(
                    g,
                    start.id,
                    desired_length,
                    bearing as f64,
                    rotation,
                    rng,
                    options,
                );

                match candidate {
                    Ok(route) => {
                        if ranker.offer(route) {
                            kept += 1;
                        }
                    }
                    Err(e) => {
                        discarded += 1;
                        log::debug!("discarding candidate (bearing {bearing}°, {rotation:?}): {e}");
                    }
                }
            }
        }
    }

    log::info!(
        "generated {} candidates ({} discarded, {} accepted by the ranking), {} routes kept",
        generated,
        discarded,
        kept,
        ranker.len(),
    );

    if ranker.is_empty() {
        log::warn!("no loops could be planned from node {}", start.id);
    }

    Ok(ranker.into_routes())
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::super::generator::tests::{always_steer, grid, grid_unit, GRID_SPACING};
    use super::*;

    #[test]
    fn empty_graph() {
        let mut rng = SmallRng::seed_from_u64(1);
        let options = PlannerOptions::default();
        let result = plan_routes(&Graph::new(), 0.0, 0.0, 1000.0, &options, &mut rng);
        assert!(matches!(result, Err(Error::NoRoutableArea)));
    }

    #[test]
    fn invalid_distance() {
        let g = grid();
        let mut rng = SmallRng::seed_from_u64(1);
        for distance in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = plan_routes(&g, 0.0, 0.0, distance, &PlannerOptions::default(), &mut rng);
            assert!(matches!(result, Err(Error::InvalidDistance(_))), "{distance}");
        }
    }

    #[test]
    fn candidate_on_grid_is_a_closed_block() {
        let g = grid();
        let unit = grid_unit();
        let r = plan_candidate(
            &g,
            1,
            4.0 * unit,
            0.0,
            Rotation::Clockwise,
            &mut always_steer(),
            &PlannerOptions::default(),
        )
        .unwrap();

        assert!(r.is_closed());
        assert!(r.length() >= 0.98 * 4.0 * unit);
        assert!(r.length() <= 1.02 * 4.0 * unit);
    }

    #[test]
    fn routes_on_grid() {
        let g = grid();
        let unit = grid_unit();
        let options = PlannerOptions {
            attempts: 3,
            ..PlannerOptions::default()
        };
        let mut rng = SmallRng::seed_from_u64(7);

        // Closest to node 1, in the south-west corner
        let routes = plan_routes(
            &g,
            -0.1 * GRID_SPACING,
            -0.1 * GRID_SPACING,
            4.0 * unit,
            &options,
            &mut rng,
        )
        .unwrap();

        assert!(!routes.is_empty());
        assert!(routes.len() <= options.capacity);

        for r in &routes {
            assert_eq!(r.start().id, 1);
            assert!(r.is_closed());
        }

        let scores: Vec<f64> = routes.iter().map(|r| r.score(&options.weights)).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] <= pair[1]);
        }

        // The single block around the start is the perfect loop
        let best = &routes[0];
        assert!(best.length() >= 0.98 * 4.0 * unit);
        assert!(best.length() <= 1.02 * 4.0 * unit);
        assert_eq!(best.repeat_visits(), 0);
    }

    #[test]
    fn same_seed_same_routes() {
        let g = grid();
        let options = PlannerOptions {
            attempts: 2,
            ..PlannerOptions::default()
        };

        let plan = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            plan_routes(&g, 0.0009, 0.0009, 6.0 * grid_unit(), &options, &mut rng)
                .unwrap()
                .iter()
                .map(Route::ids)
                .collect::<Vec<_>>()
        };

        assert_eq!(plan(3), plan(3));
    }

    #[test]
    fn unbounded_capacity() {
        let g = grid();
        let options = PlannerOptions {
            capacity: usize::MAX,
            attempts: 3,
            ..PlannerOptions::default()
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let routes = plan_routes(&g, 0.0, 0.0, 4.0 * grid_unit(), &options, &mut rng).unwrap();
        assert!(!routes.is_empty());
    }

    #[test]
    fn zero_attempts_give_no_routes() {
        let g = grid();
        let options = PlannerOptions {
            attempts: 0,
            ..PlannerOptions::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(plan_routes(&g, 0.0, 0.0, 1000.0, &options, &mut rng).unwrap(), vec![]);
    }
}
