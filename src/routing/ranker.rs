// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::{Route, ScoreWeights};

/// Percentage (0-100) of nodes shared by two routes, relative to
/// the route visiting more distinct nodes.
pub fn similarity(a: &Route, b: &Route) -> f64 {
    let (shorter, longer) = if a.visited.len() < b.visited.len() {
        (&a.visited, &b.visited)
    } else {
        (&b.visited, &a.visited)
    };

    if longer.is_empty() {
        return 100.0;
    }

    let overlap = shorter.keys().filter(|id| longer.contains_key(id)).count();
    100.0 * overlap as f64 / longer.len() as f64
}

/// Bounded collection of the best, mutually distinct [Routes](Route),
/// ordered from the lowest (best) [score](Route::score).
///
/// A route too [similar](similarity) to an already kept one may only
/// take its place, and only if it scores better.
#[derive(Debug, Clone)]
pub struct RouteRanker {
    entries: Vec<(f64, Route)>,
    capacity: usize,
    similarity_threshold: f64,
    weights: ScoreWeights,
}

impl RouteRanker {
    pub fn new(capacity: usize, similarity_threshold: f64, weights: ScoreWeights) -> Self {
        Self {
            entries: Vec::default(),
            capacity,
            similarity_threshold,
            weights,
        }
    }

    /// Offers a route to the collection. Returns `true` if it was kept.
    pub fn offer(&mut self, route: Route) -> bool {
        if self.capacity == 0 {
            return false;
        }

        let score = route.score(&self.weights);

        if self.entries.len() >= self.capacity {
            if let Some((worst, _)) = self.entries.last() {
                if score > *worst {
                    return false;
                }
            }
        }

        let similar = self
            .entries
            .iter()
            .position(|(_, kept)| similarity(&route, kept) > self.similarity_threshold);

        let idx = match similar {
            Some(idx) if score < self.entries[idx].0 => {
                self.entries[idx] = (score, route);
                idx
            }
            Some(_) => return false,
            None if self.entries.len() < self.capacity => {
                self.entries.push((score, route));
                self.entries.len() - 1
            }
            None => {
                let idx = self.entries.len() - 1;
                self.entries[idx] = (score, route);
                idx
            }
        };

        self.bubble_up(idx);
        true
    }

    /// Moves the entry at `idx` towards the front until the scores are ordered again.
    fn bubble_up(&mut self, mut idx: usize) {
        while idx > 0 && self.entries[idx - 1].0 > self.entries[idx].0 {
            self.entries.swap(idx - 1, idx);
            idx -= 1;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the kept routes, best first.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.entries.iter().map(|(_, r)| r)
    }

    /// Returns the scores of the kept routes, best first.
    pub fn scores(&self) -> Vec<f64> {
        self.entries.iter().map(|&(s, _)| s).collect()
    }

    pub fn into_routes(self) -> Vec<Route> {
        self.entries.into_iter().map(|(_, r)| r).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::route_through;
    use super::*;

    /// Every turn is worth a single point, nothing else matters.
    const TURNS_ONLY: ScoreWeights = ScoreWeights {
        turn_weight: 1.0,
        distance_divisor: 1.0,
        repeat_weight: 0.0,
    };

    /// Creates a route through `n` nodes starting from `first_id`, scoring `turns`.
    fn route(first_id: i64, n: i64, turns: usize) -> Route {
        let ids: Vec<i64> = (first_id..first_id + n).collect();
        route_through(&ids, turns)
    }

    #[test]
    fn similarity_cases() {
        let a = route_through(&[1, 2, 3, 4], 0);
        let b = route_through(&[1, 2], 0);
        assert_eq!(similarity(&a, &b), 50.0);
        assert_eq!(similarity(&b, &a), 50.0);
        assert_eq!(similarity(&a, &a), 100.0);

        let c = route_through(&[5, 6, 7], 0);
        assert_eq!(similarity(&a, &c), 0.0);

        let d = route_through(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 0);
        let e = route_through(&[2, 3, 4, 5, 6, 7, 8, 9, 10, 11], 0);
        assert_eq!(similarity(&d, &e), 90.0);
    }

    #[test]
    fn similarity_of_routes_without_visits() {
        let mut a = route_through(&[1], 0);
        a.visited.clear();
        let b = a.clone();
        assert_eq!(similarity(&a, &b), 100.0);
    }

    #[test]
    fn keeps_best_in_order() {
        let mut ranker = RouteRanker::new(2, 70.0, TURNS_ONLY);
        assert!(ranker.offer(route(100, 5, 5)));
        assert!(ranker.offer(route(200, 5, 3)));
        assert!(!ranker.offer(route(300, 5, 9)));

        assert_eq!(ranker.len(), 2);
        assert_eq!(ranker.scores(), vec![3.0, 5.0]);
        let firsts: Vec<i64> = ranker.iter().map(|r| r.start().id).collect();
        assert_eq!(firsts, vec![200, 100]);
    }

    #[test]
    fn full_ranker_replaces_worst() {
        let mut ranker = RouteRanker::new(3, 70.0, TURNS_ONLY);
        for (i, turns) in [4, 8, 6].into_iter().enumerate() {
            assert!(ranker.offer(route(100 * (i as i64 + 1), 5, turns)));
        }
        assert_eq!(ranker.scores(), vec![4.0, 6.0, 8.0]);

        assert!(ranker.offer(route(400, 5, 1)));
        assert_eq!(ranker.scores(), vec![1.0, 4.0, 6.0]);

        assert!(ranker.offer(route(500, 5, 5)));
        assert_eq!(ranker.scores(), vec![1.0, 4.0, 5.0]);
        assert_eq!(ranker.len(), ranker.capacity());
    }

    #[test]
    fn similar_route_replaces_only_if_better() {
        let mut ranker = RouteRanker::new(5, 70.0, TURNS_ONLY);
        assert!(ranker.offer(route(1, 10, 5)));

        // 9 of 10 nodes shared
        assert!(!ranker.offer(route(2, 10, 7)));
        assert_eq!(ranker.scores(), vec![5.0]);

        assert!(ranker.offer(route(2, 10, 2)));
        assert_eq!(ranker.scores(), vec![2.0]);
        assert_eq!(ranker.iter().next().unwrap().start().id, 2);
    }

    #[test]
    fn replaced_route_moves_to_its_place() {
        let mut ranker = RouteRanker::new(3, 70.0, TURNS_ONLY);
        assert!(ranker.offer(route(100, 10, 2)));
        assert!(ranker.offer(route(200, 10, 4)));
        assert!(ranker.offer(route(300, 10, 6)));

        assert!(ranker.offer(route(301, 10, 1)));
        assert_eq!(ranker.scores(), vec![1.0, 2.0, 4.0]);
        let firsts: Vec<i64> = ranker.iter().map(|r| r.start().id).collect();
        assert_eq!(firsts, vec![301, 100, 200]);
    }

    #[test]
    fn similarity_threshold() {
        // Sliding windows of 10 nodes: i and j share (10 - |i - j|) nodes
        let mut ranker = RouteRanker::new(25, 70.0, ScoreWeights::default());
        for i in 0..10 {
            ranker.offer(route(i, 10, 0));
        }
        let firsts: Vec<i64> = ranker.iter().map(|r| r.start().id).collect();
        assert_eq!(firsts, vec![0, 3, 6, 9]);

        let mut ranker = RouteRanker::new(25, 95.0, ScoreWeights::default());
        for i in 0..10 {
            assert!(ranker.offer(route(i, 10, 0)));
        }
        assert_eq!(ranker.len(), 10);
    }

    #[test]
    fn unbounded_capacity() {
        let mut ranker = RouteRanker::new(usize::MAX, 70.0, TURNS_ONLY);
        assert!(ranker.offer(route(100, 5, 2)));
        assert!(ranker.offer(route(200, 5, 1)));
        assert_eq!(ranker.scores(), vec![1.0, 2.0]);
        assert_eq!(ranker.capacity(), usize::MAX);
    }

    #[test]
    fn zero_capacity() {
        let mut ranker = RouteRanker::new(0, 70.0, ScoreWeights::default());
        assert!(!ranker.offer(route(1, 3, 0)));
        assert!(ranker.is_empty());
        assert!(ranker.into_routes().is_empty());
    }
}
