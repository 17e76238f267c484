// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::{earth_distance, AStarError, Graph};

#[derive(Debug, Clone, Copy)]
struct FlatQueueItem {
    at: i64,
    cost: f64,
    score: f64,
}

impl PartialEq for FlatQueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FlatQueueItem {}

impl PartialOrd for FlatQueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FlatQueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        // Equal scores fall back to the lower node id, to keep searches reproducible.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.at.cmp(&self.at))
    }
}

fn reconstruct_flat_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between two nodes in the provided graph.
///
/// Edge costs are their great-circle lengths, and the heuristic is the
/// great-circle distance to `to_id`, which never overestimates the remaining
/// network distance.
///
/// Returns `[from_id, ..., to_id]`, `[from_id]` if both ids are equal, or an
/// empty vector if there is no route between the two nodes.
///
/// `step_limit` limits how many nodes may be expanded during the search
/// before returning [AStarError::StepLimitExceeded]. The recommended value is
/// [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
pub fn find_route(
    g: &Graph,
    from_id: i64,
    to_id: i64,
    step_limit: usize,
) -> Result<Vec<i64>, AStarError> {
    let mut queue: BinaryHeap<FlatQueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut known_costs: HashMap<i64, f64> = HashMap::default();
    let mut steps: usize = 0;

    let to_node = g
        .get_node(to_id)
        .ok_or(AStarError::InvalidReference(to_id))?;

    {
        let from_node = g
            .get_node(from_id)
            .ok_or(AStarError::InvalidReference(from_id))?;

        let initial_distance =
            earth_distance(from_node.lat, from_node.lon, to_node.lat, to_node.lon);

        queue.push(FlatQueueItem {
            at: from_id,
            cost: 0.0,
            score: initial_distance,
        });
        known_costs.insert(from_id, 0.0);
    }

    while let Some(item) = queue.pop() {
        if item.at == to_id {
            return Ok(reconstruct_flat_path(&came_from, to_id));
        }

        // Contrary to the wikipedia definition, we might keep multiple items in the queue for the same node.
        if item.cost > known_costs.get(&item.at).cloned().unwrap_or(f64::INFINITY) {
            continue;
        }

        steps += 1;
        if steps > step_limit {
            return Err(AStarError::StepLimitExceeded);
        }

        let Some(current) = g.get_node(item.at) else {
            continue;
        };

        for &neighbor_id in &current.adjacent {
            let (Some(edge), Some(neighbor)) =
                (current.edges.get(&neighbor_id), g.get_node(neighbor_id))
            else {
                continue;
            };

            // Check if this is the cheapest way to the neighbor
            let neighbor_cost = item.cost + edge.distance;
            if neighbor_cost
                >= known_costs
                    .get(&neighbor_id)
                    .cloned()
                    .unwrap_or(f64::INFINITY)
            {
                continue;
            }

            // Push the new item into the queue
            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            queue.push(FlatQueueItem {
                at: neighbor_id,
                cost: neighbor_cost,
                score: neighbor_cost
                    + earth_distance(neighbor.lat, neighbor.lon, to_node.lat, to_node.lon),
            });
        }
    }

    Ok(vec![])
}
