// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Error, Graph};

use super::model::Element;

/// Helper object used for storing state related to converting [Elements](Element)
/// into a [Graph].
///
/// Overpass returns ways before the nodes they reference, so polylines are
/// only connected in [GraphBuilder::finish], once every point is known.
pub(crate) struct GraphBuilder {
    g: Graph,
    polylines: Vec<(i64, Vec<i64>)>,
    duplicate_points: usize,
}

impl GraphBuilder {
    /// Create a new, empty graph builder.
    pub(crate) fn new() -> Self {
        Self {
            g: Graph::new(),
            polylines: Vec::default(),
            duplicate_points: 0,
        }
    }

    /// Add all elements from the provided iterator, stopping at the first error.
    pub(crate) fn add_elements<I, E>(&mut self, elements: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<Element, E>>,
    {
        for e in elements {
            self.add_element(e?);
        }
        Ok(())
    }

    pub(crate) fn add_element(&mut self, e: Element) {
        match e {
            Element::Point { id, lat, lon } => {
                if !self.g.add_node(id, lat, lon) {
                    self.duplicate_points += 1;
                }
            }
            Element::Polyline { id, nodes } => self.polylines.push((id, nodes)),
        }
    }

    /// Connects all collected polylines and removes dead ends from the result.
    ///
    /// Fails with [Error::UnknownPoint] if any polyline references a point
    /// which was never added.
    pub(crate) fn finish(mut self) -> Result<Graph, Error> {
        let points = self.g.len();
        let mut skipped_segments = 0;

        for (way, nodes) in &self.polylines {
            if let Some(&node) = nodes.iter().find(|&&n| self.g.get_node(n).is_none()) {
                return Err(Error::UnknownPoint { way: *way, node });
            }

            for pair in nodes.windows(2) {
                if pair[0] == pair[1] {
                    // Zero-length segment - would produce a self-loop with an undefined bearing
                    skipped_segments += 1;
                } else {
                    self.g.connect(pair[0], pair[1]);
                }
            }
        }

        let pruned = self.g.remove_dead_ends();

        log::debug!(
            "built graph from {} points and {} polylines: {} duplicate points, \
            {} zero-length segments skipped, {} dead-end nodes pruned, {} nodes left",
            points,
            self.polylines.len(),
            self.duplicate_points,
            skipped_segments,
            pruned,
            self.g.len(),
        );

        Ok(self.g)
    }
}
