// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// A single raw element of street-network data, as read from
/// an [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML) or
/// [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON) file.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// An [OSM node](https://wiki.openstreetmap.org/wiki/Node) - a position on Earth.
    Point { id: i64, lat: f64, lon: f64 },

    /// An [OSM way](https://wiki.openstreetmap.org/wiki/Way) - an ordered chain
    /// of references to [Element::Point] ids.
    Polyline { id: i64, nodes: Vec<i64> },
}
