// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;

/// Error conditions which fail a whole loop planning request:
/// loading the street network, or planning on it.
///
/// Failures of individual candidate loops are never reported here -
/// see [CandidateError](crate::routing::CandidateError).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A way references a node which is not present in the input data.
    #[error("way {way} references unknown node {node}")]
    UnknownPoint { way: i64, node: i64 },

    /// The street network has no part a loop could be planned on -
    /// nothing is left after removing dead ends.
    #[error("no routable area: the street network contains no loops")]
    NoRoutableArea,

    /// The requested loop length is not a positive, finite number of meters.
    #[error("invalid loop length: {0} m")]
    InvalidDistance(f64),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}
