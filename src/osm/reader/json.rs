// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;

use serde::Deserialize;

use super::model::Element;

/// Top-level object returned by the [Overpass API](https://wiki.openstreetmap.org/wiki/Overpass_API)
/// with `[out:json]`. Metadata (`version`, `generator`, `osm3s`) is ignored.
#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawElement {
    Node {
        id: i64,
        lat: Option<f64>,
        lon: Option<f64>,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
    },
    #[serde(other)]
    Other,
}

impl RawElement {
    fn into_element(self) -> Option<Element> {
        match self {
            Self::Node {
                id,
                lat: Some(lat),
                lon: Some(lon),
            } if id != 0 && lat.is_finite() && lon.is_finite() => {
                Some(Element::Point { id, lat, lon })
            }
            Self::Node { id, .. } => {
                log::trace!("skipping node without a valid id or position (id {id})");
                None
            }
            Self::Way { id, nodes } => Some(Element::Polyline { id, nodes }),
            Self::Other => None,
        }
    }
}

fn convert(response: Response) -> Vec<Element> {
    response
        .elements
        .into_iter()
        .filter_map(RawElement::into_element)
        .collect()
}

/// Reads all nodes and ways from an Overpass JSON document.
pub(super) fn elements_from_io<R: io::Read>(reader: R) -> Result<Vec<Element>, serde_json::Error> {
    let response: Response = serde_json::from_reader(reader)?;
    Ok(convert(response))
}

/// Reads all nodes and ways from an in-memory Overpass JSON document.
pub(super) fn elements_from_buffer(data: &[u8]) -> Result<Vec<Element>, serde_json::Error> {
    let response: Response = serde_json::from_slice(data)?;
    Ok(convert(response))
}
