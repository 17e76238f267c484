// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io;
use std::path::Path;

use graph_builder::GraphBuilder;

use crate::{Error, Graph};

mod graph_builder;
mod json;
mod model;
mod xml;

pub use model::Element;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,

    /// [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON),
    /// as returned by the Overpass API with `[out:json]`
    Json,
}

impl FileFormat {
    /// Guesses the format based on the file extension:
    /// `.osm`/`.xml`, `.osm.gz`/`.xml.gz`, `.osm.bz2`/`.xml.bz2` or `.json`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".osm") || name.ends_with(".xml") {
            Some(Self::Xml)
        } else if name.ends_with(".osm.gz") || name.ends_with(".xml.gz") {
            Some(Self::XmlGz)
        } else if name.ends_with(".osm.bz2") || name.ends_with(".xml.bz2") {
            Some(Self::XmlBz2)
        } else if name.ends_with(".json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// Additional controls for reading OSM data.
#[derive(Debug, Clone)]
pub struct Options {
    /// Format of the input data.
    pub file_format: FileFormat,
}

/// Parse OSM elements from a reader, as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn elements_from_io<R: io::Read>(options: &Options, reader: R) -> Result<Vec<Element>, Error> {
    match options.file_format {
        FileFormat::Xml => {
            let b = io::BufReader::new(reader);
            Ok(xml::Reader::from_io(b).collect::<Result<_, _>>()?)
        }

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            let b = io::BufReader::new(d);
            Ok(xml::Reader::from_io(b).collect::<Result<_, _>>()?)
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            let b = io::BufReader::new(d);
            Ok(xml::Reader::from_io(b).collect::<Result<_, _>>()?)
        }

        FileFormat::Json => {
            let b = io::BufReader::new(reader);
            Ok(json::elements_from_io(b)?)
        }
    }
}

/// Parse OSM elements from a file at the provided path, as per the provided [Options].
pub fn elements_from_file<P: AsRef<Path>>(
    options: &Options,
    path: P,
) -> Result<Vec<Element>, Error> {
    let f = File::open(path)?;
    elements_from_io(options, f)
}

/// Parse OSM elements from a static buffer, as per the provided [Options].
pub fn elements_from_buffer(options: &Options, data: &[u8]) -> Result<Vec<Element>, Error> {
    match options.file_format {
        // Fast paths are available for in-memory uncompressed data
        FileFormat::Xml => Ok(xml::Reader::from_buffer(data).collect::<Result<_, _>>()?),
        FileFormat::Json => Ok(json::elements_from_buffer(data)?),
        _ => elements_from_io(options, io::Cursor::new(data)),
    }
}

/// Builds a [Graph] out of raw [Elements](Element) and removes all dead ends from it.
///
/// Points may come before or after the polylines referencing them, but every
/// referenced point must be present - otherwise [Error::UnknownPoint] is returned.
/// The resulting graph is either empty, or every node has at least two neighbors.
pub fn build_graph<I: IntoIterator<Item = Element>>(elements: I) -> Result<Graph, Error> {
    let mut b = GraphBuilder::new();
    elements.into_iter().for_each(|e| b.add_element(e));
    b.finish()
}

/// Parse OSM data from a reader straight into a pruned [Graph].
pub fn load_graph_from_io<R: io::Read>(options: &Options, reader: R) -> Result<Graph, Error> {
    match options.file_format {
        FileFormat::Xml => {
            let mut b = GraphBuilder::new();
            b.add_elements(xml::Reader::from_io(io::BufReader::new(reader)))?;
            b.finish()
        }
        _ => build_graph(elements_from_io(options, reader)?),
    }
}

/// Parse OSM data from a file at the provided path straight into a pruned [Graph].
pub fn load_graph_from_file<P: AsRef<Path>>(options: &Options, path: P) -> Result<Graph, Error> {
    let f = File::open(path)?;
    load_graph_from_io(options, f)
}

/// Parse OSM data from a static buffer straight into a pruned [Graph].
pub fn load_graph_from_buffer(options: &Options, data: &[u8]) -> Result<Graph, Error> {
    build_graph(elements_from_buffer(options, data)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Elements stored in all `test_fixtures/simple.*` files.
    pub(crate) fn expected_elements() -> Vec<Element> {
        let point = |id, lat, lon| Element::Point { id, lat, lon };
        let polyline = |id, nodes: &[i64]| Element::Polyline {
            id,
            nodes: nodes.to_vec(),
        };

        vec![
            point(1, 51.5, -0.1),
            point(2, 51.5, -0.0985),
            point(3, 51.5009, -0.0985),
            point(4, 51.5009, -0.1),
            point(5, 51.5015, -0.1005),
            point(6, 51.502, -0.101),
            point(7, 51.499, -0.102),
            point(8, 51.5, -0.097),
            point(9, 51.5009, -0.097),
            polyline(100, &[1, 2, 3, 4, 1]),
            polyline(101, &[4, 5, 5, 6]),
            polyline(102, &[2, 8, 9, 3]),
        ]
    }

    #[test]
    fn file_format_from_path() {
        assert_eq!(FileFormat::from_path("a/b/monaco.osm"), Some(FileFormat::Xml));
        assert_eq!(FileFormat::from_path("export.XML"), Some(FileFormat::Xml));
        assert_eq!(FileFormat::from_path("monaco.osm.gz"), Some(FileFormat::XmlGz));
        assert_eq!(FileFormat::from_path("monaco.osm.bz2"), Some(FileFormat::XmlBz2));
        assert_eq!(FileFormat::from_path("interpreter.json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path("monaco.osm.pbf"), None);
        assert_eq!(FileFormat::from_path(""), None);
    }

    #[test]
    fn compressed_xml() -> Result<(), Error> {
        const GZ: &[u8] = include_bytes!("test_fixtures/simple.osm.gz");
        const BZ2: &[u8] = include_bytes!("test_fixtures/simple.osm.bz2");

        let gz = Options {
            file_format: FileFormat::XmlGz,
        };
        assert_eq!(elements_from_buffer(&gz, GZ)?, expected_elements());

        let bz2 = Options {
            file_format: FileFormat::XmlBz2,
        };
        assert_eq!(elements_from_buffer(&bz2, BZ2)?, expected_elements());
        Ok(())
    }

    #[test]
    fn wrong_format_is_an_error() {
        const XML: &[u8] = include_bytes!("test_fixtures/simple.osm");
        let options = Options {
            file_format: FileFormat::Json,
        };
        assert!(matches!(
            elements_from_buffer(&options, XML),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn read_from_file() -> Result<(), Error> {
        const PATH: &str = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/src/osm/reader/test_fixtures/simple.osm"
        );
        let options = Options {
            file_format: FileFormat::Xml,
        };

        assert_eq!(elements_from_file(&options, PATH)?, expected_elements());

        let g = load_graph_from_file(&options, PATH)?;
        let ids: Vec<i64> = g.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 8, 9]);
        Ok(())
    }

    #[test]
    fn missing_file() {
        let options = Options {
            file_format: FileFormat::Xml,
        };
        assert!(matches!(
            load_graph_from_file(&options, "definitely/not/here.osm"),
            Err(Error::Io(_))
        ));
    }
}
