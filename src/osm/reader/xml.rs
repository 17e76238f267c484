// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;
use std::str::from_utf8;

use super::model::Element;

/// Parser is a trait for objects which can parse XML.
///
/// This trait only exists to fix the mismatch of
/// [quick_xml::Reader::read_event] when working on buffered data
/// and [quick_xml::Reader::read_event_into] when working on IO.
pub(super) trait Parser {
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<quick_xml::events::Event<'a>>;
}

/// IoParser implements [Parser] over an [std::io::BufRead].
pub(super) struct IoParser<R: io::BufRead>(quick_xml::Reader<R>, Vec<u8>);

impl<R: io::BufRead> IoParser<R> {
    #[inline]
    fn new(reader: R) -> Self {
        Self(quick_xml::Reader::from_reader(reader), Vec::default())
    }
}

impl<R: io::BufRead> Parser for IoParser<R> {
    #[inline]
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<quick_xml::events::Event<'a>> {
        self.1.clear();
        self.0.read_event_into(&mut self.1)
    }
}

/// BufParser implements [Parser] over a slice of bytes (`&[u8]`).
pub(super) struct BufParser<'a>(quick_xml::Reader<&'a [u8]>);

impl<'a> BufParser<'a> {
    #[inline]
    fn new(data: &'a [u8]) -> Self {
        Self(quick_xml::Reader::from_reader(data))
    }
}

impl<'a> Parser for BufParser<'a> {
    #[inline]
    fn read_event<'b>(&'b mut self) -> quick_xml::Result<quick_xml::events::Event<'b>> {
        self.0.read_event()
    }
}

/// Reader reads [Elements](Element) from an OSM XML file.
///
/// Only `node` and `way` features are of interest; relations, tags and
/// any other XML content are skipped. Nodes without a valid id or position
/// are silently dropped.
pub(super) struct Reader<P: Parser> {
    parser: P,
    eof: bool,
}

impl<P: Parser> Reader<P> {
    #[inline]
    fn new(parser: P) -> Self {
        Self { parser, eof: false }
    }
}

impl<P: Parser> Iterator for Reader<P> {
    type Item = Result<Element, quick_xml::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut way: Option<(i64, Vec<i64>)> = None;

        while !self.eof {
            let event = match self.parser.read_event() {
                Ok(e) => e,
                Err(e) => return Some(Err(e)),
            };

            match event {
                quick_xml::events::Event::Empty(start) => match start.local_name().as_ref() {
                    b"node" => {
                        if let Some(p) = parse_node(start) {
                            return Some(Ok(p));
                        }
                    }
                    // "way" can't be self-closing
                    b"nd" => {
                        if let Some((_, ref mut nodes)) = way {
                            if let Some(ref_) = parse_nd(start) {
                                nodes.push(ref_);
                            }
                        }
                    }
                    _ => {}
                },

                quick_xml::events::Event::Start(start) => match start.local_name().as_ref() {
                    // A node with children (tags) - the element is complete after its start tag
                    b"node" => {
                        if let Some(p) = parse_node(start) {
                            return Some(Ok(p));
                        }
                    }
                    b"way" => way = parse_way_id(start).map(|id| (id, Vec::default())),
                    _ => {}
                },

                quick_xml::events::Event::End(end) => {
                    if end.local_name().as_ref() == b"way" {
                        if let Some((id, nodes)) = way.take() {
                            return Some(Ok(Element::Polyline { id, nodes }));
                        }
                    }
                }

                quick_xml::events::Event::Eof => {
                    self.eof = true;
                }

                _ => {}
            }
        }

        way.map(|(id, nodes)| Ok(Element::Polyline { id, nodes }))
    }
}

impl<'a> Reader<BufParser<'a>> {
    #[inline]
    pub(super) fn from_buffer(data: &'a [u8]) -> Self {
        Self::new(BufParser::new(data))
    }
}

impl<R: io::BufRead> Reader<IoParser<R>> {
    #[inline]
    pub(super) fn from_io(reader: R) -> Self {
        Self::new(IoParser::new(reader))
    }
}

fn parse_node(start: quick_xml::events::BytesStart<'_>) -> Option<Element> {
    let mut id: i64 = 0;
    let mut lat = f64::NAN;
    let mut lon = f64::NAN;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"id" => id = from_utf8(&attr.value).ok()?.parse().ok()?,
            b"lat" => lat = from_utf8(&attr.value).ok()?.parse().ok()?,
            b"lon" => lon = from_utf8(&attr.value).ok()?.parse().ok()?,
            _ => {}
        }
    }

    if id != 0 && lat.is_finite() && lon.is_finite() {
        Some(Element::Point { id, lat, lon })
    } else {
        log::trace!("skipping node without a valid id or position (id {id})");
        None
    }
}

fn parse_way_id(start: quick_xml::events::BytesStart<'_>) -> Option<i64> {
    let mut id: i64 = 0;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"id" {
            id = from_utf8(&attr.value).ok()?.parse().ok()?;
        }
    }

    if id != 0 {
        Some(id)
    } else {
        None
    }
}

fn parse_nd(start: quick_xml::events::BytesStart<'_>) -> Option<i64> {
    let mut ref_: i64 = 0;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"ref" {
            ref_ = from_utf8(&attr.value).ok()?.parse().ok()?;
        }
    }

    if ref_ != 0 {
        Some(ref_)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::expected_elements;
    use super::*;

    const SIMPLE_XML: &[u8] = include_bytes!("test_fixtures/simple.osm");

    #[test]
    fn parse_from_buf() -> Result<(), quick_xml::Error> {
        let elements = Reader::from_buffer(SIMPLE_XML).collect::<Result<Vec<_>, _>>()?;
        assert_eq!(elements, expected_elements());
        Ok(())
    }

    #[test]
    fn parse_from_io() -> Result<(), quick_xml::Error> {
        let elements =
            Reader::from_io(io::Cursor::new(SIMPLE_XML)).collect::<Result<Vec<_>, _>>()?;
        assert_eq!(elements, expected_elements());
        Ok(())
    }

    #[test]
    fn malformed_xml() {
        const DATA: &[u8] = br#"<osm><node id="1" lat="1" lon="2"/></way></osm>"#;
        let result = Reader::from_buffer(DATA).collect::<Result<Vec<_>, _>>();
        assert!(result.is_err());
    }
}
