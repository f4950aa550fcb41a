//! TCX document parsing and sample extraction.
//!
//! Builds the element tree from raw document text and pulls the ordered
//! (timestamp, distance) sample list out of every track. Trackpoints
//! missing either field are excluded from speed computation but stay in
//! the document untouched.

use crate::parser::document::{Document, Element, ElementKind, Node};
use crate::utils::error::ParseError;
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One valid sample extracted from a trackpoint
#[derive(Debug, Clone)]
pub struct TrackSample {
    /// Timestamp exactly as serialized in the document
    pub timestamp: String,
    /// Cumulative distance in meters
    pub distance: f64,
}

/// The ordered valid samples of one track, in document order
#[derive(Debug, Clone)]
pub struct TrackSamples {
    pub samples: Vec<TrackSample>,
}

/// Structure counts for a parsed document
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentStats {
    pub activities: usize,
    pub laps: usize,
    pub tracks: usize,
    pub trackpoints: usize,
}

/// Parse raw TCX text into a document tree
///
/// **Public** - main entry point for parsing
///
/// Whitespace-only text is dropped, so a later indented serialization is
/// idempotent. Malformed markup fails with [`ParseError`]; this is
/// non-recoverable and happens before any transformation rule runs.
pub fn parse_document(content: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let elem = element_from_start(&start)?;
                attach(&mut stack, &mut root, elem)?;
            }
            Event::End(end) => {
                let elem = stack.pop().ok_or_else(|| {
                    ParseError::UnexpectedClose(
                        String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                    )
                })?;
                attach(&mut stack, &mut root, elem)?;
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                if !value.is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(value.into_owned()));
                    }
                }
            }
            Event::CData(data) => {
                let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(value));
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::UnclosedTag(open.name.clone()));
    }

    match root {
        Some(root) => Ok(Document { root }),
        None => Err(ParseError::NoRoot),
    }
}

/// Extract the valid samples of every track in the document
///
/// **Public** - feeds the speed engine
///
/// Tracks are found anywhere in the tree by recursive descent on element
/// kind; no fixed nesting depth is assumed.
pub fn extract_track_samples(doc: &Document) -> Vec<TrackSamples> {
    let mut tracks = Vec::new();
    doc.root.collect(ElementKind::Track, &mut tracks);

    tracks
        .into_iter()
        .map(|track| TrackSamples {
            samples: samples_from_track(track),
        })
        .collect()
}

/// Count the structural elements of a document
pub fn document_stats(doc: &Document) -> DocumentStats {
    let mut stats = DocumentStats::default();
    doc.root.visit(&mut |elem| match elem.kind {
        ElementKind::Activity => stats.activities += 1,
        ElementKind::Lap => stats.laps += 1,
        ElementKind::Track => stats.tracks += 1,
        ElementKind::Trackpoint => stats.trackpoints += 1,
        _ => {}
    });
    stats
}

/// The (timestamp, distance) pair of a trackpoint, if it carries both.
/// The rewriter uses the same predicate when pairing recomputed speeds
/// with trackpoints, so the two walks always stay in sync.
pub(crate) fn sample_of_trackpoint(tp: &Element) -> Option<(&str, f64)> {
    let timestamp = tp.find(ElementKind::Time)?.text()?;
    let distance = tp
        .find(ElementKind::DistanceMeters)?
        .text()?
        .trim()
        .parse()
        .ok()?;
    Some((timestamp, distance))
}

fn samples_from_track(track: &Element) -> Vec<TrackSample> {
    let mut trackpoints = Vec::new();
    track.collect(ElementKind::Trackpoint, &mut trackpoints);

    let samples: Vec<TrackSample> = trackpoints
        .iter()
        .filter_map(|tp| {
            sample_of_trackpoint(tp).map(|(timestamp, distance)| TrackSample {
                timestamp: timestamp.to_string(),
                distance,
            })
        })
        .collect();

    let skipped = trackpoints.len() - samples.len();
    if skipped > 0 {
        debug!("{skipped} trackpoint(s) without both time and distance, excluded from speed computation");
    }

    samples
}

fn element_from_start(start: &BytesStart) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut elem = Element::new(&name);
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        elem.attributes.push((key, value));
    }
    Ok(elem)
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    elem: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(elem));
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::TrailingContent);
    }
    *root = Some(elem);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2">
  <Activities>
    <Activity Sport="Biking">
      <Lap StartTime="2024-05-01T12:00:00Z">
        <Track>
          <Trackpoint>
            <Time>2024-05-01T12:00:00Z</Time>
            <DistanceMeters>0.0</DistanceMeters>
          </Trackpoint>
          <Trackpoint>
            <Time>2024-05-01T12:00:10Z</Time>
            <DistanceMeters>10.0</DistanceMeters>
          </Trackpoint>
          <Trackpoint>
            <Time>2024-05-01T12:00:20Z</Time>
          </Trackpoint>
        </Track>
      </Lap>
    </Activity>
  </Activities>
</TrainingCenterDatabase>"#;

    #[test]
    fn test_parse_document_basic() {
        let doc = parse_document(SAMPLE_TCX).unwrap();
        assert_eq!(doc.root.name, "TrainingCenterDatabase");

        let stats = document_stats(&doc);
        assert_eq!(stats.activities, 1);
        assert_eq!(stats.laps, 1);
        assert_eq!(stats.tracks, 1);
        assert_eq!(stats.trackpoints, 3);
    }

    #[test]
    fn test_extract_skips_trackpoint_without_distance() {
        let doc = parse_document(SAMPLE_TCX).unwrap();
        let tracks = extract_track_samples(&doc);

        assert_eq!(tracks.len(), 1);
        let samples = &tracks[0].samples;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, "2024-05-01T12:00:00Z");
        assert_eq!(samples[0].distance, 0.0);
        assert_eq!(samples[1].distance, 10.0);
    }

    #[test]
    fn test_extract_skips_unparseable_distance() {
        let xml = "<Track><Trackpoint><Time>2024-05-01T12:00:00Z</Time>\
                   <DistanceMeters>abc</DistanceMeters></Trackpoint></Track>";
        let doc = parse_document(xml).unwrap();
        let tracks = extract_track_samples(&doc);
        assert!(tracks[0].samples.is_empty());
    }

    #[test]
    fn test_parse_mismatched_tags_fails() {
        let result = parse_document("<A><B></A></B>");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_unclosed_element_fails() {
        let result = parse_document("<A><B>text</B>");
        assert!(matches!(result, Err(ParseError::UnclosedTag(name)) if name == "A"));
    }

    #[test]
    fn test_parse_empty_input_fails() {
        assert!(matches!(parse_document(""), Err(ParseError::NoRoot)));
    }

    #[test]
    fn test_parse_preserves_attributes_and_unknown_elements() {
        let doc = parse_document(SAMPLE_TCX).unwrap();
        let activity = doc.root.find(ElementKind::Activity).unwrap();
        assert_eq!(activity.attribute("Sport"), Some("Biking"));

        // Activities is not part of the known element set
        let activities = doc.root.child_elements().next().unwrap();
        assert_eq!(activities.kind, ElementKind::Other);
        assert_eq!(activities.name, "Activities");
    }

    #[test]
    fn test_parse_self_closing_element() {
        let doc = parse_document("<A><B/></A>").unwrap();
        let b = doc.root.child_elements().next().unwrap();
        assert_eq!(b.name, "B");
        assert!(b.children.is_empty());
    }
}
