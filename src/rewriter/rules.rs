//! Structural rewrite rules.
//!
//! The rules turn a parsed source document into the target variant, in
//! dependency order:
//! 1. Remove Creator elements
//! 2. Remove lap-level aggregate extension blocks
//! 3. Reassign sample extensions to the target namespace prefix
//! 4. Remove Resistance elements
//! 5. Normalize integer-valued numeric text
//! 6. Inject recomputed speeds
//!
//! Every edit happens on the element tree, never on serialized text, and
//! every rule is a fixpoint: running the full set on an already converted
//! document changes nothing.

use crate::parser::document::{Document, Element, ElementKind, Node};
use crate::parser::tcx::sample_of_trackpoint;
use crate::speed::{format_speed, SpeedSample};
use crate::utils::config::{EXT_PREFIX, NS_ACTIVITY_EXT};
use log::{debug, warn};

/// Edit counts from one rewrite pass
///
/// **Public** - feeds the conversion report
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOutcome {
    pub creators_removed: usize,
    pub lap_aggregates_removed: usize,
    pub extensions_reassigned: usize,
    pub resistance_removed: usize,
    pub values_normalized: usize,
    pub speeds_injected: usize,
}

/// Apply the full rule set in dependency order
///
/// **Public** - main entry point for rewriting
///
/// `speeds_per_track` must hold one speed vector per track, in document
/// order, as produced by the extractor and the speed engine.
pub fn apply_rules(doc: &mut Document, speeds_per_track: &[Vec<SpeedSample>]) -> RewriteOutcome {
    let creators_removed = remove_elements(&mut doc.root, ElementKind::Creator);
    let lap_aggregates_removed = remove_lap_aggregates(&mut doc.root);
    let extensions_reassigned = reassign_extension_namespace(doc);
    let resistance_removed = remove_elements(&mut doc.root, ElementKind::Resistance);
    let values_normalized = normalize_numeric_text(&mut doc.root);
    let speeds_injected = inject_speeds(doc, speeds_per_track);

    let outcome = RewriteOutcome {
        creators_removed,
        lap_aggregates_removed,
        extensions_reassigned,
        resistance_removed,
        values_normalized,
        speeds_injected,
    };
    debug!("Rewrite outcome: {outcome:?}");
    outcome
}

/// Rules 1 and 4: remove every element of the given kind with its subtree
pub fn remove_elements(elem: &mut Element, kind: ElementKind) -> usize {
    let before = elem.children.len();
    elem.children
        .retain(|node| !matches!(node, Node::Element(e) if e.kind == kind));
    let mut removed = before - elem.children.len();

    for child in elem.child_elements_mut() {
        removed += remove_elements(child, kind);
    }
    removed
}

/// Rule 2: drop lap-level aggregate extension blocks.
///
/// Matches an Extensions element that contains a TPX child and whose
/// next element sibling is a Track. Sample-level extensions live inside
/// Trackpoint and never have a Track sibling.
pub fn remove_lap_aggregates(elem: &mut Element) -> usize {
    let mut drop_indices = Vec::new();
    for (i, node) in elem.children.iter().enumerate() {
        let Node::Element(ext) = node else { continue };
        if ext.kind != ElementKind::Extensions {
            continue;
        }
        if !ext.child_elements().any(|c| c.kind == ElementKind::Tpx) {
            continue;
        }
        let next_is_track = elem.children[i + 1..].iter().find_map(|n| match n {
            Node::Element(e) => Some(e.kind == ElementKind::Track),
            Node::Text(_) => None,
        });
        if next_is_track == Some(true) {
            drop_indices.push(i);
        }
    }

    let mut removed = drop_indices.len();
    for i in drop_indices.into_iter().rev() {
        elem.children.remove(i);
    }

    for child in elem.child_elements_mut() {
        removed += remove_lap_aggregates(child);
    }
    removed
}

/// Rule 3: reassign sample extensions to the target namespace prefix.
///
/// Drops the inline `xmlns` declaration from each TPX element and
/// renames it and its Speed/Watts children to the prefixed form. The
/// prefix is declared on the root element when missing, so the output
/// stays namespace-valid. Returns the number of blocks actually changed.
pub fn reassign_extension_namespace(doc: &mut Document) -> usize {
    let mut blocks = Vec::new();
    doc.root.collect_mut(ElementKind::Tpx, &mut blocks);
    if blocks.is_empty() {
        return 0;
    }

    let mut reassigned = 0;
    for tpx in blocks {
        let mut changed = tpx.remove_attribute("xmlns");

        let prefixed = format!("{EXT_PREFIX}:TPX");
        if tpx.name != prefixed {
            tpx.rename(&prefixed);
            changed = true;
        }

        for child in tpx.child_elements_mut() {
            match child.kind {
                ElementKind::Speed => changed |= prefix_local_name(child, "Speed"),
                ElementKind::Watts => changed |= prefix_local_name(child, "Watts"),
                _ => {}
            }
        }

        if changed {
            reassigned += 1;
        }
    }

    let declaration = format!("xmlns:{EXT_PREFIX}");
    if doc.root.attribute(&declaration).is_none() {
        doc.root.set_attribute(&declaration, NS_ACTIVITY_EXT);
        debug!("Declared {declaration} on the root element");
    }

    reassigned
}

/// Rule 5: strip the trailing `.0` from integer-valued quantities.
///
/// Applies to heart-rate Value, Cadence, and Watts text. Genuinely
/// fractional values keep their full precision, and Speed is never
/// touched.
pub fn normalize_numeric_text(elem: &mut Element) -> usize {
    let mut normalized = 0;

    if matches!(
        elem.kind,
        ElementKind::Value | ElementKind::Cadence | ElementKind::Watts
    ) {
        let stripped = elem.text().and_then(strip_integer_suffix).map(str::to_owned);
        if let Some(bare) = stripped {
            elem.set_text(&bare);
            normalized += 1;
        }
    }

    for child in elem.child_elements_mut() {
        normalized += normalize_numeric_text(child);
    }
    normalized
}

/// Rule 6: write recomputed speeds into the sample extension elements.
///
/// Tracks and trackpoints are walked in the same order and with the same
/// validity predicate the extractor used, so each speed lands on exactly
/// the trackpoint it was computed from. A trackpoint without a Speed
/// extension element is left alone.
pub fn inject_speeds(doc: &mut Document, speeds_per_track: &[Vec<SpeedSample>]) -> usize {
    let mut tracks = Vec::new();
    doc.root.collect_mut(ElementKind::Track, &mut tracks);

    if tracks.len() != speeds_per_track.len() {
        warn!(
            "Have speeds for {} track(s) but the document has {}",
            speeds_per_track.len(),
            tracks.len()
        );
    }

    let mut injected = 0;
    for (track, speeds) in tracks.into_iter().zip(speeds_per_track) {
        injected += inject_into_track(track, speeds);
    }
    injected
}

fn inject_into_track(track: &mut Element, speeds: &[SpeedSample]) -> usize {
    let mut trackpoints = Vec::new();
    track.collect_mut(ElementKind::Trackpoint, &mut trackpoints);

    let mut injected = 0;
    let mut queue = speeds.iter();
    for tp in trackpoints {
        let Some(timestamp) = sample_of_trackpoint(tp).map(|(t, _)| t.to_string()) else {
            continue;
        };
        let Some(sample) = queue.next() else { break };
        if sample.timestamp != timestamp {
            warn!(
                "Speed computed for {} does not match trackpoint at {timestamp}; keeping source value",
                sample.timestamp
            );
            continue;
        }
        if let Some(speed_elem) = tp.find_mut(ElementKind::Speed) {
            speed_elem.set_text(&format_speed(sample.speed_mps));
            injected += 1;
        }
    }
    injected
}

fn prefix_local_name(elem: &mut Element, local: &str) -> bool {
    let prefixed = format!("{EXT_PREFIX}:{local}");
    if elem.name == prefixed {
        return false;
    }
    elem.rename(&prefixed);
    true
}

/// `"142.0"` becomes `Some("142")`; anything else is left alone
fn strip_integer_suffix(text: &str) -> Option<&str> {
    let bare = text.strip_suffix(".0")?;
    (!bare.is_empty() && bare.bytes().all(|b| b.is_ascii_digit())).then_some(bare)
}
