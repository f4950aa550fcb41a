//! The conversion pipeline.
//!
//! Composes the parser, speed engine, rewriter and serializer into the
//! one-shot file conversion the CLI exposes. Failures while reading or
//! parsing the input abort the conversion; an indented-serialization
//! failure degrades to unindented output instead, since the transformed
//! document is still the best available result.

use crate::output::report::ConversionReport;
use crate::output::xml::{serialize_document, write_document};
use crate::parser::tcx::{document_stats, extract_track_samples, parse_document};
use crate::rewriter::rules::apply_rules;
use crate::speed::engine::{compute_speeds, SpeedSample};
use crate::utils::config::REPORT_VERSION;
use crate::utils::error::ConvertError;
use chrono::Utc;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Convert one TCX file and write the result
///
/// **Public** - main entry point for the CLI
///
/// Reads the whole input first; nothing is written to `output` unless
/// parsing and rewriting succeed, so a failed conversion never creates
/// or modifies the output file.
///
/// # Errors
/// * `ConvertError::InputNotFound` - input path is not a readable file
/// * `ConvertError::Parse` - input is not well-formed TCX
/// * `ConvertError::Output` - the result could not be written
/// * `ConvertError::Unexpected` - encoding or other I/O failures
pub fn convert_file(input: &Path, output: &Path) -> Result<ConversionReport, ConvertError> {
    info!("Converting {} -> {}", input.display(), output.display());

    let content = read_input(input)?;
    let (xml, report) = convert_str(&content)?;
    write_document(&xml, output)?;

    Ok(report)
}

/// Convert raw TCX text
///
/// **Public** - the pure core of the pipeline, also used by tests
pub fn convert_str(content: &str) -> Result<(String, ConversionReport), ConvertError> {
    // Stage 1: parse into a tree and extract per-track samples
    let mut doc = parse_document(content)?;
    let stats = document_stats(&doc);
    debug!(
        "Parsed document: {} activities, {} laps, {} tracks, {} trackpoints",
        stats.activities, stats.laps, stats.tracks, stats.trackpoints
    );

    let tracks = extract_track_samples(&doc);

    // Stage 2: recompute instantaneous speeds per track
    let mut speeds_per_track: Vec<Vec<SpeedSample>> = Vec::with_capacity(tracks.len());
    for track in &tracks {
        speeds_per_track.push(compute_speeds(&track.samples)?);
    }

    // Stage 3: structural rewrite, speeds written in place
    let outcome = apply_rules(&mut doc, &speeds_per_track);

    // Stage 4: serialize, degrading to unindented output on failure
    let xml = match serialize_document(&doc, true) {
        Ok(xml) => xml,
        Err(err) => {
            warn!("Indented serialization failed ({err}); emitting unindented output");
            serialize_document(&doc, false)?
        }
    };

    let report = ConversionReport {
        version: REPORT_VERSION.to_string(),
        activities: stats.activities,
        laps: stats.laps,
        tracks: stats.tracks,
        trackpoints: stats.trackpoints,
        creators_removed: outcome.creators_removed,
        lap_aggregates_removed: outcome.lap_aggregates_removed,
        extensions_reassigned: outcome.extensions_reassigned,
        resistance_removed: outcome.resistance_removed,
        values_normalized: outcome.values_normalized,
        speeds_recomputed: outcome.speeds_injected,
        generated_at: Utc::now().to_rfc3339(),
    };

    Ok((xml, report))
}

fn read_input(path: &Path) -> Result<String, ConvertError> {
    if !path.is_file() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }

    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConvertError::InputNotFound(path.to_path_buf()),
        _ => ConvertError::Unexpected(e),
    })
}
