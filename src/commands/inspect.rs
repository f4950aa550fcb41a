//! Inspect command and version display.

use crate::parser::tcx::{document_stats, extract_track_samples, parse_document};
use crate::utils::config::REPORT_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Parse a TCX file and print its structure
pub fn inspect_file(file_path: PathBuf) -> Result<()> {
    println!("Inspecting: {}", file_path.display());

    let content = std::fs::read_to_string(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    let doc = parse_document(&content).context("Failed to parse TCX document")?;

    let stats = document_stats(&doc);
    let valid_samples: usize = extract_track_samples(&doc)
        .iter()
        .map(|track| track.samples.len())
        .sum();

    println!("✓ Well-formed TCX document");
    println!("  Root element: {}", doc.root.name);
    println!("  Activities:   {}", stats.activities);
    println!("  Laps:         {}", stats.laps);
    println!("  Tracks:       {}", stats.tracks);
    println!(
        "  Trackpoints:  {} ({} with time and distance)",
        stats.trackpoints, valid_samples
    );

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("tcxconv v{}", env!("CARGO_PKG_VERSION"));
    println!("Report schema: v{}", REPORT_VERSION);
    println!();
    println!("Converts Peloton TCX exports into TrainerRoad-compatible TCX files.");
}
