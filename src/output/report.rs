//! JSON conversion-report writer.
//!
//! The report summarizes what one conversion run did: document structure
//! counts and how many edits each rewrite rule made. Schema is versioned
//! to allow future evolution.

use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Summary of one conversion run, written to JSON on request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Structure counts of the source document
    pub activities: usize,
    pub laps: usize,
    pub tracks: usize,
    pub trackpoints: usize,

    /// Edits made by the rewrite rules
    pub creators_removed: usize,
    pub lap_aggregates_removed: usize,
    pub extensions_reassigned: usize,
    pub resistance_removed: usize,
    pub values_normalized: usize,
    pub speeds_recomputed: usize,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for report output
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty or a directory
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::ReportFailed` - JSON serialization error
pub fn write_report(
    report: &ConversionReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing conversion report to: {}", output_path.display());

    super::xml::validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report).map_err(OutputError::ReportFailed)?;

    Ok(())
}

/// Read a report back from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_report(input_path: impl AsRef<Path>) -> Result<ConversionReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading conversion report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: ConversionReport =
        serde_json::from_reader(file).map_err(OutputError::ReportFailed)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_report() -> ConversionReport {
        ConversionReport {
            version: "1.0.0".to_string(),
            activities: 1,
            laps: 2,
            tracks: 2,
            trackpoints: 240,
            creators_removed: 1,
            lap_aggregates_removed: 2,
            extensions_reassigned: 240,
            resistance_removed: 240,
            values_normalized: 480,
            speeds_recomputed: 240,
            generated_at: "2024-05-01T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded.version, report.version);
        assert_eq!(loaded.trackpoints, report.trackpoints);
        assert_eq!(loaded.speeds_recomputed, report.speeds_recomputed);
    }

    #[test]
    fn test_write_report_to_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = write_report(&create_test_report(), temp_dir.path());
        assert!(result.is_err());
    }
}
