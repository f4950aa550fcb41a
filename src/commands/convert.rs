//! Convert command implementation.
//!
//! The convert command:
//! 1. Reads and parses the source TCX file
//! 2. Recomputes instantaneous speeds from distance and time deltas
//! 3. Applies the structural rewrite rules
//! 4. Writes the converted document
//! 5. Optionally writes a JSON report and prints a summary

use crate::converter::convert_file;
use crate::output::report::{write_report, ConversionReport};
use crate::utils::config::EXT_PREFIX;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Input TCX file (Peloton format)
    pub input: PathBuf,

    /// Output TCX file
    pub output: PathBuf,

    /// Optional path for a JSON conversion report
    pub report: Option<PathBuf>,

    /// Print a human-readable summary to stdout
    pub print_summary: bool,
}

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input access or parse failures
/// * File write errors
pub fn execute_convert(args: ConvertArgs) -> Result<()> {
    let start_time = Instant::now();

    let report = convert_file(&args.input, &args.output)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    info!("✓ Converted document written to: {}", args.output.display());

    if let Some(report_path) = &args.report {
        write_report(&report, report_path)
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        info!("✓ Report written to: {}", report_path.display());
    }

    if args.print_summary {
        print_summary(&report);
    }

    let elapsed = start_time.elapsed();
    info!("Conversion completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if args.input == args.output {
        anyhow::bail!("Input and output paths must differ");
    }

    Ok(())
}

/// Print a human-readable summary of the applied transformations
///
/// **Private** - internal helper for execute_convert
fn print_summary(report: &ConversionReport) {
    println!("\n{}", "=".repeat(80));
    println!("CONVERSION SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Activities:  {}", report.activities);
    println!("Laps:        {}", report.laps);
    println!("Trackpoints: {}", report.trackpoints);
    println!();
    println!("Applied transformations:");
    println!("  - Removed {} Creator element(s)", report.creators_removed);
    println!(
        "  - Removed {} lap-level aggregate extension block(s)",
        report.lap_aggregates_removed
    );
    println!(
        "  - Reassigned {} sample extension block(s) to the {} prefix",
        report.extensions_reassigned, EXT_PREFIX
    );
    println!(
        "  - Removed {} Resistance element(s)",
        report.resistance_removed
    );
    println!(
        "  - Normalized {} integer value(s)",
        report.values_normalized
    );
    println!(
        "  - Recomputed {} speed value(s)",
        report.speeds_recomputed
    );
    println!("{}", "=".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str, output: &str) -> ConvertArgs {
        ConvertArgs {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
            report: None,
            print_summary: false,
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&args("ride.tcx", "converted.tcx")).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        assert!(validate_args(&args("", "converted.tcx")).is_err());
    }

    #[test]
    fn test_validate_args_empty_output() {
        assert!(validate_args(&args("ride.tcx", "")).is_err());
    }

    #[test]
    fn test_validate_args_same_path() {
        assert!(validate_args(&args("ride.tcx", "ride.tcx")).is_err());
    }
}
