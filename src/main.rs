//! tcxconv CLI
//!
//! Converts TCX workout files exported from Peloton into the variant
//! accepted by TrainerRoad and other training platforms.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use tcxconv::commands::{display_version, execute_convert, inspect_file, validate_args, ConvertArgs};

/// Convert Peloton TCX exports for other training platforms
#[derive(Parser, Debug)]
#[command(name = "tcxconv")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a TCX file
    Convert {
        /// Input TCX file (Peloton format)
        input: PathBuf,

        /// Output TCX file
        output: PathBuf,

        /// Write a JSON conversion report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print a summary of the applied transformations
        #[arg(long)]
        summary: bool,
    },

    /// Parse a TCX file and print its structure
    Inspect {
        /// Path to TCX file
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Convert {
            input,
            output,
            report,
            summary,
        } => {
            let args = ConvertArgs {
                input,
                output,
                report,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_convert(args)?;
        }

        Commands::Inspect { file } => {
            inspect_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
