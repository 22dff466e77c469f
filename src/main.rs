//! Trace Triage CLI
//!
//! Normalizes Playwright trace zip bundles from failed test runs into
//! compact canonical bundles for downstream analysis.

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

use trace_triage::commands::{execute_normalize, validate_args, NormalizeArgs};

/// Trace Triage - normalization of failed-run trace bundles
#[derive(Parser, Debug)]
#[command(name = "trace-triage")]
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
    /// Extract and normalize one or more trace archives
    Normalize {
        /// Trace zip archives to process
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Root directory for bundle output
        #[arg(short, long, default_value = "triage-out")]
        out_dir: PathBuf,

        /// Keep extracted temp directories for inspection
        #[arg(long)]
        keep_extracted: bool,
    },

    /// Display version information
    Version,
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command, mapping the error taxonomy to exit codes
    // (parse = 2, validation = 3, extraction = 4, anything else = 1)
    let code = match cli.command {
        Commands::Normalize {
            inputs,
            out_dir,
            keep_extracted,
        } => {
            let args = NormalizeArgs {
                inputs,
                out_dir,
                keep_extracted,
            };
            run_normalize(args)
        }

        Commands::Version => {
            display_version();
            0
        }
    };

    ExitCode::from(code)
}

/// Run the normalize command, collapsing its result into an exit code
///
/// **Private** - internal command dispatch
fn run_normalize(args: NormalizeArgs) -> u8 {
    if let Err(e) = validate_args(&args) {
        error!("{}", e);
        return e.exit_code() as u8;
    }

    match execute_normalize(args) {
        Ok(summary) => match summary.first_failure_code {
            Some(code) => code as u8,
            None => 0,
        },
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Trace Triage v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Normalization pipeline for Playwright trace bundles.");
}
