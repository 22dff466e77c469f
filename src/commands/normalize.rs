//! Normalize command implementation.
//!
//! The normalize command:
//! 1. Validates the caller-side preconditions on the input paths
//! 2. Runs the extraction/normalization pipeline over all archives
//! 3. Writes one bundle directory per successful run
//! 4. Applies the extraction-directory retention policy
//! 5. Reports per-archive failures without aborting the rest

use crate::archive::cleanup_extracted;
use crate::output::write_run;
use crate::pipeline::process_batch;
use crate::utils::error::{TriageError, ValidationError};
use anyhow::Result;
use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the normalize command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct NormalizeArgs {
    /// Trace archives to process
    pub inputs: Vec<PathBuf>,

    /// Root directory for bundle output
    pub out_dir: PathBuf,

    /// Keep extracted temp directories instead of removing them
    pub keep_extracted: bool,
}

/// What happened across the batch
#[derive(Debug, Clone, Copy)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Exit code of the first failure, if any
    pub first_failure_code: Option<i32>,
}

/// Validate normalize arguments
///
/// **Public** - called before execute_normalize for early validation.
/// The pipeline itself performs no extension checks; that precondition is
/// owned here, at the caller boundary.
pub fn validate_args(args: &NormalizeArgs) -> Result<(), TriageError> {
    if args.inputs.is_empty() {
        return Err(ValidationError::Precondition(
            "at least one trace archive is required".to_string(),
        )
        .into());
    }

    for input in &args.inputs {
        if input.extension().and_then(|e| e.to_str()) != Some("zip") {
            return Err(ValidationError::Precondition(format!(
                "Trace file must be .zip: received \"{}\"",
                input.display()
            ))
            .into());
        }
        if !input.is_file() {
            return Err(ValidationError::Precondition(format!(
                "File does not exist: \"{}\"",
                input.display()
            ))
            .into());
        }
    }

    Ok(())
}

/// Execute the normalize command
///
/// **Public** - main entry point called from main.rs
///
/// Failures for one archive are reported and counted; sibling archives are
/// unaffected. Returns a summary the CLI maps to a process exit code.
pub fn execute_normalize(args: NormalizeArgs) -> Result<BatchSummary> {
    let start_time = Instant::now();
    info!("Normalizing {} archive(s)", args.inputs.len());

    let outcomes = process_batch(&args.inputs);

    let mut summary = BatchSummary {
        succeeded: 0,
        failed: 0,
        first_failure_code: None,
    };

    for outcome in outcomes {
        match outcome.result {
            Ok(run) => {
                // A write failure is this archive's failure, not the batch's:
                // siblings keep going and the extraction dir still honors the
                // retention policy.
                match write_run(&run, &args.out_dir) {
                    Ok(run_dir) => {
                        info!(
                            "✓ {} -> {}",
                            outcome.archive.display(),
                            run_dir.display()
                        );
                        summary.succeeded += 1;
                    }
                    Err(e) => {
                        error!(
                            "✗ {}: failed to write bundle: {}",
                            outcome.archive.display(),
                            e
                        );
                        summary.failed += 1;
                        summary.first_failure_code.get_or_insert(1);
                    }
                }
                if !args.keep_extracted {
                    cleanup_extracted(&run.extracted_dir);
                }
            }
            Err(e) => {
                error!("✗ {}: {}", outcome.archive.display(), e);
                summary.failed += 1;
                summary.first_failure_code.get_or_insert(e.exit_code());
            }
        }
    }

    info!(
        "Batch complete in {:.2}s: {} succeeded, {} failed",
        start_time.elapsed().as_secs_f64(),
        summary.succeeded,
        summary.failed
    );

    Ok(summary)
}
