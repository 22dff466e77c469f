//! Bundle output writer.
//!
//! Writes one directory per normalized run: the four transport texts plus a
//! small manifest describing where the bundle came from and when it was
//! produced.

use crate::pipeline::NormalizedRun;
use crate::utils::config::MANIFEST_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Manifest written next to the four bundle files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Manifest schema version for compatibility checking
    pub version: String,

    /// Origin label derived from the extracted directory's base name
    pub origin: String,

    /// Archive the bundle was produced from
    pub source_archive: String,

    /// ISO 8601 timestamp of bundle creation
    pub generated_at: String,
}

/// File names of the bundle within a run's output directory
const STEP_TRACE_FILE: &str = "test.trace.json";
const RAW_TRACE_FILE: &str = "trace.trace.json";
const CALL_STACKS_FILE: &str = "trace.stacks.txt";
const NETWORK_TRACE_FILE: &str = "trace.network.json";
const MANIFEST_FILE: &str = "manifest.json";

/// Write a normalized run under `out_dir/<origin>/`
///
/// **Public** - main entry point for bundle output
///
/// # Errors
/// * `OutputError::InvalidPath` - output root is a file
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - manifest serialization error
pub fn write_run(run: &NormalizedRun, out_dir: &Path) -> Result<PathBuf, OutputError> {
    if out_dir.exists() && !out_dir.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Output path is not a directory: {}",
            out_dir.display()
        )));
    }

    let run_dir = out_dir.join(&run.origin);
    debug!("Writing bundle to {}", run_dir.display());
    fs::create_dir_all(&run_dir)?;

    fs::write(run_dir.join(STEP_TRACE_FILE), &run.traces.step_trace)?;
    fs::write(run_dir.join(RAW_TRACE_FILE), &run.traces.raw_trace)?;
    fs::write(run_dir.join(CALL_STACKS_FILE), &run.traces.call_stacks)?;
    fs::write(run_dir.join(NETWORK_TRACE_FILE), &run.traces.network_trace)?;

    let manifest = RunManifest {
        version: MANIFEST_VERSION.to_string(),
        origin: run.origin.clone(),
        source_archive: run.source_archive.display().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    let writer = BufWriter::new(File::create(run_dir.join(MANIFEST_FILE))?);
    serde_json::to_writer_pretty(writer, &manifest)?;

    info!("Bundle written to {}", run_dir.display());

    Ok(run_dir)
}
