//! Per-archive pipeline and batch orchestration.
//!
//! One archive flows strictly forward: extract, locate, normalize. Archives
//! in a batch are independent units of work with no shared mutable state,
//! so the batch runs them task-parallel; one archive's failure never aborts
//! its siblings.

use crate::archive::{cleanup_extracted, extract_to_temp, locate_artifacts};
use crate::normalizer::{normalize_artifacts, NormalizedBundle};
use crate::utils::error::TriageError;
use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One archive's normalized output, tagged with its origin label
#[derive(Debug, Clone)]
pub struct NormalizedRun {
    /// Base name of the extracted directory, used to key output
    pub origin: String,

    /// The four normalized artifacts, serialized for transport
    pub traces: NormalizedBundle,

    /// Archive this run came from
    pub source_archive: PathBuf,

    /// Extraction directory, tracked so the caller can apply its
    /// retention policy once the run is consumed
    pub extracted_dir: PathBuf,
}

/// Outcome of one archive in a batch, keyed by the input path
#[derive(Debug)]
pub struct ArchiveOutcome {
    pub archive: PathBuf,
    pub result: Result<NormalizedRun, TriageError>,
}

/// Run the full pipeline for a single archive
///
/// **Public** - extract, locate, normalize, in that order. On failure the
/// extraction directory is removed before the error is returned; on success
/// it is handed to the caller inside the run record.
pub fn process_archive(archive: &Path) -> Result<NormalizedRun, TriageError> {
    debug!("Processing archive: {}", archive.display());

    let extracted_dir = extract_to_temp(archive)?;

    let artifacts = match locate_artifacts(&extracted_dir) {
        Ok(set) => set,
        Err(e) => {
            cleanup_extracted(&extracted_dir);
            return Err(e);
        }
    };

    let traces = match normalize_artifacts(artifacts) {
        Ok(bundle) => bundle,
        Err(e) => {
            cleanup_extracted(&extracted_dir);
            return Err(e.into());
        }
    };

    let origin = extracted_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("trace-bundle")
        .to_string();

    info!("Normalized {} as \"{}\"", archive.display(), origin);

    Ok(NormalizedRun {
        origin,
        traces,
        source_archive: archive.to_path_buf(),
        extracted_dir,
    })
}

/// Run the pipeline over a batch of archives, one parallel task each
///
/// **Public** - outcomes come back in input order regardless of completion
/// order. No cross-task cancellation: a failing archive reports its own
/// error while the others run to completion.
pub fn process_batch(archives: &[PathBuf]) -> Vec<ArchiveOutcome> {
    archives
        .par_iter()
        .map(|archive| ArchiveOutcome {
            archive: archive.clone(),
            result: process_archive(archive),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ExtractionError;
    use std::fs::File;
    use std::io::Write;

    fn write_bundle_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (entry_name, content) in entries {
            writer.start_file(*entry_name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    const WELL_FORMED: &[(&str, &str)] = &[
        ("test.trace", "{\"type\":\"expect\",\"startTime\":100,\"endTime\":150}"),
        ("trace.trace", "{\"type\":\"before\",\"params\":{\"selector\":\"#x\"}}"),
        ("trace.stacks", "{\"files\":[\"a.ts\"],\"stacks\":[[1,[[0,1,1,\"f\"]]]]}"),
        ("trace.network", "{\"type\":\"resource-snapshot\"}"),
    ];

    #[test]
    fn test_process_archive_end_to_end() {
        let workdir = tempfile::tempdir().unwrap();
        let archive = write_bundle_zip(workdir.path(), "run1.zip", WELL_FORMED);

        let run = process_archive(&archive).unwrap();
        assert!(run.origin.starts_with("run1"));
        assert!(run.traces.step_trace.contains("\"duration\":50"));
        assert!(run.extracted_dir.exists());

        cleanup_extracted(&run.extracted_dir);
    }

    #[test]
    fn test_failed_run_leaves_no_extraction_directory() {
        let workdir = tempfile::tempdir().unwrap();
        // Missing trace.network: locate fails after extraction succeeded.
        let archive = write_bundle_zip(workdir.path(), "nonet-partial.zip", &WELL_FORMED[..3]);

        let err = process_archive(&archive).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        // The extraction directory was removed along the failure path.
        let leftovers: Vec<_> = std::fs::read_dir(std::env::temp_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("nonet-partial"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_batch_isolates_failures() {
        let workdir = tempfile::tempdir().unwrap();
        let good = write_bundle_zip(workdir.path(), "good.zip", WELL_FORMED);
        let bad = workdir.path().join("bad.zip");
        std::fs::write(&bad, "not an archive").unwrap();

        let outcomes = process_batch(&[good.clone(), bad.clone()]);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].archive, good);
        let run = outcomes[0].result.as_ref().unwrap();
        assert!(run.traces.network_trace.contains("resource-snapshot"));
        cleanup_extracted(&run.extracted_dir);

        assert_eq!(outcomes[1].archive, bad);
        match &outcomes[1].result {
            Err(TriageError::Extraction(ExtractionError::ArchiveUnreadable { .. })) => {}
            other => panic!("expected extraction failure, got {other:?}"),
        }
    }
}
