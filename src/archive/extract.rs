//! Archive extraction to temporary directories.
//!
//! Unpacks a trace zip into a fresh, uniquely named directory under the
//! system temp dir. Extraction success only guarantees the container was
//! well-formed; artifact contents are validated later by the normalizers.

use crate::utils::error::ExtractionError;
use log::{debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extract an archive into a fresh temporary directory
///
/// **Public** - first stage of the per-archive pipeline
///
/// The directory name is derived from the archive's file stem plus a random
/// suffix, so concurrent extractions never collide. Entries overwrite on
/// name collision within the directory.
///
/// On success the directory is persisted and its path returned; retention
/// is owned by the caller. On failure the partially populated directory is
/// removed before the error is returned, so the caller never holds a
/// half-populated path.
///
/// # Errors
/// * `ExtractionError::ArchiveUnopenable` - archive file cannot be opened
/// * `ExtractionError::ArchiveUnreadable` - not a well-formed zip container
/// * `ExtractionError::TempDirFailed` - temp directory allocation failed
pub fn extract_to_temp(archive_path: &Path) -> Result<PathBuf, ExtractionError> {
    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("trace-bundle");

    // Dropping `dir` removes it, so every early return below cleans up.
    let dir = tempfile::Builder::new().prefix(stem).tempdir()?;

    debug!(
        "Extracting {} into {}",
        archive_path.display(),
        dir.path().display()
    );

    let file = File::open(archive_path).map_err(|source| ExtractionError::ArchiveUnopenable {
        path: archive_path.to_path_buf(),
        source,
    })?;

    let mut archive =
        ZipArchive::new(file).map_err(|source| ExtractionError::ArchiveUnreadable {
            path: archive_path.to_path_buf(),
            source,
        })?;

    archive
        .extract(dir.path())
        .map_err(|source| ExtractionError::ArchiveUnreadable {
            path: archive_path.to_path_buf(),
            source,
        })?;

    info!(
        "Extracted {} entries from {}",
        archive.len(),
        archive_path.display()
    );

    Ok(dir.keep())
}

/// Best-effort removal of an extracted directory
///
/// **Public** - called by the batch layer once a run's output is written.
/// Failure to remove is logged, never propagated.
pub fn cleanup_extracted(dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        log::warn!("Could not remove extracted directory {}: {}", dir.display(), e);
    }
}
