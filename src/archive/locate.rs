//! Trace artifact discovery and classification.
//!
//! An extracted directory must contain exactly one file for each of the
//! four artifact slots. Discovery keys off a marker substring in the file
//! name; classification keys off fixed filename suffixes. Partial bundles
//! are rejected outright - a bundle missing an artifact looks complete
//! downstream and silently misleads analysis.

use crate::utils::config::TRACE_MARKER;
use crate::utils::error::{ParseError, TriageError, ValidationError};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Logical slot for one of the four trace artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactSlot {
    /// High-level driver call log (`*test.trace`)
    StepTrace,
    /// Low-level call/event log with nested payloads (`*trace.trace`)
    RawTrace,
    /// Compact file/stack-frame index document (`*trace.stacks`)
    CallStacks,
    /// HAR-like network exchange log (`*trace.network`)
    NetworkTrace,
}

impl ArtifactSlot {
    pub const ALL: [ArtifactSlot; 4] = [
        ArtifactSlot::StepTrace,
        ArtifactSlot::RawTrace,
        ArtifactSlot::CallStacks,
        ArtifactSlot::NetworkTrace,
    ];

    /// Filename suffix that classifies a file into this slot
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactSlot::StepTrace => "test.trace",
            ArtifactSlot::RawTrace => "trace.trace",
            ArtifactSlot::CallStacks => "trace.stacks",
            ArtifactSlot::NetworkTrace => "trace.network",
        }
    }

    /// Classify a file name by suffix. First match in `ALL` order wins;
    /// the four suffixes are mutually exclusive in practice.
    pub fn classify(file_name: &str) -> Option<ArtifactSlot> {
        Self::ALL
            .iter()
            .copied()
            .find(|slot| file_name.ends_with(slot.suffix()))
    }
}

impl fmt::Display for ArtifactSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// The four raw artifact texts of one extracted trace bundle.
///
/// Immutable once read; handed by value to the normalization facade.
#[derive(Debug, Clone)]
pub struct RawArtifactSet {
    pub step_trace: String,
    pub raw_trace: String,
    pub call_stacks: String,
    pub network_trace: String,
}

/// Locate and read the four trace artifacts in an extracted directory
///
/// **Public** - second stage of the per-archive pipeline
///
/// # Errors
/// * `ValidationError::NoTraceFiles` - no trace-marked files at all
/// * `ValidationError::AmbiguousArtifact` - two files map to one slot
/// * `ParseError::MissingArtifact` - a required slot has no file
pub fn locate_artifacts(dir: &Path) -> Result<RawArtifactSet, TriageError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ValidationError::Precondition(format!("cannot list directory {}: {}", dir.display(), e))
    })?;

    let mut marked: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.contains(TRACE_MARKER))
        .collect();

    if marked.is_empty() {
        return Err(ValidationError::NoTraceFiles(dir.to_path_buf()).into());
    }

    // Deterministic classification order regardless of readdir order.
    marked.sort();

    let mut classified: HashMap<ArtifactSlot, String> = HashMap::new();
    for name in marked {
        let Some(slot) = ArtifactSlot::classify(&name) else {
            debug!("Ignoring unrecognized trace-marked file: {}", name);
            continue;
        };
        if let Some(existing) = classified.get(&slot) {
            return Err(ValidationError::AmbiguousArtifact {
                slot,
                folder: dir.to_path_buf(),
                first: existing.clone(),
                second: name,
            }
            .into());
        }
        classified.insert(slot, name);
    }

    let read_slot = |slot: ArtifactSlot| -> Result<String, TriageError> {
        let name = classified.get(&slot).ok_or(ParseError::MissingArtifact {
            slot,
            folder: dir.to_path_buf(),
        })?;
        fs::read_to_string(dir.join(name))
            .map_err(|source| ParseError::UnreadableArtifact { slot, source }.into())
    };

    Ok(RawArtifactSet {
        step_trace: read_slot(ArtifactSlot::StepTrace)?,
        raw_trace: read_slot(ArtifactSlot::RawTrace)?,
        call_stacks: read_slot(ArtifactSlot::CallStacks)?,
        network_trace: read_slot(ArtifactSlot::NetworkTrace)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(dir: &Path, files: &[(&str, &str)]) {
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    const COMPLETE: &[(&str, &str)] = &[
        ("test.trace", "{\"type\":\"expect\"}"),
        ("trace.trace", "{\"type\":\"before\"}"),
        ("trace.stacks", "{\"files\":[],\"stacks\":[]}"),
        ("trace.network", "{\"type\":\"resource-snapshot\"}"),
    ];

    #[test]
    fn test_locates_complete_bundle() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), COMPLETE);

        let set = locate_artifacts(dir.path()).unwrap();
        assert_eq!(set.step_trace, "{\"type\":\"expect\"}");
        assert_eq!(set.raw_trace, "{\"type\":\"before\"}");
        assert_eq!(set.call_stacks, "{\"files\":[],\"stacks\":[]}");
        assert_eq!(set.network_trace, "{\"type\":\"resource-snapshot\"}");
    }

    #[test]
    fn test_prefixed_artifact_names_classify() {
        let dir = tempfile::tempdir().unwrap();
        populate(
            dir.path(),
            &[
                ("abc123-test.trace", "s"),
                ("abc123-trace.trace", "r"),
                ("abc123-trace.stacks", "{}"),
                ("abc123-trace.network", "n"),
            ],
        );

        let set = locate_artifacts(dir.path()).unwrap();
        assert_eq!(set.step_trace, "s");
        assert_eq!(set.network_trace, "n");
    }

    #[test]
    fn test_empty_directory_is_not_a_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_artifacts(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            TriageError::Validation(ValidationError::NoTraceFiles(_))
        ));
    }

    #[test]
    fn test_unmarked_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &[("screenshot.png", "png"), ("notes.txt", "x")]);

        let err = locate_artifacts(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            TriageError::Validation(ValidationError::NoTraceFiles(_))
        ));
    }

    #[test]
    fn test_missing_slot_names_the_slot() {
        let dir = tempfile::tempdir().unwrap();
        // Everything but the network log.
        populate(dir.path(), &COMPLETE[..3]);

        let err = locate_artifacts(dir.path()).unwrap_err();
        match err {
            TriageError::Parse(ParseError::MissingArtifact { slot, .. }) => {
                assert_eq!(slot, ArtifactSlot::NetworkTrace);
            }
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
    }

    #[test]
    fn test_ambiguous_slot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), COMPLETE);
        populate(dir.path(), &[("retry1-test.trace", "dup")]);

        let err = locate_artifacts(dir.path()).unwrap_err();
        match err {
            TriageError::Validation(ValidationError::AmbiguousArtifact { slot, .. }) => {
                assert_eq!(slot, ArtifactSlot::StepTrace);
            }
            other => panic!("expected AmbiguousArtifact, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_suffixes() {
        assert_eq!(
            ArtifactSlot::classify("7a9f-test.trace"),
            Some(ArtifactSlot::StepTrace)
        );
        assert_eq!(
            ArtifactSlot::classify("trace.trace"),
            Some(ArtifactSlot::RawTrace)
        );
        assert_eq!(
            ArtifactSlot::classify("trace.stacks"),
            Some(ArtifactSlot::CallStacks)
        );
        assert_eq!(
            ArtifactSlot::classify("trace.network"),
            Some(ArtifactSlot::NetworkTrace)
        );
        assert_eq!(ArtifactSlot::classify("trace.mp4"), None);
    }
}
