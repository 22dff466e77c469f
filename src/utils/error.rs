//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::archive::ArtifactSlot;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while unpacking a trace archive
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to unzip \"{}\": {source}", path.display())]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Cannot open archive \"{}\": {source}", path.display())]
    ArchiveUnopenable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create extraction directory: {0}")]
    TempDirFailed(#[from] std::io::Error),
}

/// Errors for inputs that violate a structural precondition
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: no trace files found in {}", .0.display())]
    NoTraceFiles(PathBuf),

    #[error("Invalid input: multiple files match the {slot} slot in {} ({first} and {second})", folder.display())]
    AmbiguousArtifact {
        slot: ArtifactSlot,
        folder: PathBuf,
        first: String,
        second: String,
    },

    #[error("Invalid input: {0}")]
    Precondition(String),
}

/// Errors for artifact content that violates its expected encoding
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error: missing {slot} in {}", folder.display())]
    MissingArtifact { slot: ArtifactSlot, folder: PathBuf },

    #[error("Parse error: invalid line in {slot}: {line}")]
    InvalidLine { slot: ArtifactSlot, line: String },

    #[error("Parse error: invalid {slot} data: {reason}")]
    InvalidDocument { slot: ArtifactSlot, reason: String },

    #[error("JSON serialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Cannot read {slot}: {source}")]
    UnreadableArtifact {
        slot: ArtifactSlot,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during bundle output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Umbrella error for one archive's pipeline run.
///
/// Each kind maps to a distinct process exit code so the CLI can report
/// which stage rejected the archive.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl TriageError {
    /// Exit code carried by this error kind (generic failures use 1)
    pub fn exit_code(&self) -> i32 {
        match self {
            TriageError::Parse(_) => 2,
            TriageError::Validation(_) => 3,
            TriageError::Extraction(_) => 4,
        }
    }
}
