//! Archive handling: unpacking trace zips and locating the artifacts inside.
//!
//! This module handles:
//! - Extracting a trace archive to a fresh temporary directory
//! - Discovering and classifying the four trace artifacts
//! - Reading the raw artifact text for the normalizers

pub mod extract;
pub mod locate;

pub use extract::{cleanup_extracted, extract_to_temp};
pub use locate::{locate_artifacts, ArtifactSlot, RawArtifactSet};
