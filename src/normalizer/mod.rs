//! Trace normalization: per-format normalizers and the facade that
//! assembles one normalized bundle per artifact set.
//!
//! The four normalizers share a capability contract (consume raw text,
//! expose a normalized structure, serialize to transport text) but nothing
//! else; each owns the parsing and cleanup rules of exactly one artifact
//! format.

pub mod call_stacks;
pub mod network;
pub mod raw_trace;
pub mod schema;
pub mod step_trace;

// Re-export main types
pub use call_stacks::CallStackNormalizer;
pub use network::NetworkTraceNormalizer;
pub use raw_trace::RawTraceNormalizer;
pub use schema::{
    Attachment, ErrorDetails, NormalizedBundle, NormalizedStackFile, NormalizedStepEntry,
    StackFrame, TraceStackCall,
};
pub use step_trace::StepTraceNormalizer;

use crate::archive::{ArtifactSlot, RawArtifactSet};
use crate::utils::error::ParseError;
use log::debug;

/// Shared contract of the four per-format normalizers.
///
/// Purely synchronous and CPU-bound; a normalizer never best-efforts a
/// partial result - malformed input fails the whole artifact.
pub trait TraceNormalizer: Sized {
    /// Slot this normalizer owns, used in error reporting
    const SLOT: ArtifactSlot;

    /// Parse raw artifact text into the normalized structure
    fn parse(content: &str) -> Result<Self, ParseError>;

    /// Serialize the normalized structure to transport text
    fn serialize(&self) -> Result<String, ParseError>;
}

/// Normalize one complete artifact set into a bundle
///
/// **Public** - the facade over all four normalizers. They do not interact,
/// so invocation order is irrelevant; the first failure propagates and no
/// partial bundle is ever returned.
pub fn normalize_artifacts(set: RawArtifactSet) -> Result<NormalizedBundle, ParseError> {
    let step_trace = StepTraceNormalizer::parse(&set.step_trace)?.serialize()?;
    let raw_trace = RawTraceNormalizer::parse(&set.raw_trace)?.serialize()?;
    let call_stacks = CallStackNormalizer::parse(&set.call_stacks)?.serialize()?;
    let network_trace = NetworkTraceNormalizer::parse(&set.network_trace)?.serialize()?;

    debug!(
        "Normalized bundle sizes: step={}B raw={}B stacks={}B network={}B",
        step_trace.len(),
        raw_trace.len(),
        call_stacks.len(),
        network_trace.len()
    );

    Ok(NormalizedBundle {
        step_trace,
        raw_trace,
        call_stacks,
        network_trace,
    })
}
