//! Network-trace normalizer: the HAR-like exchange log.
//!
//! One JSON object per line, each a request/response exchange record with
//! timings, server address, and security details. Entries pass through
//! structurally intact; normalization is parse-validation plus repackaging
//! as a JSON array. Parse failures are fatal.

use super::TraceNormalizer;
use crate::archive::ArtifactSlot;
use crate::utils::error::ParseError;
use serde_json::Value;

/// Normalizer for the network log (`trace.network` slot)
#[derive(Debug, Clone)]
pub struct NetworkTraceNormalizer {
    entries: Vec<Value>,
}

impl NetworkTraceNormalizer {
    /// Exchange records in input line order
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }
}

impl TraceNormalizer for NetworkTraceNormalizer {
    const SLOT: ArtifactSlot = ArtifactSlot::NetworkTrace;

    fn parse(content: &str) -> Result<Self, ParseError> {
        let entries = content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|_| ParseError::InvalidLine {
                    slot: Self::SLOT,
                    line: line.to_string(),
                })
            })
            .collect::<Result<Vec<Value>, _>>()?;

        Ok(Self { entries })
    }

    fn serialize(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(&self.entries)?)
    }
}
