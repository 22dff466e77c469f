//! Raw-trace normalizer: the low-level call/event log.
//!
//! Each line is one JSON object carrying nested `options`, `params`,
//! `result`, and `snapshot` payloads. Normalization flattens every entry by
//! shallow overlay merge so downstream analysis sees one flat record per
//! event. The overlay order is an explicit configuration table, not hidden
//! control flow; later sources overwrite earlier ones.
//!
//! Parse policy is strict, matching the step normalizer: any non-empty line
//! that is not a JSON object aborts normalization. No entries are dropped.

use super::TraceNormalizer;
use crate::archive::ArtifactSlot;
use crate::utils::config::RAW_TRACE_OVERLAY_KEYS;
use crate::utils::error::ParseError;
use serde_json::{Map, Value};

/// Normalizer for the raw event trace (`trace.trace` slot)
#[derive(Debug, Clone)]
pub struct RawTraceNormalizer {
    entries: Vec<Map<String, Value>>,
}

impl RawTraceNormalizer {
    /// Flattened records, one per input line, input order
    pub fn entries(&self) -> &[Map<String, Value>] {
        &self.entries
    }
}

impl TraceNormalizer for RawTraceNormalizer {
    const SLOT: ArtifactSlot = ArtifactSlot::RawTrace;

    fn parse(content: &str) -> Result<Self, ParseError> {
        let mut entries = Vec::new();

        for line in content.split('\n') {
            if line.trim().is_empty() {
                continue;
            }
            let invalid = || ParseError::InvalidLine {
                slot: Self::SLOT,
                line: line.to_string(),
            };
            let value: Value = serde_json::from_str(line).map_err(|_| invalid())?;
            let Value::Object(own) = value else {
                // One JSON object per line; scalars and arrays violate the encoding.
                return Err(invalid());
            };
            entries.push(flatten(own));
        }

        Ok(Self { entries })
    }

    fn serialize(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(&self.entries)?)
    }
}

/// Shallow overlay merge of one entry.
///
/// Own fields first, then each overlay sub-object in table order, each
/// overwriting same-named keys from everything before it. Only the listed
/// sub-objects are spread; nested objects below them stay intact.
fn flatten(own: Map<String, Value>) -> Map<String, Value> {
    let mut flat = own.clone();
    for key in RAW_TRACE_OVERLAY_KEYS {
        if let Some(Value::Object(overlay)) = own.get(*key) {
            for (k, v) in overlay {
                flat.insert(k.clone(), v.clone());
            }
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_yields_empty_array() {
        let normalizer = RawTraceNormalizer::parse("").unwrap();
        assert!(normalizer.entries().is_empty());
        assert_eq!(normalizer.serialize().unwrap(), "[]");
    }

    #[test]
    fn test_no_entries_are_dropped() {
        let content = concat!(
            "{\"type\":\"before\",\"callId\":\"call@1\"}\n",
            "{\"type\":\"log\",\"callId\":\"call@1\"}\n",
            "{\"type\":\"after\",\"callId\":\"call@1\"}\n",
        );
        let normalizer = RawTraceNormalizer::parse(content).unwrap();
        assert_eq!(normalizer.entries().len(), 3);
    }

    #[test]
    fn test_nested_payloads_are_flattened() {
        let content =
            "{\"type\":\"before\",\"params\":{\"selector\":\"#submit\"},\"result\":{\"received\":\"hidden\"}}";
        let normalizer = RawTraceNormalizer::parse(content).unwrap();
        let entry = &normalizer.entries()[0];
        assert_eq!(entry["type"], "before");
        assert_eq!(entry["selector"], "#submit");
        assert_eq!(entry["received"], "hidden");
    }

    #[test]
    fn test_merge_precedence_snapshot_wins() {
        let content = concat!(
            "{\"status\":\"own\",",
            "\"options\":{\"status\":\"options\"},",
            "\"params\":{\"status\":\"params\"},",
            "\"result\":{\"status\":\"result\"},",
            "\"snapshot\":{\"status\":\"snapshot\"}}"
        );
        let normalizer = RawTraceNormalizer::parse(content).unwrap();
        assert_eq!(normalizer.entries()[0]["status"], "snapshot");
    }

    #[test]
    fn test_merge_precedence_without_higher_sources() {
        let content = "{\"status\":\"own\",\"options\":{\"status\":\"options\"},\"params\":{\"status\":\"params\"}}";
        let normalizer = RawTraceNormalizer::parse(content).unwrap();
        assert_eq!(normalizer.entries()[0]["status"], "params");
    }

    #[test]
    fn test_merge_is_shallow() {
        let content = "{\"params\":{\"info\":{\"nested\":{\"deep\":1}}}}";
        let normalizer = RawTraceNormalizer::parse(content).unwrap();
        let entry = &normalizer.entries()[0];
        // One level of spreading only; the nested object arrives intact.
        assert_eq!(entry["info"]["nested"]["deep"], 1);
    }

    #[test]
    fn test_non_object_overlay_contributes_nothing() {
        let content = "{\"type\":\"event\",\"result\":42}";
        let normalizer = RawTraceNormalizer::parse(content).unwrap();
        let entry = &normalizer.entries()[0];
        assert_eq!(entry["result"], 42);
        assert_eq!(entry.len(), 2);
    }

    #[test]
    fn test_unparsable_line_is_fatal() {
        let content = "{\"type\":\"before\"}\nnot-json";
        let err = RawTraceNormalizer::parse(content).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidLine {
                slot: ArtifactSlot::RawTrace,
                ..
            }
        ));
    }

    #[test]
    fn test_non_object_line_is_fatal() {
        let err = RawTraceNormalizer::parse("[1,2,3]").unwrap_err();
        assert!(matches!(err, ParseError::InvalidLine { .. }));
    }
}
