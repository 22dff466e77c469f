//! Step-trace normalizer: the high-level driver call log.
//!
//! The step trace is line-delimited JSON, one driver call per line. This is
//! the primary fault-localization signal, so parsing is strict: any
//! unparsable non-empty line aborts the whole normalization. Entries whose
//! `apiName` identifies internal driver bookkeeping are dropped entirely.

use super::schema::{Attachment, ErrorDetails, NormalizedStepEntry, StackFrame};
use super::TraceNormalizer;
use crate::archive::ArtifactSlot;
use crate::utils::config::noise_patterns;
use crate::utils::error::ParseError;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw step-trace entry as found on the wire.
///
/// Only the fields the projection cares about are modeled; anything else on
/// the line is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStepEntry {
    #[serde(rename = "type")]
    entry_type: Option<String>,
    call_id: Option<String>,
    parent_id: Option<String>,
    start_time: Option<f64>,
    end_time: Option<f64>,
    api_name: Option<String>,
    params: Option<Map<String, Value>>,
    stack: Option<Vec<StackFrame>>,
    attachments: Option<Vec<Attachment>>,
    error: Option<ErrorDetails>,
    message: Option<String>,
    // Session metadata, only meaningful on the context-options entry
    version: Option<i64>,
    origin: Option<String>,
    browser_name: Option<String>,
    options: Option<Value>,
    platform: Option<String>,
    wall_time: Option<f64>,
    monotonic_time: Option<f64>,
    sdk_language: Option<String>,
}

impl RawStepEntry {
    /// Internal driver bookkeeping carries no signal for failure analysis.
    /// Entries without an apiName are never noise.
    fn is_noise(&self) -> bool {
        match &self.api_name {
            Some(name) => noise_patterns().is_match(name),
            None => false,
        }
    }
}

/// Normalizer for the step trace (`test.trace` slot)
#[derive(Debug, Clone)]
pub struct StepTraceNormalizer {
    entries: Vec<NormalizedStepEntry>,
}

impl StepTraceNormalizer {
    /// Normalized entries, input order minus dropped noise
    pub fn entries(&self) -> &[NormalizedStepEntry] {
        &self.entries
    }
}

impl TraceNormalizer for StepTraceNormalizer {
    const SLOT: ArtifactSlot = ArtifactSlot::StepTrace;

    fn parse(content: &str) -> Result<Self, ParseError> {
        let mut entries = Vec::new();
        let mut dropped = 0usize;

        for line in content.trim().split('\n') {
            if line.is_empty() {
                continue;
            }
            let raw: RawStepEntry =
                serde_json::from_str(line).map_err(|_| ParseError::InvalidLine {
                    slot: Self::SLOT,
                    line: line.to_string(),
                })?;
            if raw.is_noise() {
                dropped += 1;
                continue;
            }
            entries.push(project(raw));
        }

        debug!(
            "Step trace: kept {} entries, dropped {} noise entries",
            entries.len(),
            dropped
        );

        Ok(Self { entries })
    }

    fn serialize(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(&self.entries)?)
    }
}

/// Project a raw entry into its normalized form
fn project(entry: RawStepEntry) -> NormalizedStepEntry {
    let duration = match (entry.start_time, entry.end_time) {
        (Some(start), Some(end)) => Some(end - start),
        _ => None,
    };

    let is_session_init = entry.entry_type.as_deref() == Some("context-options");
    let is_error_marker = entry.entry_type.as_deref() == Some("error");

    NormalizedStepEntry {
        entry_type: entry.entry_type,
        call_id: entry.call_id,
        parent_id: entry.parent_id,
        start_time: entry.start_time,
        end_time: entry.end_time,
        duration,
        api_name: entry.api_name,
        params: entry.params,
        stack: entry.stack,
        attachments: entry.attachments,
        error: entry.error,
        version: entry.version.filter(|_| is_session_init),
        origin: entry.origin.filter(|_| is_session_init),
        browser_name: entry.browser_name.filter(|_| is_session_init),
        options: entry.options.filter(|_| is_session_init),
        platform: entry.platform.filter(|_| is_session_init),
        wall_time: entry.wall_time.filter(|_| is_session_init),
        monotonic_time: entry.monotonic_time.filter(|_| is_session_init),
        sdk_language: entry.sdk_language.filter(|_| is_session_init),
        message: entry.message.filter(|_| is_error_marker),
    }
}
