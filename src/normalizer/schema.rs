//! Normalized output schema definitions.
//!
//! This module defines the structures the normalizers emit and the shape of
//! the serialized bundle handed to downstream analysis. Wire keys follow the
//! source trace format (camelCase, `sha1` for attachment hashes).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A source location within a step-trace entry's stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    pub file: String,

    pub line: u32,

    pub column: u32,

    /// May be empty for anonymous frames, never null
    #[serde(default)]
    pub function: String,
}

/// Reference to a side-channel artifact (screenshot, video, ...).
///
/// Not resolved here; the hash keys the content in the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,

    pub content_type: String,

    #[serde(rename = "sha1")]
    pub content_hash: String,
}

/// Error payload carried by failing step-trace entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub message: String,

    /// Rendered stack trace text
    #[serde(default)]
    pub stack: String,
}

/// One normalized step-trace entry.
///
/// Common fields are copied from the source entry; `duration` is derived
/// when both timestamps are present. The context/session metadata fields
/// are populated only on the session-initialization entry
/// (`type == "context-options"`), and `message` only on the dedicated
/// error-marker entry (`type == "error"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStepEntry {
    /// Absent on entries that carry no type tag; omitted from output then
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,

    /// endTime - startTime, only when both are present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<StackFrame>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,

    // Context/session metadata, present only on the session-initialization entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monotonic_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_language: Option<String>,

    /// Top-level failure message, present only on error-marker entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One call recorded against a source file in the stacks document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceStackCall {
    pub function_name: String,
    pub line: u32,
    pub column: u32,
}

/// All calls recorded against one source file, in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStackFile {
    pub file_path: String,
    pub calls: Vec<TraceStackCall>,
}

/// The four normalizer outputs serialized to text, keyed by the same
/// logical slot names as the raw artifact set. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBundle {
    /// JSON array of normalized step entries
    pub step_trace: String,
    /// JSON array of flattened raw-trace records
    pub raw_trace: String,
    /// Human-readable per-file call blocks
    pub call_stacks: String,
    /// JSON array of network exchange records
    pub network_trace: String,
}
