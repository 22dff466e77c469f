//! Call-stack normalizer: the compact file/stack-frame index document.
//!
//! The source format trades readability for size: file paths are stored
//! once in a lookup table and stack frames are positional tuples of
//! `[fileIndex, line, column, functionName]`. Decoding is an explicit
//! two-pass transform: accumulate a fileIndex -> calls mapping in document
//! order, then resolve each index to a display structure. A dangling file
//! index degrades to a placeholder label, never a panic.

use super::schema::{NormalizedStackFile, TraceStackCall};
use super::TraceNormalizer;
use crate::archive::ArtifactSlot;
use crate::utils::config::ANONYMOUS_FUNCTION;
use crate::utils::error::ParseError;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;

/// Raw stacks document shape
#[derive(Debug, Deserialize)]
struct RawStacksDoc {
    files: Vec<String>,
    stacks: Vec<RawStack>,
}

/// `[stackId, frames]` pair; the id is not used by normalization
#[derive(Debug, Deserialize)]
struct RawStack(IgnoredAny, Vec<FrameTuple>);

/// `[fileIndex, line, column, functionName]`
#[derive(Debug, Deserialize)]
struct FrameTuple(usize, u32, u32, String);

/// Normalizer for the stacks document (`trace.stacks` slot)
#[derive(Debug, Clone)]
pub struct CallStackNormalizer {
    files: Vec<NormalizedStackFile>,
}

impl CallStackNormalizer {
    /// Per-file call groups, in first-seen order of file index
    pub fn files(&self) -> &[NormalizedStackFile] {
        &self.files
    }

    /// Render one file's calls as a readable block
    pub fn format_file(file: &NormalizedStackFile) -> String {
        let header = format!("File: {}", file.file_path);
        let calls = file
            .calls
            .iter()
            .map(|call| {
                format!(
                    "  {} (line {}, col {})",
                    call.function_name, call.line, call.column
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{header}\n{calls}")
    }
}

impl TraceNormalizer for CallStackNormalizer {
    const SLOT: ArtifactSlot = ArtifactSlot::CallStacks;

    fn parse(content: &str) -> Result<Self, ParseError> {
        let doc: RawStacksDoc =
            serde_json::from_str(content).map_err(|e| ParseError::InvalidDocument {
                slot: Self::SLOT,
                reason: e.to_string(),
            })?;

        // Pass 1: group frame tuples by file index, preserving both the
        // first-seen order of indices and the document order of calls.
        let mut first_seen: Vec<usize> = Vec::new();
        let mut calls_by_file: HashMap<usize, Vec<TraceStackCall>> = HashMap::new();

        for RawStack(_, frames) in doc.stacks {
            for FrameTuple(file_index, line, column, function_name) in frames {
                let calls = calls_by_file.entry(file_index).or_insert_with(|| {
                    first_seen.push(file_index);
                    Vec::new()
                });
                calls.push(TraceStackCall {
                    function_name: if function_name.is_empty() {
                        ANONYMOUS_FUNCTION.to_string()
                    } else {
                        function_name
                    },
                    line,
                    column,
                });
            }
        }

        // Pass 2: resolve indices against the lookup table.
        let files = first_seen
            .into_iter()
            .map(|index| NormalizedStackFile {
                file_path: doc
                    .files
                    .get(index)
                    .filter(|path| !path.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("<unknown file at index {index}>")),
                calls: calls_by_file.remove(&index).unwrap_or_default(),
            })
            .collect();

        Ok(Self { files })
    }

    fn serialize(&self) -> Result<String, ParseError> {
        Ok(self
            .files
            .iter()
            .map(Self::format_file)
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
