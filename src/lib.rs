//! Trace Triage
//!
//! Extraction and normalization of Playwright trace bundles from failed
//! browser-automation test runs. A trace zip carries four artifacts in four
//! different encodings; this crate unpacks the archive, locates the
//! artifacts, normalizes each into a compact canonical form, and assembles
//! one serialized bundle per archive for downstream automated analysis.
//!
//! Most users should use the CLI:
//!
//! ```bash
//! trace-triage normalize --out-dir reports failed-run.zip
//! ```

pub mod archive;
pub mod commands;
pub mod normalizer;
pub mod output;
pub mod pipeline;
pub mod utils;
