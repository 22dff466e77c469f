//! Command implementations for the CLI.

pub mod normalize;

pub use normalize::{execute_normalize, validate_args, BatchSummary, NormalizeArgs};
