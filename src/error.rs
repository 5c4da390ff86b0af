//! Typed failures of the untangling core.
//!
//! I/O modules and the tool binaries use `anyhow` instead; this enum covers
//! the precondition violations the pure core can report.

use thiserror::Error;

/// Errors produced by the untangling core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UntangleError {
    /// A transaction violates a precondition of the analysis (empty input
    /// or output list). An untangling that finds nothing is NOT an error;
    /// it returns an empty result instead.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// The partition generator was asked for something it cannot enumerate
    /// (empty element sequence, or a subset-count bound below 1).
    #[error("invalid partition request: {0}")]
    InvalidInput(String),
}
