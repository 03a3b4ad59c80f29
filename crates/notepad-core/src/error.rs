//! Error types shared by the document core.

use thiserror::Error;

/// Errors produced by buffer, history and document operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A position or range lies outside the current buffer bounds, or `start > end`.
    #[error("range {start}..{end} is out of bounds for a buffer of {len} characters")]
    OutOfRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Buffer length in characters at the time of the call.
        len: usize,
    },
    /// Find or replace was invoked with an empty needle. Nothing was changed.
    #[error("search pattern is empty")]
    EmptyPattern,
    /// A mutation was attempted while another mutation (or its notification) was in flight.
    #[error("document is already being mutated")]
    Reentrancy,
}
