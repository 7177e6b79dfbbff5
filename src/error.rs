//! Error types for the TNT-to-FedEx conversion pipeline.
//!
//! Two layers, converted automatically via `From` so `?` works across
//! boundaries:
//!
//! - [`InputError`] - reading and decoding the input file
//! - [`PipelineError`] - top-level conversion errors
//!
//! Note that a malformed embedded JSON payload is *not* an error: the parser
//! degrades that record to an empty attribute map and the run continues.
//! Errors here are the fatal kind (I/O, undecodable input).

use thiserror::Error;

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading or decoding the input file.
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to read the input.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Input bytes could not be decoded as text.
    #[error("failed to decode input as {0}")]
    Encoding(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the main error type returned by
/// [`crate::transform::pipeline::convert_file`] and friends.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input error.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Failed to write the output CSV.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
