//! Error types and result utilities for buffer editing operations.

use thiserror::Error;

/// Convenience type alias for results that may contain AudioEditError
pub type AudioEditResult<T> = Result<T, AudioEditError>;

/// Error types that can occur during buffer editing operations.
///
/// Every operation validates shapes and ranges before touching storage, so a
/// returned error always leaves the buffer in its pre-call state.
#[derive(Error, Debug)]
pub enum AudioEditError {
    /// Error that occurs when a destination container is incompatible with the
    /// requested or actual data shape.
    ///
    /// This typically happens when a flat destination is asked to hold
    /// multi-channel planar output without an interleaved format, or when the
    /// destination is shorter than the produced data.
    #[error("Shape mismatch error: {0}")]
    ShapeMismatch(String),

    /// Error that occurs when a channel index refers to a channel that does
    /// not exist.
    #[error("Out of range error: {0}")]
    OutOfRange(String),

    /// Error that occurs when invalid parameters are provided to an operation.
    ///
    /// This includes cases like negative target lengths, zero channel counts,
    /// or a write starting before the first sample.
    #[error("Invalid parameter error: {0}")]
    InvalidParameter(String),

    /// Error that occurs when an external representation cannot be
    /// interpreted by the format adapter.
    #[error("Unsupported source error: {0}")]
    UnsupportedSource(String),
}
