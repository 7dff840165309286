//! Errors raised by the encoding primitives.

use thiserror::Error;

/// Errors that can occur while encoding pixels or handling data URIs.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying codec failed
    #[error("{format} encoding failed: {reason}")]
    EncodingFailed {
        format: &'static str,
        reason: String,
    },

    /// A string that should be a data URI isn't one
    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),
}
