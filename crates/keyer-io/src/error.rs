//! Error types for frame I/O.

use std::io;
use thiserror::Error;

/// Frame I/O error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Unsupported bit depth or color type.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Decoded buffer rejected by the image type.
    #[error("invalid image: {0}")]
    Image(#[from] keyer_core::Error),

    /// Missing required data (empty frame sequence, etc.).
    #[error("missing data: {0}")]
    MissingData(String),

    /// Parse error (glob patterns, frame names).
    #[error("parse error: {0}")]
    Parse(String),

    /// The consumer at the other end of a channel sink went away.
    #[error("frame receiver disconnected")]
    Disconnected,
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
