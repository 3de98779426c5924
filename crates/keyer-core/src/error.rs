//! Error types for keyer-core operations.
//!
//! The keying pipeline distinguishes two failure categories:
//!
//! - [`Error::InvalidArgument`] - a caller contract was broken: wrong channel
//!   count, a buffer whose length does not match its dimensions, a region whose
//!   size does not match the overlay's working resolution.
//! - [`Error::OutOfBounds`] - a region lies partially or fully outside the
//!   image it is applied to.
//!
//! An empty color range configuration is deliberately *not* an error; the
//! pipeline treats it as a no-op.
//!
//! # Usage
//!
//! ```rust
//! use keyer_core::{Error, Rect, Result};
//!
//! fn check(region: Rect, width: u32, height: u32) -> Result<()> {
//!     if !region.fits_within(width, height) {
//!         return Err(Error::out_of_bounds(region, width, height));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(Rect::new(0, 0, 4, 4), 8, 8).is_ok());
//! assert!(check(Rect::new(6, 6, 4, 4), 8, 8).unwrap_err().is_out_of_bounds());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use crate::Rect;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by image buffers, the mask engine and the compositing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A caller-supplied argument violates the operation's contract.
    ///
    /// Covers channel counts other than the accepted ones, dimension
    /// mismatches between buffers, and malformed buffers.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Region of interest extends beyond image bounds.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    OutOfBounds {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error for `region` against an image of
    /// `width` x `height`.
    #[inline]
    pub fn out_of_bounds(region: Rect, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            rx: region.x,
            ry: region.y,
            rw: region.width,
            rh: region.height,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidArgument`] error.
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an [`Error::InvalidArgument`] error for an unsupported channel count.
    ///
    /// `expected` describes the accepted counts, e.g. `"3 or 4"`.
    #[inline]
    pub fn unsupported_channels(what: &str, expected: &str, got: usize) -> Self {
        Self::InvalidArgument(format!(
            "{what} must have {expected} channels, got {got}"
        ))
    }

    /// Creates an [`Error::InvalidArgument`] error for mismatched dimensions.
    #[inline]
    pub fn dimension_mismatch(what: &str, a: (u32, u32), b: (u32, u32)) -> Self {
        Self::InvalidArgument(format!(
            "{what}: dimension mismatch {}x{} vs {}x{}",
            a.0, a.1, b.0, b.1
        ))
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this is a contract violation by the caller.
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(Rect::new(100, 50, 10, 10), 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
        assert!(msg.contains("80x60"));
        assert!(err.is_out_of_bounds());
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_unsupported_channels() {
        let err = Error::unsupported_channels("frame", "3 or 4", 2);
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch("overlay", (320, 640), (100, 100));
        let msg = err.to_string();
        assert!(msg.contains("320x640"));
        assert!(msg.contains("100x100"));
    }
}
