//! Masked compositing.
//!
//! Unlike alpha blending, the mask here is binary: a destination pixel is
//! either replaced by the overlay pixel or left untouched.
//!
//! ```text
//! dst[at + p] = mask[p] ? src[p] : dst[at + p]     for p in region
//! ```
//!
//! # Example
//!
//! ```rust
//! use keyer_core::{Image, Mask, Rect};
//! use keyer_ops::composite::copy_masked;
//!
//! let mut frame = Image::filled(4, 4, &[0, 0, 0]).unwrap();
//! let overlay = Image::filled(2, 2, &[9, 9, 9]).unwrap();
//! let mut mask = Mask::new(2, 2);
//! mask.set(1, 1, true);
//!
//! copy_masked(&mut frame, &overlay, &mask, Rect::new(1, 1, 2, 2)).unwrap();
//! assert_eq!(frame.pixel(2, 2), &[9, 9, 9]);
//! assert_eq!(frame.pixel(1, 1), &[0, 0, 0]);
//! ```

use keyer_core::{Error, Image, Mask, Rect, Result};
use tracing::trace;

/// Copies `src` into `dst` at region `at` wherever `mask` is set.
///
/// `src` and `mask` must both have the dimensions of `at`, and `src` the same
/// channel count as `dst`. Nothing is written when a check fails.
///
/// # Errors
///
/// - [`Error::OutOfBounds`] if `at` leaves `dst`
/// - [`Error::InvalidArgument`] on a size or channel mismatch
pub fn copy_masked(dst: &mut Image, src: &Image, mask: &Mask, at: Rect) -> Result<()> {
    dst.check_region(at)?;
    if src.dimensions() != at.size() {
        return Err(Error::dimension_mismatch("overlay vs region", src.dimensions(), at.size()));
    }
    if mask.dimensions() != at.size() {
        return Err(Error::dimension_mismatch("mask vs region", mask.dimensions(), at.size()));
    }
    if src.channels() != dst.channels() {
        return Err(Error::invalid_argument(format!(
            "overlay has {} channels, destination has {}",
            src.channels(),
            dst.channels()
        )));
    }
    trace!(%at, selected = mask.count_set(), "copy_masked");

    let channels = dst.channels();
    for y in 0..at.height {
        let mask_row = mask.row(y);
        let src_row = src.row(y);
        let dst_row = dst.span_mut(at.y + y, at.x, at.width);
        for ((d, s), &m) in dst_row
            .chunks_exact_mut(channels)
            .zip(src_row.chunks_exact(channels))
            .zip(mask_row)
        {
            if m == Mask::MATCH {
                d.copy_from_slice(s);
            }
        }
    }
    Ok(())
}
