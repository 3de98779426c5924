//! Color-range mask engine.
//!
//! Builds a [`Mask`] over a region of an HSV image: an element is
//! [`Mask::MATCH`] when its pixel lies inside at least one configured range
//! (inclusive on every channel), [`Mask::NO_MATCH`] otherwise.
//!
//! The mask has the region's dimensions and only the region is scanned.
//! No color conversion happens here; callers pass HSV (see
//! [`crate::color::to_hsv`]).
//!
//! # Example
//!
//! ```rust
//! use keyer_core::{Color, ColorRange, ColorRangeSet, Image, Rect};
//! use keyer_ops::mask::build_mask;
//!
//! let hsv = Image::filled(8, 8, &[30, 200, 200]).unwrap();
//! let ranges: ColorRangeSet = vec![ColorRange::new(
//!     Color::new(20, 100, 100),
//!     Color::new(40, 255, 255),
//! )]
//! .into();
//!
//! let mask = build_mask(&hsv, &ranges, Rect::new(2, 2, 4, 4)).unwrap();
//! assert_eq!(mask.dimensions(), (4, 4));
//! assert!(mask.is_all_set());
//! ```

use keyer_core::{ColorRange, ColorRangeSet, Error, Image, Mask, Rect, Result};
use tracing::trace;

use crate::rows::for_each_row;

/// Builds the union mask of `ranges` over `region` of an HSV image.
///
/// An empty range set yields an all-clear mask.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `image` does not have 3 channels
/// - [`Error::OutOfBounds`] if `region` leaves the image
pub fn build_mask(image: &Image, ranges: &ColorRangeSet, region: Rect) -> Result<Mask> {
    check_input(image, region)?;
    trace!(%region, ranges = ranges.len(), "build_mask");

    if ranges.is_empty() {
        return Ok(Mask::new(region.width, region.height));
    }
    Ok(scan(image, region, |px| ranges.matches(px)))
}

/// Builds the mask of a single range over `region` of an HSV image.
///
/// # Errors
///
/// Same as [`build_mask`].
pub fn in_range(image: &Image, range: &ColorRange, region: Rect) -> Result<Mask> {
    check_input(image, region)?;
    Ok(scan(image, region, |px| range.contains(px)))
}

/// Merges `other` into `mask` (logical OR).
///
/// # Errors
///
/// [`Error::InvalidArgument`] if the mask dimensions differ.
pub fn union_into(mask: &mut Mask, other: &Mask) -> Result<()> {
    mask.union_with(other)
}

fn check_input(image: &Image, region: Rect) -> Result<()> {
    if image.channels() != 3 {
        return Err(Error::unsupported_channels("HSV image", "3", image.channels()));
    }
    image.check_region(region)
}

fn scan<F>(image: &Image, region: Rect, matches: F) -> Mask
where
    F: Fn([u8; 3]) -> bool + Send + Sync,
{
    let mut mask = Mask::new(region.width, region.height);
    for_each_row(mask.data_mut(), region.width as usize, |y, row| {
        let src = image.span(region.y + y as u32, region.x, region.width);
        for (m, px) in row.iter_mut().zip(src.chunks_exact(3)) {
            if matches([px[0], px[1], px[2]]) {
                *m = Mask::MATCH;
            }
        }
    });
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyer_core::Color;

    fn range(lo: [u8; 3], hi: [u8; 3]) -> ColorRange {
        ColorRange::new(Color::from(lo), Color::from(hi))
    }

    fn yellow() -> ColorRange {
        range([20, 100, 100], [40, 255, 255])
    }

    fn green() -> ColorRange {
        range([60, 100, 100], [80, 255, 255])
    }

    /// Left half yellow-ish HSV, right half green-ish HSV.
    fn split_image() -> Image {
        let mut img = Image::filled(8, 4, &[30, 200, 200]).unwrap();
        for y in 0..4 {
            for x in 4..8 {
                img.set_pixel(x, y, &[70, 200, 200]);
            }
        }
        img
    }

    #[test]
    fn test_scenario_all_match() {
        let img = Image::filled(4, 4, &[30, 200, 200]).unwrap();
        let set: ColorRangeSet = vec![yellow()].into();
        let mask = build_mask(&img, &set, img.bounds()).unwrap();
        assert!(mask.is_all_set());
    }

    #[test]
    fn test_scenario_no_match() {
        let img = Image::filled(4, 4, &[30, 200, 200]).unwrap();
        let set: ColorRangeSet = vec![green()].into();
        let mask = build_mask(&img, &set, img.bounds()).unwrap();
        assert!(mask.is_all_clear());
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let img = Image::filled(4, 4, &[30, 200, 200]).unwrap();
        let mask = build_mask(&img, &ColorRangeSet::new(), Rect::new(1, 1, 2, 3)).unwrap();
        assert_eq!(mask.dimensions(), (2, 3));
        assert!(mask.is_all_clear());
    }

    #[test]
    fn test_union_of_ranges() {
        let img = split_image();
        let region = img.bounds();
        let set: ColorRangeSet = vec![yellow(), green()].into();
        let both = build_mask(&img, &set, region).unwrap();
        assert!(both.is_all_set());

        let mut manual = in_range(&img, &yellow(), region).unwrap();
        assert_eq!(manual.count_set(), 16);
        union_into(&mut manual, &in_range(&img, &green(), region).unwrap()).unwrap();
        assert_eq!(manual, both);
    }

    #[test]
    fn test_order_and_duplicates_irrelevant() {
        let img = split_image();
        let region = Rect::new(2, 1, 5, 2);
        let a = build_mask(&img, &vec![yellow(), green()].into(), region).unwrap();
        let b = build_mask(&img, &vec![green(), yellow()].into(), region).unwrap();
        let c = build_mask(&img, &vec![yellow(), yellow()].into(), region).unwrap();
        let d = build_mask(&img, &vec![yellow()].into(), region).unwrap();
        assert_eq!(a, b);
        assert_eq!(c, d);
    }

    #[test]
    fn test_bounds_inclusive() {
        let mut img = Image::new(3, 1, 3).unwrap();
        img.set_pixel(0, 0, &[20, 100, 100]);
        img.set_pixel(1, 0, &[40, 255, 255]);
        img.set_pixel(2, 0, &[19, 100, 100]);
        let mask = in_range(&img, &yellow(), img.bounds()).unwrap();
        assert_eq!(mask.data(), &[255, 255, 0]);
    }

    #[test]
    fn test_region_offsets() {
        let img = split_image();
        let mask = build_mask(&img, &vec![green()].into(), Rect::new(3, 0, 2, 1)).unwrap();
        assert_eq!(mask.data(), &[0, 255]);
    }

    #[test]
    fn test_region_out_of_bounds() {
        let img = Image::new(4, 4, 3).unwrap();
        let set: ColorRangeSet = vec![yellow()].into();
        let err = build_mask(&img, &set, Rect::new(1, 0, 4, 4)).unwrap_err();
        assert!(err.is_out_of_bounds());
        let err = build_mask(&img, &set, Rect::new(u32::MAX, 0, 2, 2)).unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn test_requires_three_channels() {
        let img = Image::new(4, 4, 4).unwrap();
        let err = build_mask(&img, &ColorRangeSet::new(), img.bounds()).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_reversed_range_matches_nothing() {
        let img = Image::filled(2, 2, &[30, 200, 200]).unwrap();
        let reversed = range([40, 255, 255], [20, 100, 100]);
        assert!(in_range(&img, &reversed, img.bounds()).unwrap().is_all_clear());
    }
}
