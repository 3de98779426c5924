//! Rectangle type used as the region of interest for keying.
//!
//! # Coordinate System
//!
//! All coordinates use the standard image convention:
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Region  │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use keyer_core::Rect;
//!
//! let roi = Rect::new(10, 20, 100, 50);
//! assert!(roi.contains(15, 25));
//! assert!(roi.fits_within(1920, 1080));
//! assert!(!roi.fits_within(100, 100));
//! ```
//!
//! # Used By
//!
//! - [`crate::image::Image`] - Crop and region views
//! - `keyer-ops` - Mask construction and masked composite

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// A rectangle with zero width or height is considered empty.
///
/// # Example
///
/// ```rust
/// use keyer_core::Rect;
///
/// let rect = Rect::new(10, 20, 100, 50);
/// assert_eq!(rect.right(), 110);
/// assert_eq!(rect.bottom(), 70);
/// assert_eq!(rect.area(), 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Region of interest in source-image pixel coordinates.
pub type Region = Rect;

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from origin (0, 0) with given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns the X coordinate of the right edge (exclusive).
    ///
    /// Saturates instead of wrapping for regions near `u32::MAX`.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Returns the Y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Returns the dimensions as (width, height).
    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the area of the rectangle in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the point (px, py) is inside this rectangle.
    ///
    /// Inclusive on the left/top edges, exclusive on the right/bottom edges.
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns `true` if this rectangle lies entirely inside an image of
    /// `width` x `height`.
    ///
    /// Uses checked arithmetic, so a region whose far edge overflows `u32`
    /// never passes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyer_core::Rect;
    ///
    /// assert!(Rect::new(0, 0, 8, 8).fits_within(8, 8));
    /// assert!(!Rect::new(1, 0, 8, 8).fits_within(8, 8));
    /// assert!(!Rect::new(u32::MAX, 0, 2, 1).fits_within(u32::MAX, 1));
    /// ```
    #[inline]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        match (self.x.checked_add(self.width), self.y.checked_add(self.height)) {
            (Some(right), Some(bottom)) => right <= width && bottom <= height,
            _ => false,
        }
    }

    /// Returns the intersection of this rectangle with another.
    ///
    /// Returns `None` if the rectangles don't overlap.
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Scales a rectangle expressed in a `from` coordinate space of size
    /// `(width, height)` into a `to` space.
    ///
    /// Used to translate a region picked on a preview surface into frame
    /// pixel coordinates. The origin is floored and the far edge is ceiled,
    /// so the mapped region always covers the selection; the result is then
    /// clamped to the `to` bounds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyer_core::Rect;
    ///
    /// // A selection on a 375x667 preview, mapped onto a 750x1334 frame.
    /// let picked = Rect::new(10, 20, 100, 200);
    /// let mapped = picked.map_between((375, 667), (750, 1334));
    /// assert_eq!(mapped, Rect::new(20, 40, 200, 400));
    /// ```
    pub fn map_between(&self, from: (u32, u32), to: (u32, u32)) -> Rect {
        if from.0 == 0 || from.1 == 0 {
            return Rect::default();
        }
        let sx = to.0 as f64 / from.0 as f64;
        let sy = to.1 as f64 / from.1 as f64;

        let x0 = (self.x as f64 * sx).floor().min(to.0 as f64) as u32;
        let y0 = (self.y as f64 * sy).floor().min(to.1 as f64) as u32;
        let x1 = (self.right() as f64 * sx).ceil().min(to.0 as f64) as u32;
        let y1 = (self.bottom() as f64 * sy).ceil().min(to.1 as f64) as u32;

        Rect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Returns an iterator over all (x, y) coordinates in this rectangle.
    ///
    /// Iterates row by row, left to right, top to bottom.
    #[inline]
    pub fn iter_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Parses `"x,y,width,height"`.
impl FromStr for Rect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(Error::invalid_argument(format!(
                "region '{s}' must be x,y,width,height"
            )));
        }
        let mut values = [0u32; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse().map_err(|_| {
                Error::invalid_argument(format!("region component '{part}' is not an integer"))
            })?;
        }
        Ok(Rect::new(values[0], values[1], values[2], values[3]))
    }
}
