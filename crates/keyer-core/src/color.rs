//! Color triples and inclusive color ranges.
//!
//! - [`Color`] - three 8-bit components in a fixed color space (HSV when
//!   matching, packed RGB/BGR when stored)
//! - [`ColorRange`] - inclusive per-channel interval `[lower, upper]`
//! - [`ColorRangeSet`] - union of ranges
//!
//! # Matching Semantics
//!
//! A pixel matches a range when every channel lies inside the channel's
//! bounds (logical AND), and matches a set when it matches at least one range
//! (logical OR). Bounds are inclusive on both ends.
//!
//! ```rust
//! use keyer_core::{Color, ColorRange, ColorRangeSet};
//!
//! let mut set = ColorRangeSet::new();
//! set.push(ColorRange::new(Color::new(20, 100, 100), Color::new(40, 255, 255)));
//! set.push(ColorRange::new(Color::new(100, 50, 50), Color::new(130, 255, 255)));
//!
//! assert!(set.matches([30, 200, 200]));
//! assert!(set.matches([120, 60, 60]));
//! assert!(!set.matches([70, 200, 200]));
//! ```
//!
//! Bounds are not validated. A range whose lower bound exceeds its upper bound
//! on some channel simply matches nothing.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A 3-component 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Creates a color from its three components.
    #[inline]
    pub const fn new(c0: u8, c1: u8, c2: u8) -> Self {
        Self([c0, c1, c2])
    }

    /// Returns the components as an array.
    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        self.0
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Self(c)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        c.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Parses `"c0,c1,c2"`.
impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(Error::invalid_argument(format!(
                "color '{s}' must have 3 comma-separated components"
            )));
        }
        let mut c = [0u8; 3];
        for (value, part) in c.iter_mut().zip(&parts) {
            *value = part.parse().map_err(|_| {
                Error::invalid_argument(format!("color component '{part}' is not in 0..=255"))
            })?;
        }
        Ok(Self(c))
    }
}

/// Inclusive per-channel color interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorRange {
    /// Lowest accepted value per channel
    pub lower: Color,
    /// Highest accepted value per channel
    pub upper: Color,
}

impl ColorRange {
    /// Creates a range from its bounds.
    #[inline]
    pub const fn new(lower: Color, upper: Color) -> Self {
        Self { lower, upper }
    }

    /// Returns `true` if `px` lies inside the range on every channel.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyer_core::{Color, ColorRange};
    ///
    /// let range = ColorRange::new(Color::new(20, 100, 100), Color::new(40, 255, 255));
    /// assert!(range.contains([20, 100, 100]));
    /// assert!(range.contains([40, 255, 255]));
    /// assert!(!range.contains([41, 200, 200]));
    /// ```
    #[inline]
    pub fn contains(&self, px: [u8; 3]) -> bool {
        let lo = self.lower.0;
        let hi = self.upper.0;
        px[0] >= lo[0]
            && px[0] <= hi[0]
            && px[1] >= lo[1]
            && px[1] <= hi[1]
            && px[2] >= lo[2]
            && px[2] <= hi[2]
    }

    /// Returns `true` if every channel has `lower <= upper`.
    ///
    /// A range failing this check matches nothing.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.lower
            .0
            .iter()
            .zip(self.upper.0.iter())
            .all(|(lo, hi)| lo <= hi)
    }
}

impl fmt::Display for ColorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower, self.upper)
    }
}

/// Parses `"l0,l1,l2:u0,u1,u2"`.
impl FromStr for ColorRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lower, upper) = s.split_once(':').ok_or_else(|| {
            Error::invalid_argument(format!("range '{s}' must be lower:upper"))
        })?;
        Ok(Self::new(lower.parse()?, upper.parse()?))
    }
}

/// Ordered collection of [`ColorRange`]s interpreted as their union.
///
/// Insertion order never changes the set of matched pixels; duplicates are
/// kept but are redundant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ColorRangeSet {
    ranges: Vec<ColorRange>,
}

impl ColorRangeSet {
    /// Creates an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Appends a range.
    #[inline]
    pub fn push(&mut self, range: ColorRange) {
        self.ranges.push(range);
    }

    /// Removes every range.
    #[inline]
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Returns `true` if no range is configured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns the number of configured ranges.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Iterates over the ranges in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, ColorRange> {
        self.ranges.iter()
    }

    /// Returns the ranges as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[ColorRange] {
        &self.ranges
    }

    /// Returns `true` if `px` lies inside at least one range.
    ///
    /// An empty set matches nothing.
    #[inline]
    pub fn matches(&self, px: [u8; 3]) -> bool {
        self.ranges.iter().any(|r| r.contains(px))
    }
}

impl From<Vec<ColorRange>> for ColorRangeSet {
    fn from(ranges: Vec<ColorRange>) -> Self {
        Self { ranges }
    }
}

impl FromIterator<ColorRange> for ColorRangeSet {
    fn from_iter<I: IntoIterator<Item = ColorRange>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl Extend<ColorRange> for ColorRangeSet {
    fn extend<I: IntoIterator<Item = ColorRange>>(&mut self, iter: I) {
        self.ranges.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ColorRangeSet {
    type Item = &'a ColorRange;
    type IntoIter = std::slice::Iter<'a, ColorRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
