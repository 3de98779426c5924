//! Binary selection mask.
//!
//! A [`Mask`] has one byte per pixel: [`Mask::MATCH`] (255) where the pixel
//! was selected and [`Mask::NO_MATCH`] (0) elsewhere. Its dimensions are those
//! of the region it was built from, not of the full source image.

use crate::{Error, Image, Result};

/// Single-channel 255/0 mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Mask {
    /// Value of a selected element.
    pub const MATCH: u8 = 255;
    /// Value of an unselected element.
    pub const NO_MATCH: u8 = 0;

    /// Creates an all-[`NO_MATCH`](Self::NO_MATCH) mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![Self::NO_MATCH; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Wraps existing mask bytes. Any non-zero byte is normalized to
    /// [`MATCH`](Self::MATCH).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, mut data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_argument(format!(
                "{width}x{height} mask expects {expected} bytes, got {}",
                data.len()
            )));
        }
        for v in &mut data {
            if *v != Self::NO_MATCH {
                *v = Self::MATCH;
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the mask width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the mask height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the mask dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the raw mask bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the raw mask bytes mutably.
    ///
    /// Callers must keep the 255/0 encoding.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.data[start..start + w]
    }

    /// Returns row `y` mutably.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.data[start..start + w]
    }

    /// Returns `true` if element (x, y) is selected.
    #[inline]
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.data[y as usize * self.width as usize + x as usize] == Self::MATCH
    }

    /// Selects or clears element (x, y).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, selected: bool) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = if selected { Self::MATCH } else { Self::NO_MATCH };
    }

    /// Number of selected elements.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v == Self::MATCH).count()
    }

    /// Returns `true` if every element is selected.
    pub fn is_all_set(&self) -> bool {
        self.data.iter().all(|&v| v == Self::MATCH)
    }

    /// Returns `true` if no element is selected.
    pub fn is_all_clear(&self) -> bool {
        self.data.iter().all(|&v| v == Self::NO_MATCH)
    }

    /// Merges `other` into this mask with a logical OR.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the dimensions differ.
    pub fn union_with(&mut self, other: &Mask) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(
                "mask union",
                self.dimensions(),
                other.dimensions(),
            ));
        }
        for (dst, &src) in self.data.iter_mut().zip(&other.data) {
            *dst |= src;
        }
        Ok(())
    }

    /// Converts the mask into a 1-channel grayscale [`Image`].
    pub fn into_image(self) -> Image {
        Image::from_raw_parts(self.width, self.height, 1, self.data)
    }
}
