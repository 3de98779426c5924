//! Owned 8-bit image buffer.
//!
//! [`Image`] is the plain pixel container handed between frame sources, the
//! compositing pipeline and frame sinks. It holds interleaved `u8` samples in
//! **row-major** order, top-to-bottom:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  ← Row 0
//!         [R G B R G B R G B ...]  ← Row 1
//!         ...
//! ```
//!
//! Supported layouts:
//!
//! | channels | meaning                               |
//! |----------|---------------------------------------|
//! | 1        | grayscale / mask                      |
//! | 3        | color (RGB or BGR, or HSV once keyed) |
//! | 4        | color + alpha as delivered by capture |
//!
//! The color channel order is tracked by [`ChannelOrder`] so that a BGR(A)
//! frame from a capture device and an RGB overlay from a decoder can be
//! combined without silently swapping red and blue.
//!
//! # Usage
//!
//! ```rust
//! use keyer_core::{Image, Rect};
//!
//! let mut img = Image::filled(8, 8, &[10, 20, 30]).unwrap();
//! img.set_pixel(2, 3, &[255, 0, 0]);
//! assert_eq!(img.pixel(2, 3), &[255, 0, 0]);
//!
//! let crop = img.crop(Rect::new(2, 3, 2, 2)).unwrap();
//! assert_eq!(crop.dimensions(), (2, 2));
//! assert_eq!(crop.pixel(0, 0), &[255, 0, 0]);
//! ```

use crate::{Error, Rect, Result};

/// Order of the three color channels in a packed pixel.
///
/// Alpha, when present, is always the fourth channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChannelOrder {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Blue, green, red.
    Bgr,
}

impl ChannelOrder {
    /// Reads the first three channels of `px` as `[r, g, b]`.
    #[inline]
    pub fn to_rgb(self, px: &[u8]) -> [u8; 3] {
        match self {
            Self::Rgb => [px[0], px[1], px[2]],
            Self::Bgr => [px[2], px[1], px[0]],
        }
    }

    /// Packs `[r, g, b]` into this order.
    #[inline]
    pub fn from_rgb(self, rgb: [u8; 3]) -> [u8; 3] {
        match self {
            Self::Rgb => rgb,
            Self::Bgr => [rgb[2], rgb[1], rgb[0]],
        }
    }
}

/// Owned interleaved `u8` image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: usize,
    order: ChannelOrder,
}

/// Channel counts accepted by [`Image`].
const VALID_CHANNELS: [usize; 3] = [1, 3, 4];

fn check_channels(channels: usize) -> Result<()> {
    if VALID_CHANNELS.contains(&channels) {
        Ok(())
    } else {
        Err(Error::unsupported_channels("image", "1, 3 or 4", channels))
    }
}

fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| {
            Error::invalid_argument(format!("image dimensions {width}x{height} overflow"))
        })
}

impl Image {
    /// Creates a zero-filled image.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `channels` is not 1, 3 or 4 or the buffer
    /// size overflows.
    pub fn new(width: u32, height: u32, channels: usize) -> Result<Self> {
        check_channels(channels)?;
        let len = buffer_len(width, height, channels)?;
        Ok(Self {
            data: vec![0; len],
            width,
            height,
            channels,
            order: ChannelOrder::Rgb,
        })
    }

    /// Creates an image from existing samples.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the channel count is unsupported or
    /// `data.len() != width * height * channels`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyer_core::Image;
    ///
    /// let img = Image::from_data(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(img.pixel(1, 0), &[4, 5, 6]);
    /// assert!(Image::from_data(2, 2, 3, vec![0; 5]).is_err());
    /// ```
    pub fn from_data(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        check_channels(channels)?;
        let expected = buffer_len(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::invalid_argument(format!(
                "{width}x{height}x{channels} image expects {expected} samples, got {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            order: ChannelOrder::Rgb,
        })
    }

    /// Creates an image where every pixel equals `pixel`.
    ///
    /// The channel count is `pixel.len()`.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self> {
        check_channels(pixel.len())?;
        let len = buffer_len(width, height, pixel.len())?;
        let data = pixel.iter().copied().cycle().take(len).collect();
        Ok(Self {
            data,
            width,
            height,
            channels: pixel.len(),
            order: ChannelOrder::Rgb,
        })
    }

    /// Builds an image from parts already known to be consistent.
    pub(crate) fn from_raw_parts(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * channels);
        Self {
            data,
            width,
            height,
            channels,
            order: ChannelOrder::Rgb,
        }
    }

    /// Returns the image tagged with `order`. Samples are not touched.
    #[inline]
    pub fn with_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    /// Returns the channel order tag.
    #[inline]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Re-tags the channel order. Samples are not touched.
    #[inline]
    pub fn set_order(&mut self, order: ChannelOrder) {
        self.order = order;
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns `true` for 4-channel images.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns a rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the raw samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the raw samples mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image, returning its samples.
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the number of samples in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels
    }

    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        &self.data[offset..offset + self.channels]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds or `pixel.len()` differs from the
    /// channel count.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: &[u8]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        self.data[offset..offset + self.channels].copy_from_slice(pixel);
    }

    /// Fills the entire image with a pixel value.
    pub fn fill(&mut self, pixel: &[u8]) {
        debug_assert_eq!(pixel.len(), self.channels, "fill pixel channel mismatch");
        for chunk in self.data.chunks_exact_mut(self.channels) {
            chunk.copy_from_slice(pixel);
        }
    }

    /// Returns row `y` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.row_len();
        &self.data[start..start + self.row_len()]
    }

    /// Returns row `y` mutably.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let len = self.row_len();
        let start = y as usize * len;
        &mut self.data[start..start + len]
    }

    /// Returns the samples of row `y` between columns `x` and `x + width`.
    ///
    /// # Panics
    ///
    /// Panics if the span leaves the image.
    #[inline]
    pub fn span(&self, y: u32, x: u32, width: u32) -> &[u8] {
        let start = self.pixel_offset(x, y);
        &self.data[start..start + width as usize * self.channels]
    }

    /// Mutable counterpart of [`span`](Self::span).
    #[inline]
    pub fn span_mut(&mut self, y: u32, x: u32, width: u32) -> &mut [u8] {
        let start = self.pixel_offset(x, y);
        let len = width as usize * self.channels;
        &mut self.data[start..start + len]
    }

    /// Fails with [`Error::OutOfBounds`] unless `region` lies inside the image.
    #[inline]
    pub fn check_region(&self, region: Rect) -> Result<()> {
        if region.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(Error::out_of_bounds(region, self.width, self.height))
        }
    }

    /// Copies a region into a new image with the same channel layout.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `region` leaves the image.
    pub fn crop(&self, region: Rect) -> Result<Image> {
        self.check_region(region)?;
        let mut data = Vec::with_capacity(region.area() as usize * self.channels);
        for y in region.y..region.bottom() {
            data.extend_from_slice(self.span(y, region.x, region.width));
        }
        Ok(Image {
            data,
            width: region.width,
            height: region.height,
            channels: self.channels,
            order: self.order,
        })
    }
}
