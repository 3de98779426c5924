//! Image resize and resampling.
//!
//! Separable two-pass resize (horizontal, then vertical) on 8-bit buffers.
//! Intermediate values are kept in `f32`; the final pass rounds to nearest and
//! clamps to `0..=255`. Output depends only on the input, so resizing the same
//! image twice gives bit-identical results.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - Fastest, no interpolation (blocky)
//! - [`Filter::Bilinear`] - Triangle filter, widened when downscaling
//! - [`Filter::Area`] - Exact pixel-coverage averaging (default; best for
//!   downscaling an overlay to the working size)
//!
//! # Example
//!
//! ```rust
//! use keyer_ops::resize::{resize_u8, Filter};
//!
//! let src = vec![128u8; 64 * 64 * 3];
//! let dst = resize_u8(&src, 64, 64, 3, 32, 16, Filter::Area).unwrap();
//! assert_eq!(dst.len(), 32 * 16 * 3);
//! assert!(dst.iter().all(|&v| v == 128));
//! ```

use std::fmt;
use std::str::FromStr;

use keyer_core::{Error, Image, Result};
use tracing::trace;

use crate::rows::for_each_row;

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Nearest-neighbor (fastest, no interpolation).
    Nearest,
    /// Bilinear interpolation.
    Bilinear,
    /// Area averaging.
    #[default]
    Area,
}

impl Filter {
    /// Lowercase filter name.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Bilinear => "bilinear",
            Filter::Area => "area",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "point" => Ok(Filter::Nearest),
            "bilinear" | "linear" => Ok(Filter::Bilinear),
            "area" | "box" => Ok(Filter::Area),
            other => Err(Error::invalid_argument(format!(
                "unknown filter '{other}' (expected area, bilinear or nearest)"
            ))),
        }
    }
}

/// Source samples contributing to one destination sample.
#[derive(Debug, Clone)]
struct Contrib {
    start: usize,
    weights: Vec<f32>,
}

fn contributions(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Contrib> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| match filter {
            Filter::Nearest => {
                let s = (((d as f64 + 0.5) * scale) as usize).min(src_len - 1);
                Contrib {
                    start: s,
                    weights: vec![1.0],
                }
            }
            Filter::Bilinear => {
                let radius = scale.max(1.0);
                let center = (d as f64 + 0.5) * scale - 0.5;
                let left = ((center - radius).floor().max(0.0)) as usize;
                let right = ((center + radius).ceil() as usize).min(src_len - 1);
                let weights = (left..=right)
                    .map(|s| {
                        let dist = ((s as f64 - center) / radius).abs();
                        if dist < 1.0 { 1.0 - dist } else { 0.0 }
                    })
                    .collect();
                normalized(left, weights)
            }
            Filter::Area => {
                let lo = d as f64 * scale;
                let hi = (d as f64 + 1.0) * scale;
                let left = lo.floor() as usize;
                let right = (hi.ceil() as usize).min(src_len);
                let weights = (left..right)
                    .map(|s| (hi.min(s as f64 + 1.0) - lo.max(s as f64)).max(0.0))
                    .collect();
                normalized(left, weights)
            }
        })
        .collect()
}

fn normalized(start: usize, weights: Vec<f64>) -> Contrib {
    let sum: f64 = weights.iter().sum();
    let weights = if sum > 0.0 {
        weights.iter().map(|w| (w / sum) as f32).collect()
    } else {
        weights.iter().map(|_| 0.0).collect()
    };
    Contrib { start, weights }
}

/// Resizes interleaved 8-bit image data.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `src.len()` does not match the source
/// dimensions or either size is zero.
///
/// # Example
///
/// ```rust
/// use keyer_ops::resize::{resize_u8, Filter};
///
/// // 2x1 black/white -> 1x1 gray
/// let dst = resize_u8(&[0, 255], 2, 1, 1, 1, 1, Filter::Area).unwrap();
/// assert_eq!(dst, vec![128]);
/// ```
pub fn resize_u8(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> Result<Vec<u8>> {
    let expected = src_w
        .checked_mul(src_h)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| Error::invalid_argument("source dimensions overflow"))?;
    if src.len() != expected {
        return Err(Error::invalid_argument(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    if src_w == 0 || src_h == 0 || channels == 0 {
        return Err(Error::invalid_argument("source size must be > 0"));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(Error::invalid_argument("destination size must be > 0"));
    }

    let temp = resize_horizontal(src, src_w, src_h, channels, dst_w, filter);
    Ok(resize_vertical(&temp, dst_w, src_h, channels, dst_h, filter))
}

fn resize_horizontal(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    filter: Filter,
) -> Vec<f32> {
    let contribs = contributions(src_w, dst_w, filter);
    let mut dst = vec![0.0f32; dst_w * src_h * channels];

    for_each_row(&mut dst, dst_w * channels, |y, row| {
        let src_row = &src[y * src_w * channels..(y + 1) * src_w * channels];
        for (out, c) in row.chunks_exact_mut(channels).zip(&contribs) {
            for (i, &w) in c.weights.iter().enumerate() {
                let px = &src_row[(c.start + i) * channels..(c.start + i + 1) * channels];
                for (o, &v) in out.iter_mut().zip(px) {
                    *o += v as f32 * w;
                }
            }
        }
    });
    dst
}

fn resize_vertical(
    src: &[f32],
    width: usize,
    src_h: usize,
    channels: usize,
    dst_h: usize,
    filter: Filter,
) -> Vec<u8> {
    let contribs = contributions(src_h, dst_h, filter);
    let row_len = width * channels;
    let mut dst = vec![0u8; row_len * dst_h];

    for_each_row(&mut dst, row_len, |y, row| {
        let c = &contribs[y];
        let mut acc = vec![0.0f32; row_len];
        for (i, &w) in c.weights.iter().enumerate() {
            let src_row = &src[(c.start + i) * row_len..(c.start + i + 1) * row_len];
            for (a, &v) in acc.iter_mut().zip(src_row) {
                *a += v * w;
            }
        }
        for (o, a) in row.iter_mut().zip(acc) {
            *o = a.round().clamp(0.0, 255.0) as u8;
        }
    });
    dst
}

/// Resizes an [`Image`] to `width` x `height`, keeping its channel layout and
/// order.
pub fn resize_image(image: &Image, width: u32, height: u32, filter: Filter) -> Result<Image> {
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }
    trace!(
        from_w = image.width(),
        from_h = image.height(),
        to_w = width,
        to_h = height,
        %filter,
        "resize_image"
    );
    let data = resize_u8(
        image.data(),
        image.width() as usize,
        image.height() as usize,
        image.channels(),
        width as usize,
        height as usize,
        filter,
    )?;
    Ok(Image::from_data(width, height, image.channels(), data)?.with_order(image.order()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use keyer_core::ChannelOrder;

    fn gradient(w: usize, h: usize, channels: usize) -> Vec<u8> {
        (0..w * h * channels).map(|i| (i * 7 % 256) as u8).collect()
    }

    #[test]
    fn test_area_weights_sum_to_one() {
        for (src, dst) in [(640, 320), (100, 7), (3, 10), (1, 1)] {
            for c in contributions(src, dst, Filter::Area) {
                let sum: f32 = c.weights.iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_area_halving_averages_pairs() {
        let src = [0u8, 100, 50, 150];
        let dst = resize_u8(&src, 4, 1, 1, 2, 1, Filter::Area).unwrap();
        assert_eq!(dst, vec![50, 100]);
    }

    #[test]
    fn test_area_non_integer_ratio() {
        // 3 -> 2: each output covers 1.5 source pixels.
        let dst = resize_u8(&[0, 90, 180], 3, 1, 1, 2, 1, Filter::Area).unwrap();
        assert_eq!(dst, vec![30, 150]);
    }

    #[test]
    fn test_identity_all_filters() {
        let src = gradient(9, 5, 3);
        for filter in [Filter::Nearest, Filter::Bilinear, Filter::Area] {
            let dst = resize_u8(&src, 9, 5, 3, 9, 5, filter).unwrap();
            assert_eq!(dst, src, "{filter}");
        }
    }

    #[test]
    fn test_solid_color_preserved() {
        let src = [0u8, 0, 255].repeat(37 * 23);
        for filter in [Filter::Nearest, Filter::Bilinear, Filter::Area] {
            let dst = resize_u8(&src, 37, 23, 3, 320, 640, filter).unwrap();
            assert!(dst.chunks_exact(3).all(|px| px == [0, 0, 255]), "{filter}");
        }
    }

    #[test]
    fn test_deterministic() {
        let src = gradient(123, 77, 4);
        let a = resize_u8(&src, 123, 77, 4, 32, 64, Filter::Area).unwrap();
        let b = resize_u8(&src, 123, 77, 4, 32, 64, Filter::Area).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_upscale_nearest_repeats() {
        let dst = resize_u8(&[10, 20], 2, 1, 1, 4, 1, Filter::Nearest).unwrap();
        assert_eq!(dst, vec![10, 10, 20, 20]);
    }

    #[test]
    fn test_bad_sizes() {
        assert!(resize_u8(&[0; 5], 2, 2, 1, 1, 1, Filter::Area).is_err());
        assert!(resize_u8(&[0; 4], 2, 2, 1, 0, 1, Filter::Area).is_err());
        assert!(resize_u8(&[], 0, 0, 1, 1, 1, Filter::Area).is_err());
    }

    #[test]
    fn test_resize_image_keeps_order() {
        let img = Image::filled(10, 10, &[1, 2, 3]).unwrap().with_order(ChannelOrder::Bgr);
        let out = resize_image(&img, 4, 8, Filter::Area).unwrap();
        assert_eq!(out.dimensions(), (4, 8));
        assert_eq!(out.order(), ChannelOrder::Bgr);
        assert_eq!(out.pixel(3, 7), &[1, 2, 3]);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("AREA".parse::<Filter>().unwrap(), Filter::Area);
        assert_eq!("linear".parse::<Filter>().unwrap(), Filter::Bilinear);
        assert!("lanczos".parse::<Filter>().is_err());
        assert_eq!(Filter::default(), Filter::Area);
    }
}
