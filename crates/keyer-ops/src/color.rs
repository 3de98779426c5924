//! Color-space normalization for keying.
//!
//! Matching happens in 8-bit HSV with the convention used by common computer
//! vision libraries:
//!
//! | channel | range      | meaning               |
//! |---------|------------|-----------------------|
//! | H       | `0..180`   | hue in degrees / 2    |
//! | S       | `0..=255`  | saturation            |
//! | V       | `0..=255`  | value (max component) |
//!
//! All values are rounded to nearest. Gray pixels have H = S = 0.
//!
//! # Example
//!
//! ```rust
//! use keyer_ops::color::rgb_to_hsv;
//!
//! assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
//! assert_eq!(rgb_to_hsv([200, 200, 43]), [30, 200, 200]);
//! ```

use keyer_core::{ChannelOrder, Error, Image, Result};
use tracing::trace;

use crate::rows::for_each_row;

/// Converts one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(i32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        (255.0 * delta as f32 / max as f32).round() as i32
    };

    let h = if delta == 0 {
        0.0
    } else {
        let d = delta as f32;
        let deg = if max == r {
            60.0 * (g - b) as f32 / d
        } else if max == g {
            120.0 + 60.0 * (b - r) as f32 / d
        } else {
            240.0 + 60.0 * (r - g) as f32 / d
        };
        if deg < 0.0 { deg + 360.0 } else { deg }
    };
    // 359.x degrees rounds up to 180, which wraps to red.
    let h = ((h / 2.0).round() as i32) % 180;

    [h as u8, s.clamp(0, 255) as u8, v as u8]
}

/// Converts a 3- or 4-channel color image to a 3-channel HSV image.
///
/// Channels are read according to the image's [`ChannelOrder`]; alpha is
/// ignored.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for 1-channel input.
pub fn to_hsv(image: &Image) -> Result<Image> {
    let channels = image.channels();
    if channels != 3 && channels != 4 {
        return Err(Error::unsupported_channels("HSV input", "3 or 4", channels));
    }
    trace!(width = image.width(), height = image.height(), channels, "to_hsv");

    let order = image.order();
    let mut out = Image::new(image.width(), image.height(), 3)?;
    let src_row_len = image.row_len();
    let src = image.data();

    for_each_row(out.data_mut(), image.width() as usize * 3, |y, row| {
        let src_row = &src[y * src_row_len..(y + 1) * src_row_len];
        for (dst, px) in row.chunks_exact_mut(3).zip(src_row.chunks_exact(channels)) {
            dst.copy_from_slice(&rgb_to_hsv(order.to_rgb(px)));
        }
    });
    Ok(out)
}

/// Drops the alpha channel of a 4-channel image; 3-channel images are copied.
///
/// The channel order tag is preserved.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for 1-channel input.
pub fn strip_alpha(image: &Image) -> Result<Image> {
    match image.channels() {
        3 => Ok(image.clone()),
        4 => {
            let data = image
                .data()
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            Ok(Image::from_data(image.width(), image.height(), 3, data)?.with_order(image.order()))
        }
        n => Err(Error::unsupported_channels("color image", "3 or 4", n)),
    }
}

/// Returns a copy of `image` with its color channels in `order`.
///
/// Red and blue are swapped only when the orders differ; alpha stays last.
/// Single-channel images are only re-tagged.
pub fn to_order(image: &Image, order: ChannelOrder) -> Image {
    let mut out = image.clone();
    if image.order() != order && image.channels() >= 3 {
        for px in out.data_mut().chunks_exact_mut(image.channels()) {
            px.swap(0, 2);
        }
    }
    out.with_order(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
    }

    #[test]
    fn test_grays() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
    }

    #[test]
    fn test_hue_wraps_below_180() {
        // Almost-red magenta, hue ~359.x degrees.
        let [h, _, _] = rgb_to_hsv([255, 0, 1]);
        assert!(h < 180);
        assert_eq!(h, 0);
    }

    #[test]
    fn test_yellowish() {
        assert_eq!(rgb_to_hsv([200, 200, 43]), [30, 200, 200]);
    }

    #[test]
    fn test_to_hsv_respects_order() {
        let rgb = Image::filled(2, 1, &[200, 200, 43]).unwrap();
        let bgr = Image::filled(2, 1, &[43, 200, 200]).unwrap().with_order(ChannelOrder::Bgr);
        assert_eq!(to_hsv(&rgb).unwrap(), to_hsv(&bgr).unwrap());
        assert_eq!(to_hsv(&rgb).unwrap().pixel(1, 0), &[30, 200, 200]);
    }

    #[test]
    fn test_to_hsv_ignores_alpha() {
        let rgba = Image::filled(3, 2, &[200, 200, 43, 7]).unwrap();
        let hsv = to_hsv(&rgba).unwrap();
        assert_eq!(hsv.channels(), 3);
        assert!(hsv.data().chunks_exact(3).all(|px| px == [30, 200, 200]));
    }

    #[test]
    fn test_to_hsv_rejects_gray() {
        let gray = Image::new(2, 2, 1).unwrap();
        assert!(to_hsv(&gray).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_strip_alpha() {
        let rgba = Image::filled(2, 2, &[1, 2, 3, 4]).unwrap().with_order(ChannelOrder::Bgr);
        let rgb = strip_alpha(&rgba).unwrap();
        assert_eq!(rgb.channels(), 3);
        assert_eq!(rgb.order(), ChannelOrder::Bgr);
        assert_eq!(rgb.pixel(1, 1), &[1, 2, 3]);
        assert!(strip_alpha(&Image::new(1, 1, 1).unwrap()).is_err());
    }

    #[test]
    fn test_to_order() {
        let rgb = Image::filled(1, 1, &[1, 2, 3, 4]).unwrap();
        let bgr = to_order(&rgb, ChannelOrder::Bgr);
        assert_eq!(bgr.pixel(0, 0), &[3, 2, 1, 4]);
        assert_eq!(bgr.order(), ChannelOrder::Bgr);
        assert_eq!(to_order(&bgr, ChannelOrder::Bgr), bgr);
        assert_eq!(to_order(&bgr, ChannelOrder::Rgb), rgb);
    }
}
