//! PNG format support.
//!
//! Frames and overlays are decoded to 8-bit [`Image`]s; masks and composited
//! frames are encoded back as 8-bit PNG.
//!
//! # Features
//!
//! - Grayscale, grayscale+alpha, RGB and RGBA input
//! - Palette and 16-bit input normalized to 8-bit
//! - 1, 3 and 4 channel output; BGR images are written in RGB order
//!
//! # Example
//!
//! ```rust,ignore
//! use keyer_io::png::{read, write};
//!
//! let frame = read("frame.png")?;
//! write("keyed.png", &frame)?;
//! ```

use crate::{IoError, IoResult};
use keyer_core::{ChannelOrder, Image};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tracing::trace;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    trace!(path = %path.display(), "png::read");
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Decodes a PNG held in memory.
pub fn read_from_memory(data: &[u8]) -> IoResult<Image> {
    decode(Cursor::new(data))
}

fn decode<R: BufRead + Seek>(input: R) -> IoResult<Image> {
    let mut decoder = png::Decoder::new(input);
    // Palette -> RGB(A), 16-bit -> 8-bit.
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::UnsupportedBitDepth(format!(
            "{:?} {:?}",
            info.color_type, info.bit_depth
        )));
    }

    let (channels, data) = match info.color_type {
        png::ColorType::Rgb => (3, buf),
        png::ColorType::Rgba => (4, buf),
        png::ColorType::Grayscale => (1, buf),
        png::ColorType::GrayscaleAlpha => {
            // No 2-channel layout; widen to RGBA.
            let rgba = buf
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect();
            (4, rgba)
        }
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                other, info.bit_depth
            )));
        }
    };

    Ok(Image::from_data(info.width, info.height, channels, data)?)
}

/// Writes an image to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    trace!(path = %path.display(), width = image.width(), height = image.height(), "png::write");
    let file = File::create(path)?;
    encode(BufWriter::new(file), image)
}

/// Encodes an image as PNG into a byte vector.
pub fn write_to_memory(image: &Image) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    encode(&mut out, image)?;
    Ok(out)
}

fn encode<W: Write>(writer: W, image: &Image) -> IoResult<()> {
    let color_type = match image.channels() {
        1 => png::ColorType::Grayscale,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    let samples = to_rgb_order(image);
    png_writer
        .write_image_data(&samples)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}

/// PNG stores color as RGB; swap BGR(A) images on the way out.
fn to_rgb_order(image: &Image) -> std::borrow::Cow<'_, [u8]> {
    if image.order() == ChannelOrder::Rgb || image.channels() < 3 {
        return std::borrow::Cow::Borrowed(image.data());
    }
    let mut data = image.data().to_vec();
    for px in data.chunks_exact_mut(image.channels()) {
        px.swap(0, 2);
    }
    std::borrow::Cow::Owned(data)
}
