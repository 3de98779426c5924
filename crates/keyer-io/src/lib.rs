//! # keyer-io
//!
//! Frame I/O for the keying pipeline.
//!
//! - [`png`] - PNG decode/encode to [`keyer_core::Image`]
//! - [`FrameSource`] / [`FrameSink`] - the collaborators that feed frames in
//!   and take composited frames out
//! - [`SequenceSource`] / [`SequenceSink`] - numbered PNG sequences on disk
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use keyer_io::png;
//!
//! let frame = png::read("frame.png")?;
//! png::write("out.png", &frame)?;
//! ```
//!
//! # Dependencies
//!
//! - `keyer-core` - Image type
//! - [`png`](https://docs.rs/png) - PNG codec
//! - [`glob`](https://docs.rs/glob) - Sequence discovery

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod frame;
pub mod png;
pub mod sequence;

pub use error::{IoError, IoResult};
pub use frame::{ChannelSink, FrameSink, FrameSource, StillSource, VecSink, VecSource};
pub use sequence::{DropPolicy, SequenceSink, SequenceSource};

/// Reads an image from `path`.
///
/// Only PNG is supported.
pub fn read<P: AsRef<std::path::Path>>(path: P) -> IoResult<keyer_core::Image> {
    png::read(path)
}

/// Writes an image to `path` as PNG.
pub fn write<P: AsRef<std::path::Path>>(path: P, image: &keyer_core::Image) -> IoResult<()> {
    png::write(path, image)
}
