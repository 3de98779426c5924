//! # keyer-ops
//!
//! HSV color-range keying and masked compositing.
//!
//! # Modules
//!
//! - [`color`] - RGB to 8-bit HSV, alpha stripping, channel order
//! - [`mask`] - Color-range mask engine (union of inclusive HSV ranges)
//! - [`resize`] - Separable resize with area averaging
//! - [`composite`] - Binary-mask copy of an overlay into a frame
//! - [`pipeline`] - The per-frame compositing pipeline
//! - [`config`] - Shared range set and YAML configuration
//! - [`stream`] - Drives the pipeline over a frame source
//!
//! # Example
//!
//! ```rust
//! use keyer_core::{Color, ColorRange, Image, Rect};
//! use keyer_ops::{CompositingPipeline, PipelineConfig, SharedRanges};
//!
//! let ranges = SharedRanges::new();
//! ranges.append(ColorRange::new(Color::new(20, 100, 100), Color::new(40, 255, 255)));
//!
//! let pipeline = CompositingPipeline::new(PipelineConfig::default().with_working_size(2, 2));
//! let mut frame = Image::filled(2, 2, &[200, 200, 43, 255]).unwrap();
//! let overlay = Image::filled(8, 8, &[0, 0, 255]).unwrap();
//!
//! pipeline
//!     .process(&mut frame, &overlay, &ranges.snapshot(), Rect::new(0, 0, 2, 2))
//!     .unwrap();
//! assert_eq!(frame.pixel(0, 0), &[0, 0, 255]);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Row-parallel HSV conversion, masking and resize
//!   via rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod rows;

pub mod color;
pub mod composite;
pub mod config;
pub mod mask;
pub mod pipeline;
pub mod resize;
pub mod stream;

pub use config::{KeyerConfig, SharedRanges};
pub use error::{OpsError, OpsResult};
pub use mask::build_mask;
pub use pipeline::{CompositingPipeline, PipelineConfig};
pub use resize::Filter;
pub use stream::{StreamStats, run_stream};
