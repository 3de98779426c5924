//! # keyer-core
//!
//! Core types for color keying and masked compositing.
//!
//! - [`Image`] - Owned 8-bit interleaved buffer (1, 3 or 4 channels)
//! - [`Mask`] - 255/0 selection mask sized to a region
//! - [`Rect`] / [`Region`] - Region of interest
//! - [`Color`], [`ColorRange`], [`ColorRangeSet`] - Inclusive HSV ranges and
//!   their union
//! - [`Error`] - `InvalidArgument` / `OutOfBounds` taxonomy
//!
//! ## Crate Structure
//!
//! ```text
//! keyer-core (this crate)
//!    ^
//!    +-- keyer-io  (PNG codec, frame sources and sinks)
//!    +-- keyer-ops (HSV, mask engine, resize, compositing pipeline)
//!    +-- keyer-cli
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/Deserialize for [`Rect`], [`Color`], [`ColorRange`],
//!   [`ColorRangeSet`] and [`ChannelOrder`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod error;
pub mod image;
pub mod mask;
pub mod rect;

pub use color::{Color, ColorRange, ColorRangeSet};
pub use error::{Error, Result};
pub use image::{ChannelOrder, Image};
pub use mask::Mask;
pub use rect::{Rect, Region};

/// Prelude module for convenient imports.
///
/// ```
/// use keyer_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Color, ColorRange, ColorRangeSet};
    pub use crate::error::{Error, Result};
    pub use crate::image::{ChannelOrder, Image};
    pub use crate::mask::Mask;
    pub use crate::rect::{Rect, Region};
}
