//! Per-frame keying and compositing pipeline.
//!
//! [`CompositingPipeline::process`] takes a captured frame and an overlay
//! image and burns the overlay into the frame wherever the frame's color
//! falls inside one of the configured HSV ranges:
//!
//! ```text
//! frame (3/4 ch) --strip alpha--> output copy ------------------+
//!       |                                                       v
//!       +--to_hsv--> HSV copy --build_mask(ranges, region)--> copy_masked --> frame
//!                                                               ^
//! overlay --strip alpha--> frame order --resize(working size)---+
//! ```
//!
//! Every argument is validated before the frame is touched, so a failed call
//! leaves it as it was. An empty range set short-circuits before validation.
//!
//! # Example
//!
//! ```rust
//! use keyer_core::{Color, ColorRange, ColorRangeSet, Image, Rect};
//! use keyer_ops::{CompositingPipeline, PipelineConfig};
//!
//! let pipeline = CompositingPipeline::new(PipelineConfig::default().with_working_size(4, 4));
//! let mut frame = Image::filled(8, 8, &[200, 200, 43]).unwrap();
//! let overlay = Image::filled(16, 16, &[0, 0, 255]).unwrap();
//! let ranges: ColorRangeSet =
//!     vec![ColorRange::new(Color::new(20, 100, 100), Color::new(40, 255, 255))].into();
//!
//! pipeline.process(&mut frame, &overlay, &ranges, Rect::new(2, 2, 4, 4)).unwrap();
//! assert_eq!(frame.pixel(2, 2), &[0, 0, 255]);
//! assert_eq!(frame.pixel(0, 0), &[200, 200, 43]);
//! ```

use keyer_core::{ColorRangeSet, Error, Image, Mask, Rect, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::color::{strip_alpha, to_hsv, to_order};
use crate::composite::copy_masked;
use crate::mask::build_mask;
use crate::resize::{Filter, resize_image};

/// Working width the overlay is resized to by default.
pub const DEFAULT_WORKING_WIDTH: u32 = 320;
/// Working height the overlay is resized to by default.
pub const DEFAULT_WORKING_HEIGHT: u32 = 640;

/// Pipeline parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Width of the resized overlay; regions must match it.
    pub working_width: u32,
    /// Height of the resized overlay; regions must match it.
    pub working_height: u32,
    /// Overlay resampling filter.
    pub filter: Filter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            working_width: DEFAULT_WORKING_WIDTH,
            working_height: DEFAULT_WORKING_HEIGHT,
            filter: Filter::Area,
        }
    }
}

impl PipelineConfig {
    /// Sets the working resolution.
    pub fn with_working_size(mut self, width: u32, height: u32) -> Self {
        self.working_width = width;
        self.working_height = height;
        self
    }

    /// Sets the overlay resampling filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Working resolution as (width, height).
    pub fn working_size(&self) -> (u32, u32) {
        (self.working_width, self.working_height)
    }
}

/// Color-key compositing pipeline.
///
/// Holds no per-frame state; one instance can serve any number of frames.
#[derive(Debug, Clone, Default)]
pub struct CompositingPipeline {
    config: PipelineConfig,
}

impl CompositingPipeline {
    /// Creates a pipeline with the given parameters.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Returns the pipeline parameters.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Composites `overlay` into `frame` where the frame matches `ranges`
    /// inside `region`.
    ///
    /// On success `frame` is replaced by its 3-channel version (alpha
    /// dropped, channel order kept) with the resized overlay written through
    /// the mask. With an empty `ranges` the call returns immediately and
    /// `frame` is untouched.
    ///
    /// # Errors
    ///
    /// Checked in this order, before `frame` is modified:
    ///
    /// 1. [`Error::InvalidArgument`] if `frame` or `overlay` is not 3 or 4
    ///    channels
    /// 2. [`Error::OutOfBounds`] if `region` leaves `frame`
    /// 3. [`Error::InvalidArgument`] if `region` is not the working size
    pub fn process(
        &self,
        frame: &mut Image,
        overlay: &Image,
        ranges: &ColorRangeSet,
        region: Rect,
    ) -> Result<()> {
        if ranges.is_empty() {
            trace!("no color ranges, frame passed through");
            return Ok(());
        }
        check_color("frame", frame)?;
        check_color("overlay", overlay)?;
        frame.check_region(region)?;
        let working = self.config.working_size();
        if region.size() != working {
            return Err(Error::dimension_mismatch(
                "region vs working size",
                region.size(),
                working,
            ));
        }
        debug!(
            width = frame.width(),
            height = frame.height(),
            %region,
            ranges = ranges.len(),
            "process"
        );

        let mut output = strip_alpha(frame)?;
        let mask = {
            let hsv = to_hsv(frame)?;
            build_mask(&hsv, ranges, region)?
        };
        let overlay = to_order(&strip_alpha(overlay)?, output.order());
        let overlay = resize_image(&overlay, working.0, working.1, self.config.filter)?;

        copy_masked(&mut output, &overlay, &mask, region)?;
        *frame = output;
        Ok(())
    }

    /// Builds the mask `process` would use for `frame`, without compositing.
    ///
    /// The region only needs to lie inside the frame; the working size is not
    /// enforced.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a frame that is not 3 or 4 channels,
    /// [`Error::OutOfBounds`] for a region outside it.
    pub fn mask_for(&self, frame: &Image, ranges: &ColorRangeSet, region: Rect) -> Result<Mask> {
        check_color("frame", frame)?;
        frame.check_region(region)?;
        let hsv = to_hsv(frame)?;
        build_mask(&hsv, ranges, region)
    }
}

fn check_color(what: &str, image: &Image) -> Result<()> {
    match image.channels() {
        3 | 4 => Ok(()),
        n => Err(Error::unsupported_channels(what, "3 or 4", n)),
    }
}
