//! Mask command
//!
//! Writes the color-range mask of a frame as a grayscale PNG, for checking
//! ranges before compositing.

use crate::MaskArgs;
use anyhow::{Context, Result};
use tracing::info;

pub fn run(args: MaskArgs) -> Result<()> {
    let frame = super::load_image(&args.frame)?;
    let config = super::resolve_config(&args.keying, frame.dimensions())?;
    // Without an explicit region the whole frame is scanned.
    let region = config.region.unwrap_or_else(|| frame.bounds());

    let mask = config
        .pipeline()
        .mask_for(&frame, &config.ranges, region)
        .with_context(|| format!("Failed to mask {}", args.frame.display()))?;

    info!(
        %region,
        selected = mask.count_set(),
        total = region.area(),
        "mask built"
    );
    super::save_image(&args.output, &mask.into_image())
}
