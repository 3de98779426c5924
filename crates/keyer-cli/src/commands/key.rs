//! Key command
//!
//! Keys a single frame and composites the overlay into it.

use crate::KeyArgs;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

pub fn run(args: KeyArgs) -> Result<()> {
    let mut frame = super::load_image(&args.frame)?;
    let overlay = super::load_image(&args.overlay)?;
    let config = super::resolve_config(&args.keying, frame.dimensions())?;
    let region = config.region();

    if let Some(path) = &args.save_config {
        let yaml = config.to_yaml()?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to save config: {}", path.display()))?;
        debug!(path = %path.display(), "saved effective config");
    }

    if config.ranges.is_empty() {
        warn!("no color ranges configured; frame is written unchanged");
    }
    info!(
        frame = %args.frame.display(),
        overlay = %args.overlay.display(),
        %region,
        ranges = config.ranges.len(),
        "keying"
    );

    config
        .pipeline()
        .process(&mut frame, &overlay, &config.ranges, region)
        .with_context(|| format!("Failed to key {}", args.frame.display()))?;

    super::save_image(&args.output, &frame)?;
    info!(output = %args.output.display(), "done");
    Ok(())
}
