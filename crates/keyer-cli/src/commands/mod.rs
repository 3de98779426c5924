//! CLI command implementations

pub mod key;
pub mod mask;
pub mod sequence;

use crate::KeyingArgs;
use anyhow::{Context, Result};
use keyer_core::Image;
use keyer_ops::KeyerConfig;
use std::path::Path;
use tracing::{debug, warn};

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    keyer_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    keyer_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Parses `WxH`.
pub fn parse_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("'{s}' is not WIDTHxHEIGHT"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width in '{s}'"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height in '{s}'"))?;
    if w == 0 || h == 0 {
        return Err(format!("'{s}' must be non-zero"));
    }
    Ok((w, h))
}

/// Merges the config file (if any) with command-line overrides.
///
/// `frame_size` is used to map `--roi` out of `--roi-space`.
pub fn resolve_config(args: &KeyingArgs, frame_size: (u32, u32)) -> Result<KeyerConfig> {
    let mut config = match &args.config {
        Some(path) => KeyerConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => KeyerConfig::default(),
    };

    config.ranges.extend(args.ranges.iter().copied());
    if let Some(filter) = args.filter {
        config.filter = filter;
    }
    if let Some(size) = args.working {
        config.working_size = size;
    }
    if let Some(roi) = args.roi {
        let region = match args.roi_space {
            Some(space) => roi.map_between(space, frame_size),
            None => roi,
        };
        debug!(%roi, %region, "region of interest");
        config.region = Some(region);
        if args.working.is_none() {
            config.working_size = region.size();
        }
    }

    for range in config.ranges.iter().filter(|r| !r.is_ordered()) {
        warn!(%range, "range has lower > upper on some channel and matches nothing");
    }
    config.validate().context("Invalid keying settings")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyer_core::{Color, ColorRange, Rect};

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("320x640"), Ok((320, 640)));
        assert_eq!(parse_size("4X2"), Ok((4, 2)));
        assert!(parse_size("320").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn test_roi_sets_working_size() {
        let args = KeyingArgs {
            roi: Some(Rect::new(2, 2, 10, 20)),
            ..Default::default()
        };
        let config = resolve_config(&args, (100, 100)).unwrap();
        assert_eq!(config.working_size, (10, 20));
        assert_eq!(config.region(), Rect::new(2, 2, 10, 20));
    }

    #[test]
    fn test_roi_space_mapping() {
        let args = KeyingArgs {
            roi: Some(Rect::new(10, 20, 100, 200)),
            roi_space: Some((375, 667)),
            ..Default::default()
        };
        let config = resolve_config(&args, (750, 1334)).unwrap();
        assert_eq!(config.region(), Rect::new(20, 40, 200, 400));
    }

    #[test]
    fn test_explicit_working_must_match_roi() {
        let args = KeyingArgs {
            roi: Some(Rect::new(0, 0, 10, 10)),
            working: Some((20, 20)),
            ..Default::default()
        };
        assert!(resolve_config(&args, (100, 100)).is_err());
    }

    #[test]
    fn test_flags_extend_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("k.yaml");
        std::fs::write(
            &path,
            "working_size: [4, 4]\nranges:\n  - lower: [20, 100, 100]\n    upper: [40, 255, 255]\n",
        )
        .unwrap();
        let args = KeyingArgs {
            config: Some(path),
            ranges: vec![ColorRange::new(Color::new(60, 100, 100), Color::new(80, 255, 255))],
            ..Default::default()
        };
        let config = resolve_config(&args, (8, 8)).unwrap();
        assert_eq!(config.ranges.len(), 2);
        assert_eq!(config.working_size, (4, 4));
        assert_eq!(config.region(), Rect::new(0, 0, 4, 4));
    }
}
