//! Range configuration.
//!
//! Two halves:
//!
//! - [`SharedRanges`] - the live, externally edited set of color ranges. A
//!   picker or control thread appends/clears while the frame loop takes one
//!   [`snapshot`](SharedRanges::snapshot) per frame.
//! - [`KeyerConfig`] - the same settings loaded from YAML.
//!
//! # YAML
//!
//! ```yaml
//! working_size: [320, 640]
//! filter: area
//! region: { x: 0, y: 0, width: 320, height: 640 }
//! ranges:
//!   - lower: [20, 100, 100]
//!     upper: [40, 255, 255]
//! ```
//!
//! Every key is optional.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use keyer_core::{ColorRange, ColorRangeSet, Rect};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::{
    CompositingPipeline, DEFAULT_WORKING_HEIGHT, DEFAULT_WORKING_WIDTH, PipelineConfig,
};
use crate::resize::Filter;
use crate::{OpsError, OpsResult};

/// Copy-on-write color range set shared between threads.
///
/// Snapshots are immutable: editing after a snapshot was taken swaps in a new
/// set and leaves the snapshot as it was.
///
/// ```rust
/// use keyer_core::{Color, ColorRange};
/// use keyer_ops::config::SharedRanges;
///
/// let shared = SharedRanges::new();
/// let before = shared.snapshot();
/// shared.append(ColorRange::new(Color::new(20, 100, 100), Color::new(40, 255, 255)));
/// assert!(before.is_empty());
/// assert_eq!(shared.snapshot().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedRanges {
    inner: Arc<RwLock<Arc<ColorRangeSet>>>,
}

impl SharedRanges {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a shared set starting from `ranges`.
    pub fn from_set(ranges: ColorRangeSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(ranges))),
        }
    }

    /// Adds a range to the union.
    pub fn append(&self, range: ColorRange) {
        self.edit(|set| set.push(range));
    }

    /// Replaces every range with `range` alone.
    pub fn replace(&self, range: ColorRange) {
        self.edit(|set| {
            set.clear();
            set.push(range);
        });
    }

    /// Replaces the whole set.
    pub fn set(&self, ranges: ColorRangeSet) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(ranges);
    }

    /// Removes every range. Frames processed afterwards pass through.
    pub fn clear(&self) {
        self.set(ColorRangeSet::new());
    }

    /// Returns the current set. Later edits do not affect it.
    pub fn snapshot(&self) -> Arc<ColorRangeSet> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Number of ranges currently configured.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns `true` if no range is configured.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    fn edit(&self, f: impl FnOnce(&mut ColorRangeSet)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(Arc::make_mut(&mut guard));
        debug!(ranges = guard.len(), "color ranges updated");
    }
}

impl From<ColorRangeSet> for SharedRanges {
    fn from(ranges: ColorRangeSet) -> Self {
        Self::from_set(ranges)
    }
}

/// Keying settings as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyerConfig {
    /// Overlay working resolution as `[width, height]`.
    pub working_size: (u32, u32),
    /// Overlay resampling filter.
    pub filter: Filter,
    /// Region of interest in frame pixels. Defaults to the working size at
    /// the frame origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Rect>,
    /// Color ranges, unioned.
    pub ranges: ColorRangeSet,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            working_size: (DEFAULT_WORKING_WIDTH, DEFAULT_WORKING_HEIGHT),
            filter: Filter::default(),
            region: None,
            ranges: ColorRangeSet::new(),
        }
    }
}

impl KeyerConfig {
    /// Loads and validates a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> OpsResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading keyer config");
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates YAML.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(yaml: &str) -> OpsResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks that the working size is non-zero and matches the region.
    pub fn validate(&self) -> OpsResult<()> {
        let (w, h) = self.working_size;
        if w == 0 || h == 0 {
            return Err(OpsError::Config(format!("working size {w}x{h} must be non-zero")));
        }
        if let Some(region) = self.region {
            if region.size() != self.working_size {
                return Err(OpsError::Config(format!(
                    "region {region} does not match working size {w}x{h}"
                )));
            }
        }
        Ok(())
    }

    /// The region to key: the configured one, or the working size at the
    /// frame origin.
    pub fn region(&self) -> Rect {
        self.region
            .unwrap_or_else(|| Rect::from_size(self.working_size.0, self.working_size.1))
    }

    /// Pipeline parameters from this config.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_working_size(self.working_size.0, self.working_size.1)
            .with_filter(self.filter)
    }

    /// Builds the compositing pipeline.
    pub fn pipeline(&self) -> CompositingPipeline {
        CompositingPipeline::new(self.pipeline_config())
    }

    /// Live range set seeded from this config.
    pub fn shared_ranges(&self) -> SharedRanges {
        SharedRanges::from_set(self.ranges.clone())
    }
}
