//! Numbered PNG frame sequences.
//!
//! - [`SequenceSource`] reads every file matching a glob pattern, sorted by
//!   path (`shot.0001.png`, `shot.0002.png`, ...).
//! - [`SequenceSink`] writes `prefix.NNNN.png` files, one per frame index.
//!
//! # Example
//!
//! ```rust,ignore
//! use keyer_io::{SequenceSink, SequenceSource};
//!
//! let source = SequenceSource::from_glob("capture/frame.*.png")?;
//! let sink = SequenceSink::new("keyed/frame");
//! ```

use std::path::{Path, PathBuf};

use keyer_core::Image;
use tracing::{debug, warn};

use crate::frame::{FrameSink, FrameSource};
use crate::{IoError, IoResult, png};

/// Frames read from a sorted list of PNG files.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl SequenceSource {
    /// Collects all files matching `pattern`, sorted by path.
    ///
    /// # Errors
    ///
    /// [`IoError::Parse`] for a malformed pattern, [`IoError::MissingData`]
    /// when nothing matches.
    pub fn from_glob(pattern: &str) -> IoResult<Self> {
        let entries = glob::glob(pattern)
            .map_err(|e| IoError::Parse(format!("bad pattern '{}': {}", pattern, e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unreadable sequence entry"),
            }
        }
        if paths.is_empty() {
            return Err(IoError::MissingData(format!("no frames match '{}'", pattern)));
        }
        paths.sort();
        debug!(pattern, frames = paths.len(), "sequence source");
        Ok(Self::from_paths(paths))
    }

    /// Uses `paths` in the given order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths, next: 0 }
    }

    /// The files backing this sequence.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl FrameSource for SequenceSource {
    fn next_frame(&mut self) -> IoResult<Option<Image>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        png::read(path).map(Some)
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.paths.len() - self.next)
    }
}

/// What a [`SequenceSink`] writes for a dropped frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    /// Leave a gap in the numbering.
    #[default]
    Skip,
    /// Write the last successfully processed frame again.
    RepeatLast,
}

/// Writes frames as `prefix.NNNN.png`.
#[derive(Debug)]
pub struct SequenceSink {
    prefix: PathBuf,
    first_frame: usize,
    padding: usize,
    policy: DropPolicy,
    last_good: Option<Image>,
    written: Vec<PathBuf>,
}

impl SequenceSink {
    /// Creates a sink numbering frames from 1 with 4-digit padding.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            first_frame: 1,
            padding: 4,
            policy: DropPolicy::Skip,
            last_good: None,
            written: Vec::new(),
        }
    }

    /// Sets the number of the first frame.
    pub fn with_first_frame(mut self, first: usize) -> Self {
        self.first_frame = first;
        self
    }

    /// Sets the zero padding of the frame number.
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the dropped-frame policy.
    pub fn with_drop_policy(mut self, policy: DropPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of frame `index`.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        let number = self.first_frame + index;
        let name = match self.prefix.file_name() {
            Some(stem) => format!(
                "{}.{:0width$}.png",
                stem.to_string_lossy(),
                number,
                width = self.padding
            ),
            None => format!("{:0width$}.png", number, width = self.padding),
        };
        match self.prefix.parent() {
            Some(dir) if dir != Path::new("") => dir.join(name),
            _ => PathBuf::from(name),
        }
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_frame(&mut self, index: usize, frame: &Image) -> IoResult<()> {
        let path = self.frame_path(index);
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        png::write(&path, frame)?;
        self.written.push(path);
        Ok(())
    }
}

impl FrameSink for SequenceSink {
    fn accept(&mut self, index: usize, frame: &Image) -> IoResult<()> {
        self.write_frame(index, frame)?;
        if self.policy == DropPolicy::RepeatLast {
            self.last_good = Some(frame.clone());
        }
        Ok(())
    }

    fn dropped(&mut self, index: usize, reason: &str) -> IoResult<()> {
        match (self.policy, self.last_good.take()) {
            (DropPolicy::RepeatLast, Some(last)) => {
                debug!(index, reason, "repeating last good frame");
                let result = self.write_frame(index, &last);
                self.last_good = Some(last);
                result
            }
            _ => {
                debug!(index, reason, "skipping dropped frame");
                Ok(())
            }
        }
    }
}
