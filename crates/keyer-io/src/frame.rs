//! Frame source and frame sink collaborators.
//!
//! The keying core neither captures nor presents frames. A [`FrameSource`]
//! hands it decoded frames one at a time, and a [`FrameSink`] receives each
//! processed frame (for preview or encoding) or is told that a frame was
//! dropped.
//!
//! In-memory and channel implementations live here; file-backed ones are in
//! [`crate::sequence`].
//!
//! # Example
//!
//! ```rust
//! use keyer_core::Image;
//! use keyer_io::{FrameSink, FrameSource, VecSink, VecSource};
//!
//! let mut source = VecSource::new(vec![Image::new(2, 2, 3).unwrap()]);
//! let mut sink = VecSink::default();
//! let mut index = 0;
//! while let Some(frame) = source.next_frame().unwrap() {
//!     sink.accept(index, &frame).unwrap();
//!     index += 1;
//! }
//! assert_eq!(sink.frames.len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender, channel};

use keyer_core::Image;

use crate::{IoError, IoResult};

/// Supplier of frames (camera callback, decoded video, image sequence).
pub trait FrameSource {
    /// Returns the next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> IoResult<Option<Image>>;

    /// Number of frames left, when known.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Consumer of processed frames.
///
/// Sinks must not keep references into a frame across calls; copy it if it
/// has to outlive [`accept`](Self::accept).
pub trait FrameSink {
    /// Receives processed frame number `index`.
    fn accept(&mut self, index: usize, frame: &Image) -> IoResult<()>;

    /// Told that frame `index` could not be processed.
    ///
    /// The default does nothing, i.e. the frame is skipped.
    fn dropped(&mut self, index: usize, reason: &str) -> IoResult<()> {
        let _ = (index, reason);
        Ok(())
    }

    /// Called once after the last frame.
    fn finish(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// Source over frames already held in memory.
#[derive(Debug, Default)]
pub struct VecSource {
    frames: VecDeque<Image>,
}

impl VecSource {
    /// Creates a source yielding `frames` in order.
    pub fn new(frames: Vec<Image>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> IoResult<Option<Image>> {
        Ok(self.frames.pop_front())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.frames.len())
    }
}

/// Source yielding one still image a fixed number of times.
///
/// Models a single selected photo fed through the same per-frame path as
/// live capture.
#[derive(Debug)]
pub struct StillSource {
    image: Image,
    remaining: usize,
}

impl StillSource {
    /// Yields `image` once.
    pub fn once(image: Image) -> Self {
        Self::repeat(image, 1)
    }

    /// Yields `image` `count` times.
    pub fn repeat(image: Image, count: usize) -> Self {
        Self {
            image,
            remaining: count,
        }
    }
}

impl FrameSource for StillSource {
    fn next_frame(&mut self) -> IoResult<Option<Image>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(self.image.clone()))
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Sink collecting frames in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    /// Accepted frames with their index.
    pub frames: Vec<(usize, Image)>,
    /// Indices of dropped frames.
    pub dropped: Vec<usize>,
    /// Whether [`FrameSink::finish`] ran.
    pub finished: bool,
}

impl FrameSink for VecSink {
    fn accept(&mut self, index: usize, frame: &Image) -> IoResult<()> {
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn dropped(&mut self, index: usize, _reason: &str) -> IoResult<()> {
        self.dropped.push(index);
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Sink forwarding frames to another thread (display loop, encoder).
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<(usize, Image)>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its frames arrive on.
    pub fn new() -> (Self, Receiver<(usize, Image)>) {
        let (tx, rx) = channel();
        (Self { tx }, rx)
    }
}

impl FrameSink for ChannelSink {
    fn accept(&mut self, index: usize, frame: &Image) -> IoResult<()> {
        self.tx
            .send((index, frame.clone()))
            .map_err(|_| IoError::Disconnected)
    }
}
