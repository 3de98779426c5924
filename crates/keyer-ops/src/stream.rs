//! Frame stream driver.
//!
//! Pulls frames from a [`FrameSource`], keys each one against the current
//! range snapshot and hands the result to a [`FrameSink`]. A frame the
//! pipeline rejects is dropped (the sink is told why) and the stream moves
//! on; source and sink I/O errors end the stream.

use keyer_core::{Image, Rect};
use keyer_io::{FrameSink, FrameSource};
use tracing::{debug, warn};

use crate::OpsResult;
use crate::config::SharedRanges;
use crate::pipeline::CompositingPipeline;

/// Frame counters for one stream run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Frames pulled from the source.
    pub frames: usize,
    /// Frames delivered to the sink.
    pub processed: usize,
    /// Of the delivered frames, those with no range configured.
    pub passed_through: usize,
    /// Frames the pipeline rejected.
    pub dropped: usize,
}

/// Runs the pipeline over every frame of `source`.
///
/// The range set is read once per frame, so edits made through `ranges`
/// while the stream runs apply from the next frame on.
///
/// # Errors
///
/// Only I/O errors from `source` or `sink` are returned; pipeline errors are
/// counted in [`StreamStats::dropped`].
pub fn run_stream<S, K>(
    source: &mut S,
    sink: &mut K,
    pipeline: &CompositingPipeline,
    overlay: &Image,
    ranges: &SharedRanges,
    region: Rect,
) -> OpsResult<StreamStats>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let mut stats = StreamStats::default();

    while let Some(mut frame) = source.next_frame()? {
        let index = stats.frames;
        stats.frames += 1;

        let snapshot = ranges.snapshot();
        match pipeline.process(&mut frame, overlay, &snapshot, region) {
            Ok(()) => {
                sink.accept(index, &frame)?;
                stats.processed += 1;
                if snapshot.is_empty() {
                    stats.passed_through += 1;
                }
            }
            Err(e) => {
                warn!(index, error = %e, "dropping frame");
                sink.dropped(index, &e.to_string())?;
                stats.dropped += 1;
            }
        }
    }

    sink.finish()?;
    debug!(
        frames = stats.frames,
        processed = stats.processed,
        dropped = stats.dropped,
        "stream finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use keyer_core::{Color, ColorRange};
    use keyer_io::{IoError, IoResult, VecSink, VecSource};

    fn pipeline() -> CompositingPipeline {
        CompositingPipeline::new(PipelineConfig::default().with_working_size(2, 2))
    }

    fn yellow() -> ColorRange {
        ColorRange::new(Color::new(20, 100, 100), Color::new(40, 255, 255))
    }

    #[test]
    fn test_bad_frame_is_dropped_and_stream_continues() {
        let good = Image::filled(4, 4, &[200, 200, 43]).unwrap();
        let small = Image::filled(1, 1, &[200, 200, 43]).unwrap();
        let mut source = VecSource::new(vec![good.clone(), small, good]);
        let mut sink = VecSink::default();
        let overlay = Image::filled(2, 2, &[0, 0, 255]).unwrap();
        let ranges = SharedRanges::from_set(vec![yellow()].into());

        let stats = run_stream(
            &mut source,
            &mut sink,
            &pipeline(),
            &overlay,
            &ranges,
            Rect::new(1, 1, 2, 2),
        )
        .unwrap();

        assert_eq!(
            stats,
            StreamStats {
                frames: 3,
                processed: 2,
                passed_through: 0,
                dropped: 1,
            }
        );
        assert_eq!(sink.dropped, vec![1]);
        assert_eq!(sink.frames.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(sink.frames[0].1.pixel(1, 1), &[0, 0, 255]);
        assert_eq!(sink.frames[0].1.pixel(0, 0), &[200, 200, 43]);
        assert!(sink.finished);
    }

    #[test]
    fn test_empty_ranges_pass_through() {
        let frame = Image::filled(4, 4, &[1, 2, 3, 4]).unwrap();
        let mut source = VecSource::new(vec![frame.clone()]);
        let mut sink = VecSink::default();
        let overlay = Image::filled(2, 2, &[0, 0, 255]).unwrap();

        let stats = run_stream(
            &mut source,
            &mut sink,
            &pipeline(),
            &overlay,
            &SharedRanges::new(),
            Rect::new(0, 0, 2, 2),
        )
        .unwrap();

        assert_eq!(stats.passed_through, 1);
        assert_eq!(sink.frames[0].1, frame);
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn accept(&mut self, _index: usize, _frame: &Image) -> IoResult<()> {
            Err(IoError::Disconnected)
        }
    }

    #[test]
    fn test_sink_error_aborts() {
        let mut source = VecSource::new(vec![Image::filled(2, 2, &[0, 0, 0]).unwrap(); 3]);
        let overlay = Image::filled(2, 2, &[0, 0, 255]).unwrap();
        let err = run_stream(
            &mut source,
            &mut FailingSink,
            &pipeline(),
            &overlay,
            &SharedRanges::new(),
            Rect::new(0, 0, 2, 2),
        )
        .unwrap_err();
        assert!(matches!(err, crate::OpsError::Io(IoError::Disconnected)));
        assert_eq!(source.remaining(), Some(2));
    }
}
