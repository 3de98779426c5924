//! Sequence command
//!
//! Keys every frame matching a glob and writes a numbered PNG sequence.
//! Frames the pipeline rejects are skipped, or replaced by the previous good
//! frame with `--repeat-last`.

use crate::SequenceArgs;
use anyhow::{Context, Result};
use keyer_io::{DropPolicy, SequenceSink, SequenceSource};
use keyer_ops::run_stream;
use tracing::{info, warn};

pub fn run(args: SequenceArgs) -> Result<()> {
    let mut source = SequenceSource::from_glob(&args.input)
        .with_context(|| format!("No input frames for '{}'", args.input))?;

    // Frame size for --roi-space comes from the first frame.
    let frame_size = match source.paths().first() {
        Some(first) => super::load_image(first)?.dimensions(),
        None => (0, 0),
    };
    let config = super::resolve_config(&args.keying, frame_size)?;
    let overlay = super::load_image(&args.overlay)?;
    let region = config.region();

    let policy = if args.repeat_last {
        DropPolicy::RepeatLast
    } else {
        DropPolicy::Skip
    };
    let mut sink = SequenceSink::new(&args.output)
        .with_first_frame(args.start)
        .with_drop_policy(policy);

    info!(
        frames = source.paths().len(),
        %region,
        ranges = config.ranges.len(),
        "keying sequence"
    );
    let stats = run_stream(
        &mut source,
        &mut sink,
        &config.pipeline(),
        &overlay,
        &config.shared_ranges(),
        region,
    )
    .context("Sequence processing failed")?;

    if stats.dropped > 0 {
        warn!(dropped = stats.dropped, frames = stats.frames, "some frames were dropped");
    }
    info!(
        processed = stats.processed,
        written = sink.written().len(),
        "done"
    );
    Ok(())
}
