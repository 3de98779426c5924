//! Integration tests for the keyer crates.
//!
//! End-to-end scenarios across keyer-core, keyer-io and keyer-ops: PNG in,
//! keying pipeline, frames out.

#[cfg(test)]
mod tests {
    use keyer_core::{ChannelOrder, Color, ColorRange, ColorRangeSet, Image, Rect};
    use keyer_io::{
        DropPolicy, FrameSink, IoResult, SequenceSink, SequenceSource, VecSink, VecSource, png,
    };
    use keyer_ops::resize::{Filter, resize_image};
    use keyer_ops::{
        CompositingPipeline, KeyerConfig, PipelineConfig, SharedRanges, StreamStats, run_stream,
    };
    use tempfile::tempdir;

    const YELLOWISH: [u8; 3] = [200, 200, 43];
    const BLUE: [u8; 3] = [0, 0, 255];

    fn yellow() -> ColorRange {
        ColorRange::new(Color::new(20, 100, 100), Color::new(40, 255, 255))
    }

    fn green() -> ColorRange {
        ColorRange::new(Color::new(60, 100, 100), Color::new(80, 255, 255))
    }

    fn assert_region(frame: &Image, region: Rect, inside: [u8; 3], outside: [u8; 3]) {
        for (x, y) in frame.bounds().iter_coords() {
            let expected = if region.contains(x, y) { inside } else { outside };
            assert_eq!(frame.pixel(x, y), &expected, "pixel ({x}, {y})");
        }
    }

    /// Default 320x640 working size with a PNG overlay, RGBA capture frame.
    #[test]
    fn test_default_pipeline_from_png_overlay() {
        let dir = tempdir().unwrap();
        let overlay_path = dir.path().join("overlay.png");
        png::write(&overlay_path, &Image::filled(100, 50, &[0, 0, 255, 255]).unwrap()).unwrap();
        let overlay = png::read(&overlay_path).unwrap();

        let mut frame = Image::filled(340, 700, &[200, 200, 43, 255]).unwrap();
        let region = Rect::new(10, 20, 320, 640);
        let ranges: ColorRangeSet = vec![yellow()].into();

        let pipeline = CompositingPipeline::default();
        let mask = pipeline.mask_for(&frame, &ranges, region).unwrap();
        assert_eq!(mask.dimensions(), (320, 640));
        assert!(mask.is_all_set());

        pipeline.process(&mut frame, &overlay, &ranges, region).unwrap();
        assert_eq!(frame.channels(), 3);
        assert_region(&frame, region, BLUE, YELLOWISH);

        let out_path = dir.path().join("keyed.png");
        png::write(&out_path, &frame).unwrap();
        assert_eq!(png::read(&out_path).unwrap(), frame);
    }

    #[test]
    fn test_no_match_is_alpha_normalized_input() {
        let pipeline = CompositingPipeline::new(PipelineConfig::default().with_working_size(4, 4));
        let mut frame = Image::filled(4, 4, &[200, 200, 43, 255]).unwrap();
        let overlay = Image::filled(4, 4, &BLUE).unwrap();

        pipeline
            .process(&mut frame, &overlay, &vec![green()].into(), Rect::new(0, 0, 4, 4))
            .unwrap();
        assert_eq!(frame, Image::filled(4, 4, &YELLOWISH).unwrap());
    }

    #[test]
    fn test_empty_ranges_byte_identical() {
        let pipeline = CompositingPipeline::default();
        let mut frame = Image::filled(8, 8, &[200, 200, 43, 17]).unwrap();
        let before = frame.clone();
        let overlay = Image::filled(3, 3, &BLUE).unwrap();
        pipeline
            .process(&mut frame, &overlay, &ColorRangeSet::new(), Rect::new(0, 0, 320, 640))
            .unwrap();
        assert_eq!(frame.data(), before.data());
        assert_eq!(frame.channels(), 4);
    }

    #[test]
    fn test_two_ranges_union_composites_both() {
        let pipeline = CompositingPipeline::new(PipelineConfig::default().with_working_size(8, 2));
        let mut frame = Image::filled(8, 2, &YELLOWISH).unwrap();
        for y in 0..2 {
            for x in 4..8 {
                frame.set_pixel(x, y, &[0, 200, 0]);
            }
        }
        let overlay = Image::filled(16, 4, &BLUE).unwrap();

        let mut only_yellow = frame.clone();
        pipeline
            .process(&mut only_yellow, &overlay, &vec![yellow()].into(), Rect::new(0, 0, 8, 2))
            .unwrap();
        assert_eq!(only_yellow.pixel(0, 0), &BLUE);
        assert_eq!(only_yellow.pixel(7, 1), &[0, 200, 0]);

        pipeline
            .process(&mut frame, &overlay, &vec![green(), yellow()].into(), Rect::new(0, 0, 8, 2))
            .unwrap();
        assert!(frame.data().chunks_exact(3).all(|px| px == BLUE));
    }

    #[test]
    fn test_bgr_capture_with_rgb_overlay() {
        let pipeline = CompositingPipeline::new(PipelineConfig::default().with_working_size(2, 2));
        let mut frame = Image::filled(2, 2, &[43, 200, 200, 255])
            .unwrap()
            .with_order(ChannelOrder::Bgr);
        let overlay = png::read_from_memory(
            &png::write_to_memory(&Image::filled(5, 5, &[255, 0, 0]).unwrap()).unwrap(),
        )
        .unwrap();

        pipeline
            .process(&mut frame, &overlay, &vec![yellow()].into(), Rect::new(0, 0, 2, 2))
            .unwrap();

        // Red overlay, stored blue-first like the frame; PNG output is RGB again.
        assert_eq!(frame.pixel(1, 1), &[0, 0, 255]);
        let written = png::read_from_memory(&png::write_to_memory(&frame).unwrap()).unwrap();
        assert_eq!(written.pixel(1, 1), &[255, 0, 0]);
    }

    #[test]
    fn test_failed_call_leaves_frame() {
        let pipeline = CompositingPipeline::new(PipelineConfig::default().with_working_size(4, 4));
        let mut frame = Image::filled(6, 6, &[200, 200, 43, 255]).unwrap();
        let before = frame.clone();
        let overlay = Image::filled(4, 4, &BLUE).unwrap();
        let ranges: ColorRangeSet = vec![yellow()].into();

        let err = pipeline.process(&mut frame, &overlay, &ranges, Rect::new(3, 3, 4, 4)).unwrap_err();
        assert!(err.is_out_of_bounds());
        let err = pipeline.process(&mut frame, &overlay, &ranges, Rect::new(0, 0, 3, 4)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(frame, before);
    }

    #[test]
    fn test_config_file_drives_pipeline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyer.yaml");
        std::fs::write(
            &path,
            "working_size: [2, 2]\nregion: { x: 1, y: 1, width: 2, height: 2 }\nranges:\n  - lower: [20, 100, 100]\n    upper: [40, 255, 255]\n",
        )
        .unwrap();
        let config = KeyerConfig::from_file(&path).unwrap();

        let mut frame = Image::filled(4, 4, &YELLOWISH).unwrap();
        let overlay = Image::filled(7, 3, &BLUE).unwrap();
        config
            .pipeline()
            .process(&mut frame, &overlay, &config.ranges, config.region())
            .unwrap();
        assert_region(&frame, Rect::new(1, 1, 2, 2), BLUE, YELLOWISH);
    }

    #[test]
    fn test_resize_is_deterministic() {
        let data: Vec<u8> = (0..97 * 61 * 3).map(|i| (i * 31 % 251) as u8).collect();
        let overlay = Image::from_data(97, 61, 3, data).unwrap();
        let a = resize_image(&overlay, 320, 640, Filter::Area).unwrap();
        let b = resize_image(&overlay, 320, 640, Filter::Area).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sequence_with_dropped_frame() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in").join("shot");
        let mut writer = SequenceSink::new(&input);
        writer.accept(0, &Image::filled(4, 4, &YELLOWISH).unwrap()).unwrap();
        writer.accept(1, &Image::filled(2, 2, &YELLOWISH).unwrap()).unwrap();
        writer.accept(2, &Image::filled(4, 4, &[200, 200, 43, 255]).unwrap()).unwrap();

        let pattern = dir.path().join("in").join("shot.*.png");
        let mut source = SequenceSource::from_glob(&pattern.to_string_lossy()).unwrap();
        let output = dir.path().join("out").join("keyed");
        let mut sink = SequenceSink::new(&output).with_drop_policy(DropPolicy::RepeatLast);

        let pipeline = CompositingPipeline::new(PipelineConfig::default().with_working_size(2, 2));
        let overlay = Image::filled(2, 2, &BLUE).unwrap();
        let ranges = SharedRanges::from_set(vec![yellow()].into());

        let stats = run_stream(
            &mut source,
            &mut sink,
            &pipeline,
            &overlay,
            &ranges,
            Rect::new(2, 2, 2, 2),
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
        assert_eq!(sink.written().len(), 3);

        let first = png::read(sink.frame_path(0)).unwrap();
        let repeated = png::read(sink.frame_path(1)).unwrap();
        let third = png::read(sink.frame_path(2)).unwrap();
        assert_eq!(repeated, first);
        assert_region(&first, Rect::new(2, 2, 2, 2), BLUE, YELLOWISH);
        assert_eq!(third, first);
    }

    /// Sink that edits the live range set after each frame.
    struct ClearingSink {
        ranges: SharedRanges,
        inner: VecSink,
    }

    impl FrameSink for ClearingSink {
        fn accept(&mut self, index: usize, frame: &Image) -> IoResult<()> {
            self.ranges.clear();
            self.inner.accept(index, frame)
        }
    }

    #[test]
    fn test_range_edits_apply_from_next_frame() {
        let ranges = SharedRanges::new();
        ranges.append(yellow());

        let frame = Image::filled(2, 2, &YELLOWISH).unwrap();
        let mut source = VecSource::new(vec![frame.clone(), frame.clone()]);
        let mut sink = ClearingSink {
            ranges: ranges.clone(),
            inner: VecSink::default(),
        };
        let pipeline = CompositingPipeline::new(PipelineConfig::default().with_working_size(2, 2));
        let overlay = Image::filled(2, 2, &BLUE).unwrap();

        let stats = run_stream(
            &mut source,
            &mut sink,
            &pipeline,
            &overlay,
            &ranges,
            Rect::new(0, 0, 2, 2),
        )
        .unwrap();

        assert_eq!(stats.processed, 2);
        assert_eq!(stats.passed_through, 1);
        assert_eq!(sink.inner.frames[0].1, Image::filled(2, 2, &BLUE).unwrap());
        assert_eq!(sink.inner.frames[1].1, frame);
    }
}
