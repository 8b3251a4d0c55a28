use soundstage_datasets::{DatasetPaths, HrirTable};
use soundstage_dsp::channel_conversion::stereo_to_dual_mono;
use soundstage_dsp::views::MutableSliceView;
use soundstage_dsp::{InputView, OutputView, ViewMeta};

use crate::angle_control::AngleControl;
use crate::angle_mapper::SelectedBins;
use crate::block_buffer::BlockBuffer;
use crate::config::CHANNELS;
use crate::engine::ConvolutionEngine;
use crate::error::{Error, Result};

/// Places a mono source at a direction around the listener's head, for playback over headphones.
///
/// Audio goes in and out as interleaved stereo, where the input should carry the same signal on both channels.  Output
/// is left ear then right ear, and lags the input by [Spatializer::latency_frames].
///
/// Everything here runs on the audio thread except construction, [Spatializer::set_block_size], and loading datasets,
/// which allocate.  The direction is moved from other threads through [Spatializer::control].
#[derive(Debug)]
pub struct Spatializer {
    control: AngleControl,
    buffers: BlockBuffer,
    engine: ConvolutionEngine,
}

impl Spatializer {
    /// Build a spatializer for the given host block size.
    ///
    /// With no table, output is silent until one is provided.
    pub fn new(table: Option<HrirTable>, block_size: usize) -> Result<Spatializer> {
        crate::logging::ensure_log_ctx();

        let buffers = BlockBuffer::new(block_size)?;
        let control = AngleControl::default();
        let engine = ConvolutionEngine::new(table, control.clone(), buffers.super_block_len());

        log::info!(
            "Spatializer ready: block size {}, latency {} frames, dataset {}",
            block_size,
            buffers.super_block_len(),
            if engine.has_table() { "loaded" } else { "missing" }
        );

        Ok(Spatializer {
            control,
            buffers,
            engine,
        })
    }

    pub fn with_dataset(paths: &DatasetPaths, block_size: usize) -> Result<Spatializer> {
        let table = HrirTable::load(paths)?;
        Spatializer::new(Some(table), block_size)
    }

    /// Load the dataset from [DatasetPaths::default_location].
    pub fn from_default_location(block_size: usize) -> Result<Spatializer> {
        let paths = DatasetPaths::default_location().ok_or_else(Error::no_dataset_location)?;
        Spatializer::with_dataset(&paths, block_size)
    }

    /// Get a handle which moves the source.  See [AngleControl].
    pub fn control(&self) -> AngleControl {
        self.control.clone()
    }

    pub fn block_size(&self) -> usize {
        self.buffers.block_size()
    }

    /// How far output lags input, in frames.
    pub fn latency_frames(&self) -> usize {
        self.buffers.super_block_len()
    }

    /// Change the host block size.
    ///
    /// Anything buffered is dropped, unless the size is unchanged in which case this does nothing.  On error, the
    /// previous size stays in effect.
    pub fn set_block_size(&mut self, block_size: usize) -> Result<()> {
        if block_size == self.buffers.block_size() {
            return Ok(());
        }

        self.buffers.set_block_size(block_size)?;
        self.engine.set_super_block_len(self.buffers.super_block_len());
        log::debug!(
            "Block size is now {}; latency is now {} frames",
            block_size,
            self.latency_frames()
        );
        Ok(())
    }

    pub fn set_table(&mut self, table: HrirTable) {
        self.engine.set_table(table);
    }

    /// Replace the dataset with one loaded from disk.
    ///
    /// If loading fails the current dataset, if any, is kept.
    pub fn load_dataset(&mut self, paths: &DatasetPaths) -> Result<()> {
        let table = HrirTable::load(paths).map_err(|e| {
            log::error!("Keeping the current dataset: {}", e);
            e
        })?;
        self.engine.set_table(table);
        Ok(())
    }

    pub fn has_dataset(&self) -> bool {
        self.engine.has_table()
    }

    /// The measurement used by the most recent super-block, if one has been convolved with a dataset loaded.
    pub fn last_bins(&self) -> Option<SelectedBins> {
        self.engine.last_bins()
    }

    /// Consume a block of input, convolving whenever a super-block fills.
    ///
    /// For the latency to be exactly one super-block, call [Spatializer::apply_output] for the same block first, or
    /// use [Spatializer::process].
    pub fn read_input(&mut self, input: &(impl ViewMeta<SampleType = f32> + InputView)) {
        let engine = &mut self.engine;
        self.buffers.read_input(input, |i, o| engine.convolve(i, o));
    }

    /// Write the next block of output.
    pub fn apply_output(&mut self, output: &mut (impl ViewMeta<SampleType = f32> + OutputView)) {
        self.buffers.apply_output(output);
    }

    /// Produce a block of output and consume a block of input of the same length.
    ///
    /// Any block size works, including ones which differ from [Spatializer::block_size]; the latency is always exactly
    /// one super-block.
    pub fn process(
        &mut self,
        input: &(impl ViewMeta<SampleType = f32> + InputView),
        output: &mut (impl ViewMeta<SampleType = f32> + OutputView),
    ) {
        let engine = &mut self.engine;
        self.buffers.process(input, output, |i, o| engine.convolve(i, o));
    }

    /// Spatialize a block of interleaved stereo in place, as a plugin host does.
    ///
    /// The two channels are first mixed down to one, so stereo sources end up as a single point.
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) {
        stereo_to_dual_mono(buffer);

        let engine = &mut self.engine;
        self.buffers.process_in_place(
            &mut MutableSliceView::<_, false>::new(buffer, CHANNELS),
            |i, o| engine.convolve(i, o),
        );
    }

    /// Drop all buffered audio and the convolution tail, keeping the block size and dataset.
    pub fn reset(&mut self) {
        self.buffers.reset();
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use soundstage_dsp::views::ImmutableSliceView;

    use crate::angle_control::Direction;

    fn unit_table() -> HrirTable {
        HrirTable::from_fn(|ear, _, _, tap| match (ear, tap) {
            (soundstage_datasets::Ear::Left, 0) => 1.0,
            (soundstage_datasets::Ear::Right, 1) => 0.5,
            _ => 0.0,
        })
    }

    #[test]
    fn test_latency() {
        let mut s = Spatializer::new(Some(unit_table()), 200).unwrap();
        assert_eq!(s.latency_frames(), 2000);
        s.set_block_size(64).unwrap();
        assert_eq!(s.latency_frames(), 640);
        assert_eq!(s.block_size(), 64);
    }

    #[test]
    fn rejected_block_sizes_change_nothing() {
        let mut s = Spatializer::new(None, 32).unwrap();
        let err = s.set_block_size(0).unwrap_err();
        assert!(err.is_block_size());
        assert_eq!(s.block_size(), 32);

        assert!(Spatializer::new(None, 0).unwrap_err().is_block_size());
    }

    #[test]
    fn missing_dataset_keeps_the_old_one() {
        let mut s = Spatializer::new(Some(unit_table()), 16).unwrap();
        let dir = std::env::temp_dir().join("soundstage-spatializer-test-nonexistent");
        let err = s.load_dataset(&DatasetPaths::in_dir(&dir)).unwrap_err();
        assert!(err.is_dataset());
        assert!(err.as_load_error().is_some());
        assert!(s.has_dataset());

        let err = Spatializer::with_dataset(&DatasetPaths::in_dir(&dir), 16).unwrap_err();
        assert!(err.is_dataset());
    }

    /// With a table where the left ear passes through and the right ear halves and delays by one frame, the output is
    /// easy to predict.
    #[test]
    fn process_delays_by_one_super_block() {
        let mut s = Spatializer::new(Some(unit_table()), 4).unwrap();
        let latency = s.latency_frames();

        let frames = 3 * latency;
        let input: Vec<f32> = (0..frames).flat_map(|i| [i as f32, i as f32]).collect();
        let mut output = vec![f32::NAN; input.len()];

        for (i, o) in input.chunks(4 * CHANNELS).zip(output.chunks_mut(4 * CHANNELS)) {
            s.process(
                &ImmutableSliceView::new(i, CHANNELS),
                &mut MutableSliceView::<_, false>::new(o, CHANNELS),
            );
        }

        for (pos, frame) in output.chunks_exact(2).enumerate() {
            let left = pos.checked_sub(latency).map(|x| x as f32).unwrap_or(0.0);
            let right = pos
                .checked_sub(latency + 1)
                .map(|x| x as f32 * 0.5)
                .unwrap_or(0.0);
            assert_eq!((pos, frame[0], frame[1]), (pos, left, right));
        }
    }

    #[test]
    fn process_interleaved_mixes_down_first() {
        let mut s = Spatializer::new(Some(unit_table()), 2).unwrap();
        let latency = s.latency_frames();

        let mut got = vec![];
        for i in 0..2 * latency {
            // Left and right cancel except for their average.
            let mut frame = [i as f32 + 1.0, i as f32 - 1.0];
            s.process_interleaved(&mut frame[..]);
            got.push(frame[0]);
        }

        for (pos, v) in got.iter().copied().enumerate() {
            let expected = pos.checked_sub(latency).map(|x| x as f32).unwrap_or(0.0);
            assert_eq!(v, expected);
        }
    }

    #[test]
    fn reset_silences_what_was_buffered() {
        let mut s = Spatializer::new(Some(unit_table()), 1).unwrap();
        let latency = s.latency_frames();
        let ones = vec![1.0f32; 2 * latency];
        s.read_input(&ImmutableSliceView::new(&ones[..], CHANNELS));
        assert!(s.last_bins().is_some());

        s.reset();
        assert!(s.last_bins().is_none());

        let mut output = vec![f32::NAN; 2 * latency];
        s.apply_output(&mut MutableSliceView::<_, false>::new(&mut output[..], CHANNELS));
        assert!(output.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn direction_changes_take_effect_at_the_next_super_block() {
        let mut s = Spatializer::new(Some(unit_table()), 10).unwrap();
        let control = s.control();
        let block = vec![0.0f32; 2 * s.latency_frames()];

        control.set_direction(Direction::new(90.0, 0.0));
        s.read_input(&ImmutableSliceView::new(&block[..], CHANNELS));
        let right = s.last_bins().unwrap();
        assert_eq!(right.azimuth.angle(), 80.0);

        control.set_direction(Direction::new(270.0, 0.0));
        assert_eq!(s.last_bins(), Some(right));
        s.read_input(&ImmutableSliceView::new(&block[..], CHANNELS));
        assert_eq!(s.last_bins().unwrap().azimuth.angle(), -80.0);
    }
}
