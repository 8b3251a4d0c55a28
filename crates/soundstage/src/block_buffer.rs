//! Conversion between host blocks of any size and the super-blocks the engine works on.
//!
//! The host hands us audio in blocks of whatever size it likes.  Convolution wants a larger fixed amount at once, so
//! input is accumulated until a super-block is full, the engine runs, and the result is handed back out one host block
//! at a time.  Input and output have separate cursors.  As long as output for a block is produced before that block's
//! input is consumed (which [BlockBuffer::process] and [BlockBuffer::process_in_place] guarantee), output lags input by
//! exactly one super-block.
use soundstage_dsp::{InputView, OutputView, ViewMeta};

use crate::config::*;

/// Per-channel buffers, one super-block long.
pub(crate) type ChannelBuffers = [Vec<f32>; CHANNELS];

#[derive(Debug, thiserror::Error)]
pub enum BlockSizeError {
    #[error("The block size must not be zero")]
    Zero,

    #[error("Block size {requested} is larger than the maximum of {max}")]
    TooLarge { requested: usize, max: usize },
}

fn validate_block_size(block_size: usize) -> Result<(), BlockSizeError> {
    if block_size == 0 {
        return Err(BlockSizeError::Zero);
    }

    if block_size > MAX_BLOCK_SIZE {
        return Err(BlockSizeError::TooLarge {
            requested: block_size,
            max: MAX_BLOCK_SIZE,
        });
    }

    Ok(())
}

fn allocate_channels(len: usize) -> ChannelBuffers {
    std::array::from_fn(|_| vec![0.0; len])
}

#[derive(Debug)]
pub(crate) struct BlockBuffer {
    block_size: usize,

    /// Length of a super-block, in frames.
    capacity: usize,

    /// Input waiting for the next convolution pass.
    accumulator: ChannelBuffers,

    /// The most recent pass's output, waiting to go back to the host.
    output: ChannelBuffers,

    write_pos: usize,
    read_pos: usize,
}

impl BlockBuffer {
    pub(crate) fn new(block_size: usize) -> Result<BlockBuffer, BlockSizeError> {
        validate_block_size(block_size)?;
        let capacity = block_size * SUPER_BLOCK_MULTIPLIER;

        Ok(BlockBuffer {
            block_size,
            capacity,
            accumulator: allocate_channels(capacity),
            output: allocate_channels(capacity),
            write_pos: 0,
            read_pos: 0,
        })
    }

    pub(crate) fn block_size(&self) -> usize {
        self.block_size
    }

    pub(crate) fn super_block_len(&self) -> usize {
        self.capacity
    }

    /// Reallocate for a new block size.
    ///
    /// Everything buffered so far is discarded.  Asking for the current size does nothing.
    pub(crate) fn set_block_size(&mut self, block_size: usize) -> Result<(), BlockSizeError> {
        validate_block_size(block_size)?;

        if block_size == self.block_size {
            return Ok(());
        }

        *self = BlockBuffer::new(block_size)?;
        Ok(())
    }

    /// Forget all buffered audio without reallocating.
    pub(crate) fn reset(&mut self) {
        for ch in self.accumulator.iter_mut().chain(self.output.iter_mut()) {
            ch.fill(0.0);
        }
        self.write_pos = 0;
        self.read_pos = 0;
    }

    /// Copy `frames` frames of input starting at `start` into the accumulator.
    ///
    /// The caller must not cross the end of the super-block.
    fn stash(&mut self, input: &(impl ViewMeta<SampleType = f32> + InputView), start: usize, frames: usize) {
        debug_assert!(self.write_pos + frames <= self.capacity);

        for (ch, acc) in self.accumulator.iter_mut().enumerate() {
            let dest = &mut acc[self.write_pos..self.write_pos + frames];
            for (i, d) in dest.iter_mut().enumerate() {
                *d = input.read_index((start + i) * CHANNELS + ch);
            }
        }

        self.write_pos += frames;
    }

    /// Copy `frames` frames of output to the host's buffer starting at `start`.
    ///
    /// When the end of the super-block is reached the output is cleared, so that if no pass refills it the host gets
    /// silence rather than a repeat.
    fn emit(&mut self, output: &mut (impl ViewMeta<SampleType = f32> + OutputView), start: usize, frames: usize) {
        debug_assert!(self.read_pos + frames <= self.capacity);

        for (ch, out) in self.output.iter().enumerate() {
            let src = &out[self.read_pos..self.read_pos + frames];
            for (i, s) in src.iter().copied().enumerate() {
                output.write_index((start + i) * CHANNELS + ch, s);
            }
        }

        self.read_pos += frames;
        if self.read_pos == self.capacity {
            for ch in self.output.iter_mut() {
                ch.fill(0.0);
            }
            self.read_pos = 0;
        }
    }

    /// If a super-block has been accumulated, run a pass over it and start the next one.
    fn complete_if_full(&mut self, on_full: &mut impl FnMut(&ChannelBuffers, &mut ChannelBuffers)) {
        if self.write_pos < self.capacity {
            return;
        }

        on_full(&self.accumulator, &mut self.output);

        for ch in self.accumulator.iter_mut() {
            ch.fill(0.0);
        }
        self.write_pos = 0;
    }

    /// Consume a block of interleaved stereo input.
    ///
    /// Every time a super-block fills, `on_full` is called with the accumulated input and the output buffer to write
    /// the result to.  Blocks which cross the end of a super-block are split there, so this may trigger more than one
    /// pass if the block is large.
    pub(crate) fn read_input(
        &mut self,
        input: &(impl ViewMeta<SampleType = f32> + InputView),
        mut on_full: impl FnMut(&ChannelBuffers, &mut ChannelBuffers),
    ) {
        assert_eq!(input.get_channels(), CHANNELS);

        let frames = input.get_frames();
        let mut done = 0;
        while done < frames {
            let will_do = (frames - done).min(self.capacity - self.write_pos);
            self.stash(input, done, will_do);
            self.complete_if_full(&mut on_full);
            done += will_do;
        }
    }

    /// Fill a block of interleaved stereo output from the most recent pass.
    pub(crate) fn apply_output(&mut self, output: &mut (impl ViewMeta<SampleType = f32> + OutputView)) {
        assert_eq!(output.get_channels(), CHANNELS);

        let frames = output.get_frames();
        let mut done = 0;
        while done < frames {
            let will_do = (frames - done).min(self.capacity - self.read_pos);
            self.emit(output, done, will_do);
            done += will_do;
        }
    }

    /// Largest chunk starting at `done` which crosses neither cursor's super-block boundary.
    fn lock_step_chunk(&self, frames: usize, done: usize) -> usize {
        (frames - done)
            .min(self.capacity - self.write_pos)
            .min(self.capacity - self.read_pos)
    }

    /// Produce output for and consume a block, in that order, chunk by chunk.
    ///
    /// The input and output must have the same length.
    pub(crate) fn process(
        &mut self,
        input: &(impl ViewMeta<SampleType = f32> + InputView),
        output: &mut (impl ViewMeta<SampleType = f32> + OutputView),
        mut on_full: impl FnMut(&ChannelBuffers, &mut ChannelBuffers),
    ) {
        assert_eq!(input.get_channels(), CHANNELS);
        assert_eq!(output.get_channels(), CHANNELS);
        assert_eq!(input.get_frames(), output.get_frames());

        let frames = input.get_frames();
        let mut done = 0;
        while done < frames {
            let will_do = self.lock_step_chunk(frames, done);
            self.stash(input, done, will_do);
            self.emit(output, done, will_do);
            self.complete_if_full(&mut on_full);
            done += will_do;
        }
    }

    /// Like [BlockBuffer::process], but the output replaces the input in the same buffer.
    pub(crate) fn process_in_place<V>(
        &mut self,
        buffer: &mut V,
        mut on_full: impl FnMut(&ChannelBuffers, &mut ChannelBuffers),
    ) where
        V: ViewMeta<SampleType = f32> + InputView + OutputView,
    {
        assert_eq!(buffer.get_channels(), CHANNELS);

        let frames = buffer.get_frames();
        let mut done = 0;
        while done < frames {
            let will_do = self.lock_step_chunk(frames, done);
            // Input must be taken out before output overwrites it.
            self.stash(&*buffer, done, will_do);
            self.emit(buffer, done, will_do);
            self.complete_if_full(&mut on_full);
            done += will_do;
        }
    }
}
