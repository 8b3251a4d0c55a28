use soundstage_datasets::{Ear, HrirTable};
use soundstage_dsp::convolution::convolve_direct;
use soundstage_dsp::views::{ImmutableSliceView, MutableSliceView};

use crate::angle_control::AngleControl;
use crate::angle_mapper::{select_bins, SelectedBins};
use crate::block_buffer::ChannelBuffers;
use crate::config::*;

/// Overlap-add convolution of whole super-blocks against the filter pair for the current direction.
///
/// Each pass convolves one super-block per ear, which produces `FILTER_LEN - 1` more frames than went in.  The first
/// super-block's worth (plus whatever the previous pass left over) is published; the rest is kept and added to the
/// start of the next pass.
#[derive(Debug)]
pub(crate) struct ConvolutionEngine {
    table: Option<HrirTable>,
    control: AngleControl,
    super_block_len: usize,

    /// Working space for one ear: `super_block_len + FILTER_LEN`, of which all but the last frame is used.
    scratch: Vec<f32>,

    /// What spilled past the end of the last pass, per ear.
    overflow: ChannelBuffers,

    last_bins: Option<SelectedBins>,

    /// Set when we have logged that there is no table, so that it's logged once per transition.
    warned_no_table: bool,
}

impl ConvolutionEngine {
    pub(crate) fn new(table: Option<HrirTable>, control: AngleControl, super_block_len: usize) -> ConvolutionEngine {
        ConvolutionEngine {
            table,
            control,
            super_block_len,
            scratch: vec![0.0; super_block_len + FILTER_LEN],
            overflow: std::array::from_fn(|_| vec![0.0; OVERFLOW_LEN]),
            last_bins: None,
            warned_no_table: false,
        }
    }

    /// Reallocate scratch space for a new super-block length.
    ///
    /// The tail is cleared: it belongs to audio at the old block size, which the block buffer has also discarded.
    pub(crate) fn set_super_block_len(&mut self, super_block_len: usize) {
        if super_block_len == self.super_block_len {
            return;
        }

        self.super_block_len = super_block_len;
        self.scratch = vec![0.0; super_block_len + FILTER_LEN];
        self.clear_tail();
    }

    pub(crate) fn set_table(&mut self, table: HrirTable) {
        self.table = Some(table);
        self.warned_no_table = false;
    }

    pub(crate) fn has_table(&self) -> bool {
        self.table.is_some()
    }

    pub(crate) fn last_bins(&self) -> Option<SelectedBins> {
        self.last_bins
    }

    fn clear_tail(&mut self) {
        for ch in self.overflow.iter_mut() {
            ch.fill(0.0);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.clear_tail();
        self.scratch.fill(0.0);
        self.last_bins = None;
    }

    /// Run one pass: convolve a super-block of input and write a super-block of output.
    pub(crate) fn convolve(&mut self, input: &ChannelBuffers, output: &mut ChannelBuffers) {
        let len = self.super_block_len;
        debug_assert!(input.iter().all(|c| c.len() == len));
        debug_assert!(output.iter().all(|c| c.len() == len));

        let Some(table) = self.table.as_ref() else {
            if !self.warned_no_table {
                rt_warn!("No HRIR dataset is loaded; outputting silence");
                self.warned_no_table = true;
            }

            for ch in output.iter_mut() {
                ch.fill(0.0);
            }
            self.clear_tail();
            self.last_bins = None;
            return;
        };

        // One snapshot per pass; later changes wait for the next super-block.
        let direction = self.control.snapshot();
        let bins = select_bins(direction);
        if self.last_bins != Some(bins) {
            rt_debug!(
                "Switching to the HRIR measured at azimuth {} elevation {} (requested azimuth {} elevation {})",
                bins.azimuth.angle(),
                bins.elevation.angle(),
                direction.azimuth,
                direction.elevation
            );
        }
        self.last_bins = Some(bins);

        for ear in Ear::ALL {
            let ch = ear.channel();
            let impulse = table.get(ear, bins.azimuth, bins.elevation);
            let scratch = &mut self.scratch[..len + OVERFLOW_LEN];

            convolve_direct(
                &ImmutableSliceView::new(&input[ch][..], 1),
                0,
                &mut MutableSliceView::<_, false>::new(&mut scratch[..], 1),
                0,
                impulse,
            );

            for (s, t) in scratch.iter_mut().zip(self.overflow[ch].iter()) {
                *s += *t;
            }

            output[ch].copy_from_slice(&scratch[..len]);
            self.overflow[ch].copy_from_slice(&scratch[len..]);
            scratch.fill(0.0);
        }

        rt_trace!("Convolved a super-block of {} frames", len);
    }
}
