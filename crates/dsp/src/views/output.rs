use super::structs::*;
use crate::ViewMeta;

/// A view over somewhere where audio can be written to.
///
/// This is like a slice, but it is not possible to read through it.  Depending on the view, a write may replace the
/// sample or add to it.
///
/// OutputViews also hold a number of channels, but all operations are done with raw indices.  This is so that we can
/// move the proofs of bounds checks closer to the users, and hopefully get LLVM to see through things without regularly
/// using unsafe.
pub trait OutputView: ViewMeta {
    /// Write a sample of audio data.
    fn write_index(&mut self, index: usize, sample: Self::SampleType);

    /// Write a sample of audio data, with unchecked bounds.
    ///
    /// # Safety
    ///
    /// If the index is out of bounds, behavior is undefined.
    #[inline(always)]
    unsafe fn write_index_unchecked(&mut self, index: usize, sample: Self::SampleType) {
        self.write_index(index, sample);
    }
}

impl<'a, T, const ADD: bool> OutputView for MutableSliceView<'a, T, ADD>
where
    T: std::ops::AddAssign + Copy,
{
    #[inline(always)]
    fn write_index(&mut self, index: usize, sample: Self::SampleType) {
        if ADD {
            self.backing_slice[index] += sample;
        } else {
            self.backing_slice[index] = sample;
        }
    }

    #[inline(always)]
    unsafe fn write_index_unchecked(&mut self, index: usize, sample: Self::SampleType) {
        if ADD {
            *self.backing_slice.get_unchecked_mut(index) += sample;
        } else {
            *self.backing_slice.get_unchecked_mut(index) = sample;
        }
    }
}
