use super::structs::*;

/// metadata for a view.
///
/// All views must expose their channel count and the number of frames they have, as well as the underlying length of
/// the backing data (always `frames * channels`, but sometimes more "obvious" to the compiler).
pub trait ViewMeta {
    /// The kind of data this view holds.
    type SampleType: Copy;

    /// Get the number of frames in this view.
    fn get_frames(&self) -> usize;

    /// Get the number of channels in this view.
    fn get_channels(&self) -> usize;

    /// Get the length of the raw data.
    ///
    /// Always `frames * channels` (contractually; an implementation which doesn't do that is invalid).
    fn get_len(&self) -> usize;
}

impl<'a, T> ViewMeta for ImmutableSliceView<'a, T>
where
    T: Copy,
{
    type SampleType = T;

    #[inline(always)]
    fn get_channels(&self) -> usize {
        self.channels
    }

    #[inline(always)]
    fn get_frames(&self) -> usize {
        self.backing_slice.len() / self.channels
    }

    #[inline(always)]
    fn get_len(&self) -> usize {
        self.backing_slice.len()
    }
}

impl<'a, T, const ADD: bool> ViewMeta for MutableSliceView<'a, T, ADD>
where
    T: Copy,
{
    type SampleType = T;

    #[inline(always)]
    fn get_channels(&self) -> usize {
        self.channels
    }

    #[inline(always)]
    fn get_frames(&self) -> usize {
        self.backing_slice.len() / self.channels
    }

    #[inline(always)]
    fn get_len(&self) -> usize {
        self.backing_slice.len()
    }
}
