/// A read-only view over a slice of interleaved audio.
pub struct ImmutableSliceView<'a, T> {
    pub(crate) backing_slice: &'a [T],
    pub(crate) channels: usize,
}

impl<'a, T> ImmutableSliceView<'a, T> {
    #[inline(always)]
    pub fn new(slice: &'a [T], channels: usize) -> Self {
        assert_ne!(channels, 0);
        assert_eq!(slice.len() % channels, 0);
        Self {
            backing_slice: slice,
            channels,
        }
    }
}

/// A view over a mutable slice of interleaved audio.
///
/// If the const generic `ADD` is true, writes through [crate::OutputView] add to the slice rather than replacing what
/// is there.  This is how overlap-add and mixing are expressed without a second buffer.
pub struct MutableSliceView<'a, T, const ADD: bool> {
    pub(crate) backing_slice: &'a mut [T],
    pub(crate) channels: usize,
}

impl<'a, T, const ADD: bool> MutableSliceView<'a, T, ADD> {
    #[inline(always)]
    pub fn new(slice: &'a mut [T], channels: usize) -> Self {
        assert_ne!(channels, 0);
        assert_eq!(slice.len() % channels, 0);
        Self {
            backing_slice: slice,
            channels,
        }
    }
}
