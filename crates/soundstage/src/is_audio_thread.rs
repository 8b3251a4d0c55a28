thread_local! {
    static IS_AUDIO_THREAD: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

pub(crate) fn is_audio_thread() -> bool {
    IS_AUDIO_THREAD.with(|x| x.get())
}

/// Mark this thread as being an audio thread.
///
/// Hosts should call this from their audio callback thread before the first call into a
/// [Spatializer](crate::Spatializer).  Logging from marked threads goes through a ringbuffer instead of straight to the
/// `log` crate, so that a slow logger can never stall audio.
#[inline(always)]
pub fn mark_audio_thread() {
    IS_AUDIO_THREAD.with(|x| x.replace(true));
}
