use std::num::NonZeroUsize;

/// A format for audio data.
#[derive(Clone, Debug, Eq, PartialEq, derive_more::IsVariant)]
pub enum ChannelFormat {
    /// This is single-channel mono audio.
    Mono,

    /// This is stereo audio: 2 channels [l r].
    Stereo,

    /// This is some raw audio data without an interpretation.
    Raw { channels: NonZeroUsize },
}

impl ChannelFormat {
    /// The format for a channel count without further information, as for example found in a wave file header.
    ///
    /// Returns `None` for 0 channels.
    pub fn from_channel_count(channels: usize) -> Option<ChannelFormat> {
        match channels {
            0 => None,
            1 => Some(ChannelFormat::Mono),
            2 => Some(ChannelFormat::Stereo),
            n => NonZeroUsize::new(n).map(|channels| ChannelFormat::Raw { channels }),
        }
    }

    pub fn get_channel_count(&self) -> NonZeroUsize {
        match self {
            ChannelFormat::Mono => NonZeroUsize::new(1).unwrap(),
            ChannelFormat::Stereo => NonZeroUsize::new(2).unwrap(),
            ChannelFormat::Raw { channels, .. } => *channels,
        }
    }
}
