use crate::views::*;
use crate::ChannelFormat;

/// A converter from the channel format of some audio to stereo.
///
/// The rules are as follows:
///
/// - Mono to stereo broadcasts the mono channel equally to both stereo channels.
/// - Stereo to stereo copies.
/// - Anything else is an error.
///
/// The spatializer wants its input as the same mono signal on both channels, which [stereo_to_dual_mono] then does
/// in place.
#[derive(Clone, Debug)]
pub struct ChannelConverter {
    input_format: ChannelFormat,
}

/// Reasons it isn't possible to convert from one format to another.
#[derive(Debug, thiserror::Error)]
pub enum ChannelConversionError {
    #[error("Unable to convert {input:?} audio to {output:?}; only mono or stereo to stereo is supported")]
    Unsupported {
        input: ChannelFormat,
        output: ChannelFormat,
    },
}

impl ChannelConverter {
    /// get a converter to convert from the input to output types, if possible.
    pub fn new(
        input_format: ChannelFormat,
        output_format: ChannelFormat,
    ) -> Result<ChannelConverter, ChannelConversionError> {
        use ChannelFormat as Ch;

        if !matches!((&input_format, &output_format), (Ch::Mono | Ch::Stereo, Ch::Stereo)) {
            return Err(ChannelConversionError::Unsupported {
                input: input_format,
                output: output_format,
            });
        }

        Ok(ChannelConverter { input_format })
    }

    pub fn input_format(&self) -> &ChannelFormat {
        &self.input_format
    }

    /// Convert some data from the flat, interleaved input and write it to the given stereo output view.
    ///
    /// The input data must be a multiple of the channel count of the input format, and the output must have the same
    /// number of frames.
    pub fn convert(&self, input_data: &[f32], output: &mut (impl OutputView + ViewMeta<SampleType = f32>)) {
        let ichans = self.input_format.get_channel_count().get();
        assert_eq!(input_data.len() % ichans, 0);
        assert_eq!(output.get_channels(), 2);
        assert_eq!(output.get_frames(), input_data.len() / ichans);

        if self.input_format.is_mono() {
            mono_to_stereo(input_data, output);
        } else {
            copy(input_data, output);
        }
    }
}

#[inline(always)]
fn mono_to_stereo(input_data: &[f32], output: &mut impl OutputView<SampleType = f32>) {
    for (i, s) in input_data.iter().copied().enumerate() {
        output.write_index(i * 2, s);
        output.write_index(i * 2 + 1, s);
    }
}

#[inline(always)]
fn copy(input_data: &[f32], output: &mut impl OutputView<SampleType = f32>) {
    for (i, s) in input_data.iter().copied().enumerate() {
        output.write_index(i, s);
    }
}

/// Replace both channels of interleaved stereo with their average, in place.
///
/// This is a mixdown to mono followed by a broadcast back to stereo, without a second buffer, which is what hosts that
/// hand over one buffer for both input and output need.
pub fn stereo_to_dual_mono(data: &mut [f32]) {
    assert_eq!(data.len() % 2, 0);

    for frame in data.chunks_exact_mut(2) {
        let avg = (frame[0] + frame[1]) * 0.5f32;
        frame[0] = avg;
        frame[1] = avg;
    }
}
