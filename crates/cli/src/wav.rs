//! Reading and writing wave files with hound.
use std::path::Path;

use anyhow::{Context, Result};

use soundstage::dsp::views::MutableSliceView;
use soundstage::dsp::{ChannelConverter, ChannelFormat};

/// Audio read from a file, as interleaved stereo.
pub struct StereoAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Read a wave file of any sample format and convert it to stereo.
///
/// Only mono and stereo files are accepted.
pub fn read_stereo(path: &Path) -> Result<StereoAudio> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = spec.channels as usize;
    let format = ChannelFormat::from_channel_count(channels).context("The file has no channels")?;
    let converter = ChannelConverter::new(format, ChannelFormat::Stereo)
        .with_context(|| format!("{} has {} channels; only mono and stereo are supported", path.display(), channels))?;

    // Drop a trailing partial frame, if the file has one.
    let frames = samples.len() / channels;
    let mut stereo = vec![0.0f32; frames * 2];
    converter.convert(
        &samples[..frames * channels],
        &mut MutableSliceView::<_, false>::new(&mut stereo[..], 2),
    );

    log::info!(
        "Read {} frames of {:?} audio at {} Hz from {}",
        frames,
        converter.input_format(),
        spec.sample_rate,
        path.display()
    );

    Ok(StereoAudio {
        samples: stereo,
        sample_rate: spec.sample_rate,
    })
}

pub fn write_stereo(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_format: hound::SampleFormat::Float,
        bits_per_sample: 32,
        sample_rate,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).with_context(|| format!("Unable to create {}", path.display()))?;
    for s in samples.iter().copied() {
        writer.write_sample(s)?;
    }

    // Catch any errors from hound.
    writer.finalize()?;
    Ok(())
}
