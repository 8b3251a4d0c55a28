use anyhow::{Context, Result};

use soundstage::angle_mapper::{correct_azimuth, correct_elevation, select_bins, wrap_azimuth};
use soundstage::datasets::DatasetPaths;
use soundstage::{Direction, Spatializer};

use crate::cli_args::*;
use crate::wav;

pub fn dispatch_command(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Render(a) => render(a),
        Command::Bins(a) => bins(a),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let mut spatializer = match &args.dataset_dir {
        Some(dir) => Spatializer::with_dataset(&DatasetPaths::in_dir(dir), args.block_size),
        None => Spatializer::from_default_location(args.block_size),
    }
    .context("Unable to set up the spatializer")?;

    let audio = wav::read_stereo(&args.input)?;
    let control = spatializer.control();
    let mut direction = Direction::new(args.direction.azimuth, args.direction.elevation);
    control.set_direction(direction);

    // Run one more super-block of silence through, or the end would still be inside the spatializer.
    let latency = spatializer.latency_frames();
    let mut buffer = audio.samples;
    buffer.resize(buffer.len() + latency * 2, 0.0);

    let block_samples = args.block_size * 2;
    let degrees_per_block = args
        .rotate
        .map(|r| r * args.block_size as f32 / audio.sample_rate as f32);

    for block in buffer.chunks_mut(block_samples) {
        spatializer.process_interleaved(block);

        if let Some(step) = degrees_per_block {
            direction.azimuth = wrap_azimuth(direction.azimuth + step);
            control.set_azimuth(direction.azimuth);
        }
    }

    wav::write_stereo(&args.output, &buffer, audio.sample_rate)?;
    log::info!(
        "Wrote {} frames to {} ({} frames of latency at the start)",
        buffer.len() / 2,
        args.output.display(),
        latency
    );

    Ok(())
}

fn bins(args: DirectionArgs) -> Result<()> {
    let direction = Direction::new(args.azimuth, args.elevation);
    let wrapped = wrap_azimuth(direction.azimuth);
    let selected = select_bins(direction);

    println!("Azimuth {} wraps to {}", args.azimuth, wrapped);
    println!("Folded azimuth: {}", correct_azimuth(wrapped));
    println!(
        "Elevation on the extended axis: {}",
        correct_elevation(args.elevation, wrapped)
    );
    println!(
        "Measured direction: azimuth bin {} ({} degrees), elevation bin {} ({} degrees)",
        selected.azimuth.index(),
        selected.azimuth.angle(),
        selected.elevation.index(),
        selected.elevation.angle()
    );

    Ok(())
}
