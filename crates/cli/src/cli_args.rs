//! Definition of the Clap command line.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(about = "Place a mono recording around the listener's head, for headphones")]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Spatialize a wave file.
    Render(RenderArgs),

    /// Show which measured direction a direction maps to.
    Bins(DirectionArgs),
}

#[derive(Debug, Args)]
pub struct DirectionArgs {
    /// Degrees clockwise from straight ahead.  Any value; wraps around.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub azimuth: f32,

    /// Degrees above the ears, nominally -45 to 90.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub elevation: f32,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Mono or stereo wave file.  Stereo is mixed down to mono first.
    pub input: PathBuf,

    /// Where to write the 32-bit float stereo result.
    pub output: PathBuf,

    #[command(flatten)]
    pub direction: DirectionArgs,

    /// Frames per block, as a host would deliver them.  Latency is 10 blocks.
    #[arg(long, default_value_t = 512)]
    pub block_size: usize,

    /// Directory containing `hrir_l.txt` and `hrir_r.txt`.  Defaults to `$SOUNDSTAGE_DATA_DIR`, then the platform's
    /// data directory.
    #[arg(long)]
    pub dataset_dir: Option<PathBuf>,

    /// Turn the source around the head at this many degrees per second.
    #[arg(long, allow_negative_numbers = true)]
    pub rotate: Option<f32>,
}
