//! Fixed parameters of the engine.
//!
//! The only thing configured at runtime is the host's block size (see [crate::Spatializer::set_block_size]) and where
//! the dataset comes from.  Everything else is decided by the dataset and by the latency/CPU tradeoff below.

pub use soundstage_datasets::{DATA_DIR_ENV, FILTER_LEN, LEFT_FILE_NAME, RIGHT_FILE_NAME};

/// The engine convolves super-blocks of this many host blocks at a time.
///
/// This is also the latency: output lags input by exactly one super-block.
pub const SUPER_BLOCK_MULTIPLIER: usize = 10;

/// Frames of convolution output which spill past the end of a super-block into the next one.
pub const OVERFLOW_LEN: usize = FILTER_LEN - 1;

/// Channels processed by the engine: left ear then right ear.
pub const CHANNELS: usize = 2;

/// Block sizes above this are rejected, which keeps the super-block allocation sane and its length from overflowing.
pub const MAX_BLOCK_SIZE: usize = 1 << 16;
