//! Headphone spatialization of a mono source by convolution with measured head-related impulse responses.
//!
//! The entry point is [Spatializer], which takes audio from a host in blocks of any size, convolves it a super-block
//! at a time against the left and right ear responses for the current direction, and hands it back one super-block
//! later.  The direction is set from any thread through an [AngleControl].
#[macro_use]
mod logging;

mod angle_control;
pub mod angle_mapper;
mod block_buffer;
pub mod config;
mod engine;
mod error;
mod is_audio_thread;
mod spatializer;

pub use angle_control::{AngleControl, Direction};
pub use angle_mapper::SelectedBins;
pub use block_buffer::BlockSizeError;
pub use error::{Error, Result};
pub use is_audio_thread::mark_audio_thread;
pub use spatializer::Spatializer;

pub use soundstage_datasets as datasets;
pub use soundstage_dsp as dsp;
