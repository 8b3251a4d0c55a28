//! The measured head-related impulse responses used for spatialization, and the grid of directions they were measured
//! at.
mod angles;
mod error;
mod hrir;
mod paths;

pub use angles::*;
pub use error::*;
pub use hrir::*;
pub use paths::*;
