//! Views over audio data which the caller owns.
//!
//! DSP code in this crate never owns the audio it processes.  Instead it reads through [InputView] and writes through
//! [OutputView], which know their channel count and frame count and are indexed with raw interleaved indices
//! (`frame * channels + channel`).  Views are only valid for the duration of one call: they borrow the caller's buffer.
mod input;
mod iter;
mod meta;
mod output;
mod structs;

pub use input::*;
pub use iter::*;
pub use meta::*;
pub use output::*;
pub use structs::*;
