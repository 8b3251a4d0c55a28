pub mod channel_conversion;
mod channel_format;
pub mod close_floats;
pub mod convolution;
pub mod views;

pub use channel_conversion::ChannelConverter;
pub use channel_format::*;
pub use views::{InputView, OutputView, ViewMeta};
