//! Framelift engine crate.
//!
//! Upscales timed video frames through a GPU spatial-upscaling operator
//! while carrying each frame's presentation timing through untouched. The
//! entry point is [`processor::FrameProcessor`].

pub mod device;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod processor;
pub mod scaler;
pub mod source;

pub mod logging;
