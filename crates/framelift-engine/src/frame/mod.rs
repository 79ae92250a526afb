//! Timed-frame data model.
//!
//! This module owns everything the pipeline knows about a frame on the host
//! side:
//! - pixel format and format descriptions
//! - validated host pixel storage ([`PixelBuffer`])
//! - the timed-frame unit itself ([`TimedFrame`])
//! - reconstruction of a timed frame from GPU readback bytes

mod format;
mod rebuild;
mod timed;

pub use format::{ImageFormat, PixelFormat};
pub use rebuild::{copy_rows, rebuild_frame};
pub use timed::{PixelBuffer, TimedFrame};
