//! Boundary seams for the capture and display layers.
//!
//! The engine does not own a camera or a screen; these traits define the
//! shape of the collaborators that do. Frame delivery is pull-based and one
//! at a time, matching the processor's single-in-flight model.

use crate::frame::TimedFrame;

/// A producer of timed frames (camera session, file reader, synthesizer).
///
/// Timestamps must be monotonically non-decreasing across the frames one
/// source yields.
pub trait FrameSource {
    type Error: std::error::Error;

    /// Pulls the next frame; `Ok(None)` signals end of stream.
    fn next_frame(&mut self) -> Result<Option<TimedFrame>, Self::Error>;
}

/// A consumer of processed frames (display link, muxer, encoder feed).
pub trait FrameSink {
    /// Accepts the output of one processing cycle. `None` means "no output
    /// this cycle"; implementations keep presenting the previous frame.
    fn present(&mut self, frame: Option<TimedFrame>);
}
