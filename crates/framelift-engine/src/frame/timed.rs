use std::sync::Arc;
use std::time::Duration;

use crate::error::{ProcessError, Result};
use crate::frame::{ImageFormat, PixelFormat};

/// Validated host-visible pixel storage.
///
/// Invariants, checked at construction and relied on everywhere downstream:
/// - `width > 0` and `height > 0`
/// - `stride >= width * bytes_per_pixel`
/// - `data.len() >= stride * height`
///
/// The storage is shared (`Arc`) so frames clone cheaply; the pipeline only
/// ever reads an input buffer's bytes.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    format: PixelFormat,
    width: u32,
    height: u32,
    stride: usize,
    data: Arc<[u8]>,
}

impl PixelBuffer {
    /// Wraps existing storage with an explicit row stride.
    pub fn new(
        format: PixelFormat,
        width: u32,
        height: u32,
        stride: usize,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ProcessError::InvalidDimensions { width, height });
        }
        let min = width as usize * format.bytes_per_pixel();
        if stride < min {
            return Err(ProcessError::StrideTooSmall { stride, min });
        }
        let data = data.into();
        let need = stride * height as usize;
        if data.len() < need {
            return Err(ProcessError::BufferTooSmall {
                need,
                have: data.len(),
            });
        }
        Ok(Self {
            format,
            width,
            height,
            stride,
            data,
        })
    }

    /// Wraps storage whose rows are tightly packed (stride = width * bpp).
    pub fn tight(
        format: PixelFormat,
        width: u32,
        height: u32,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Self> {
        let stride = width as usize * format.bytes_per_pixel();
        Self::new(format, width, height, stride, data)
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes. May exceed `width * bytes_per_pixel`.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The whole underlying storage, including any row padding.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// The pixel bytes of row `y`, excluding row padding.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        let len = self.width as usize * self.format.bytes_per_pixel();
        &self.data[start..start + len]
    }

    /// Format description for this storage.
    #[inline]
    pub fn image_format(&self) -> ImageFormat {
        ImageFormat {
            format: self.format,
            width: self.width,
            height: self.height,
        }
    }
}

/// One unit of video: an optional image payload plus presentation timing.
///
/// The payload is optional because a capture source can hand over a sample
/// with no decodable image; the pipeline answers those with a skip, never a
/// crash. Timing is always present and is carried through processing
/// verbatim.
#[derive(Debug, Clone)]
pub struct TimedFrame {
    /// Host-visible pixel storage, absent when the sample carried no image.
    pub image: Option<PixelBuffer>,
    /// Presentation timestamp, relative to the capture session's epoch.
    pub pts: Duration,
    /// Display duration of this frame.
    pub duration: Duration,
}

impl TimedFrame {
    /// A frame with an image payload.
    pub fn new(image: PixelBuffer, pts: Duration, duration: Duration) -> Self {
        Self {
            image: Some(image),
            pts,
            duration,
        }
    }

    /// A frame whose sample carried no image payload.
    pub fn without_image(pts: Duration, duration: Duration) -> Self {
        Self {
            image: None,
            pts,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    fn rgba(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; width as usize * height as usize * 4]
    }

    // ── construction ──────────────────────────────────────────────────

    #[test]
    fn tight_buffer_round_trips_geometry() {
        let buf = PixelBuffer::tight(PixelFormat::Rgba8, 4, 3, rgba(4, 3)).unwrap();
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 3);
        assert_eq!(buf.stride(), 16);
        assert_eq!(buf.bytes().len(), 48);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = PixelBuffer::tight(PixelFormat::Rgba8, 0, 3, vec![]).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidDimensions { .. }));
        assert_eq!(err.kind(), FailureKind::Resource);
    }

    #[test]
    fn undersized_stride_is_rejected() {
        let err = PixelBuffer::new(PixelFormat::Rgba8, 4, 3, 8, rgba(4, 3)).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::StrideTooSmall { stride: 8, min: 16 }
        ));
    }

    #[test]
    fn short_storage_is_rejected() {
        let err = PixelBuffer::tight(PixelFormat::Rgba8, 4, 3, vec![0u8; 47]).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::BufferTooSmall { need: 48, have: 47 }
        ));
    }

    #[test]
    fn padded_stride_is_accepted_and_rows_skip_padding() {
        let mut data = vec![0u8; 20 * 2];
        data[20] = 7; // first byte of row 1
        let buf = PixelBuffer::new(PixelFormat::Rgba8, 4, 2, 20, data).unwrap();
        assert_eq!(buf.row(1).len(), 16);
        assert_eq!(buf.row(1)[0], 7);
    }

    // ── timed frames ──────────────────────────────────────────────────

    #[test]
    fn frame_without_image_keeps_timing() {
        let frame = TimedFrame::without_image(Duration::from_millis(33), Duration::from_millis(16));
        assert!(frame.image.is_none());
        assert_eq!(frame.pts, Duration::from_millis(33));
        assert_eq!(frame.duration, Duration::from_millis(16));
    }
}
