//! Frame reconstruction from GPU readback bytes.
//!
//! GPU texture-to-buffer copies pad every row to the device copy alignment,
//! so the mapped bytes and the output frame have different strides. The
//! reconstructor copies row by row, respecting both, and attaches the
//! original frame's timing to the fresh storage.

use crate::error::{ProcessError, Result};
use crate::frame::{ImageFormat, PixelBuffer, TimedFrame};

/// Copies `rows` rows of `row_len` bytes out of a source whose rows start
/// every `src_stride` bytes, producing tightly packed storage.
///
/// `src_stride >= row_len` must hold; the source must cover the final row.
pub fn copy_rows(src: &[u8], src_stride: usize, row_len: usize, rows: u32) -> Result<Vec<u8>> {
    debug_assert!(src_stride >= row_len);
    let need = match rows {
        0 => 0,
        n => src_stride * (n as usize - 1) + row_len,
    };
    if src.len() < need {
        return Err(ProcessError::BufferTooSmall {
            need,
            have: src.len(),
        });
    }

    let mut out = vec![0u8; row_len * rows as usize];
    for y in 0..rows as usize {
        let s = y * src_stride;
        out[y * row_len..(y + 1) * row_len].copy_from_slice(&src[s..s + row_len]);
    }
    Ok(out)
}

/// Builds a new timed frame from readback bytes.
///
/// `src` is the mapped readback storage with rows every `src_stride` bytes;
/// `format` describes the processed image. The result owns new tight-stride
/// storage, a fresh format description, and the `original` frame's
/// presentation timing; nothing else is carried over.
pub fn rebuild_frame(
    src: &[u8],
    src_stride: usize,
    format: ImageFormat,
    original: &TimedFrame,
) -> Result<TimedFrame> {
    let row_len = format.min_stride();
    let pixels = copy_rows(src, src_stride, row_len, format.height)?;
    let image = PixelBuffer::tight(format.format, format.width, format.height, pixels)?;
    Ok(TimedFrame::new(image, original.pts, original.duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;
    use std::time::Duration;

    // ── copy_rows ─────────────────────────────────────────────────────

    #[test]
    fn unpads_rows() {
        // 2 rows of 4 bytes, padded to stride 8.
        let src = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0];
        let out = copy_rows(&src, 8, 4, 2).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn accepts_source_without_trailing_row_padding() {
        // Last row may end exactly at row_len, short of a full stride.
        let src = [1, 2, 0, 0, 3, 4];
        let out = copy_rows(&src, 4, 2, 2).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn short_source_is_rejected() {
        let src = [0u8; 7];
        let err = copy_rows(&src, 8, 4, 2).unwrap_err();
        assert!(matches!(err, ProcessError::BufferTooSmall { need: 12, .. }));
    }

    #[test]
    fn equal_strides_copy_verbatim() {
        let src = [9u8; 12];
        let out = copy_rows(&src, 4, 4, 3).unwrap();
        assert_eq!(out, src.to_vec());
    }

    // ── rebuild_frame ─────────────────────────────────────────────────

    #[test]
    fn rebuilt_frame_preserves_timing_and_derives_format() {
        let original = TimedFrame::without_image(Duration::from_millis(100), Duration::from_millis(33));
        let format = ImageFormat {
            format: PixelFormat::Rgba8,
            width: 2,
            height: 2,
        };
        // 2x2 RGBA rows padded to 16 bytes.
        let mut src = vec![0u8; 16 * 2];
        src[0] = 0xAA;
        src[16] = 0xBB;

        let out = rebuild_frame(&src, 16, format, &original).unwrap();
        assert_eq!(out.pts, original.pts);
        assert_eq!(out.duration, original.duration);

        let image = out.image.expect("rebuilt frame has an image");
        assert_eq!(image.image_format(), format);
        assert_eq!(image.stride(), 8);
        assert_eq!(image.row(0)[0], 0xAA);
        assert_eq!(image.row(1)[0], 0xBB);
    }
}
