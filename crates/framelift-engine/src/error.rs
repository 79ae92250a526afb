//! Typed errors for the per-frame processing path.
//!
//! Library code returns [`ProcessError`] so callers and tests can assert on
//! *why* a frame was skipped. Application setup code (context acquisition)
//! uses `anyhow` instead; see [`crate::device::GpuContext::new`].

use crate::frame::PixelFormat;

/// Why a frame could not be processed.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    // ── No usable image ──────────────────────────────────────────────
    #[error("frame carries no image payload")]
    NoImage,

    #[error("pixel format mismatch: expected {expected:?}, got {actual:?}")]
    FormatMismatch {
        expected: PixelFormat,
        actual: PixelFormat,
    },

    // ── Frame/data contracts ─────────────────────────────────────────
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("row stride {stride} is smaller than {min} (width x bytes-per-pixel)")]
    StrideTooSmall { stride: usize, min: usize },

    #[error("pixel buffer too small: need {need} bytes, have {have}")]
    BufferTooSmall { need: usize, have: usize },

    // ── GPU resources ────────────────────────────────────────────────
    #[error("texture import failed: {0}")]
    Import(String),

    #[error("GPU resource creation failed: {0}")]
    ResourceCreation(String),

    #[error("GPU completion wait failed: {0}")]
    DeviceWait(String),

    #[error("readback mapping failed: {0}")]
    Readback(String),

    // ── Operator configuration ───────────────────────────────────────
    #[error("spatial scaler unavailable for {input_width}x{input_height}: {reason}")]
    ScalerUnavailable {
        input_width: u32,
        input_height: u32,
        reason: String,
    },
}

/// Coarse failure classification, stable for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Device/texture/buffer allocation or the submit/map path failed.
    Resource,
    /// The upscale operator could not be built for the requested sizes.
    OperatorConfiguration,
    /// The incoming frame had no image payload the pipeline understands.
    NoImage,
}

impl ProcessError {
    /// Maps every variant onto the three-kind failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NoImage | Self::FormatMismatch { .. } => FailureKind::NoImage,
            Self::ScalerUnavailable { .. } => FailureKind::OperatorConfiguration,
            Self::InvalidDimensions { .. }
            | Self::StrideTooSmall { .. }
            | Self::BufferTooSmall { .. }
            | Self::Import(_)
            | Self::ResourceCreation(_)
            | Self::DeviceWait(_)
            | Self::Readback(_) => FailureKind::Resource,
        }
    }
}

/// Convenience alias used throughout the engine crate.
pub type Result<T> = std::result::Result<T, ProcessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_taxonomy() {
        assert_eq!(ProcessError::NoImage.kind(), FailureKind::NoImage);
        assert_eq!(
            ProcessError::ScalerUnavailable {
                input_width: 1,
                input_height: 1,
                reason: "nope".into(),
            }
            .kind(),
            FailureKind::OperatorConfiguration
        );
        assert_eq!(
            ProcessError::ResourceCreation("oom".into()).kind(),
            FailureKind::Resource
        );
        assert_eq!(
            ProcessError::BufferTooSmall { need: 16, have: 4 }.kind(),
            FailureKind::Resource
        );
    }

    #[test]
    fn display_carries_detail() {
        let err = ProcessError::StrideTooSmall { stride: 8, min: 16 };
        let msg = err.to_string();
        assert!(msg.contains('8') && msg.contains("16"), "got: {msg}");
    }
}
