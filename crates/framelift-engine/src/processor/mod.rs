//! The per-frame entry point.
//!
//! [`FrameProcessor`] owns every long-lived resource of the upscaling
//! pipeline (GPU context, import cache, and the spatial-scaler lifecycle)
//! and exposes one operation: feed it a timed frame, get back an upscaled
//! timed frame or an explicit skip.

use anyhow::Result;

use crate::device::{GpuContext, GpuInit, TextureImporter};
use crate::error::ProcessError;
use crate::frame::{ImageFormat, PixelFormat, TimedFrame, rebuild_frame};
use crate::pipeline;
use crate::scaler::{Ratio, ScaleMode, ScalerConfig, ScalerState, SpatialScaler};

/// Construction-time configuration. There is no runtime reconfiguration:
/// changing the factor or mode means building a new processor.
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    /// Spatial upscale factor applied to both dimensions.
    pub factor: Ratio,
    /// Filtering space of the scaler.
    pub mode: ScaleMode,
    /// GPU acquisition parameters.
    pub gpu: GpuInit,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            factor: Ratio::new(3, 2),
            mode: ScaleMode::default(),
            gpu: GpuInit::default(),
        }
    }
}

/// Synchronous frame upscaler.
///
/// Processing is strictly serialized: `process` takes `&mut self`, so at
/// most one frame is in flight per processor and no internal locking
/// exists. Callers that cannot keep pace with their capture source must
/// drop frames before calling in; the processor neither queues nor drops.
pub struct FrameProcessor {
    ctx: GpuContext,
    importer: TextureImporter,
    scaler: ScalerState<SpatialScaler>,
    factor: Ratio,
    mode: ScaleMode,
}

impl FrameProcessor {
    /// Acquires the GPU context and builds an unconfigured processor; the
    /// scaler is configured lazily from the first frame's dimensions.
    pub fn new(options: ProcessorOptions) -> Result<Self> {
        let ctx = GpuContext::new_blocking(options.gpu)?;
        Ok(Self {
            ctx,
            importer: TextureImporter::new(PixelFormat::Rgba8),
            scaler: ScalerState::new(),
            factor: options.factor,
            mode: options.mode,
        })
    }

    /// Processes one frame; `None` means "skip this frame, keep displaying
    /// the previous output". Never panics in the supported flow and never
    /// returns a partial frame; the failure reason is logged with its kind.
    pub fn process(&mut self, frame: &TimedFrame) -> Option<TimedFrame> {
        match self.try_process(frame) {
            Ok(out) => Some(out),
            Err(err) => {
                log::warn!(
                    "skipping frame at pts {:?}: {err} [{:?}]",
                    frame.pts,
                    err.kind()
                );
                None
            }
        }
    }

    /// Like [`process`](Self::process) but surfaces the typed failure, for
    /// callers and tests that need to know *why* a frame was skipped.
    pub fn try_process(&mut self, frame: &TimedFrame) -> Result<TimedFrame, ProcessError> {
        let image = frame.image.as_ref().ok_or(ProcessError::NoImage)?;

        let input = self.importer.import(&self.ctx, image)?;

        let (config, scaler) = self.scaler.ensure_ready(
            image.width(),
            image.height(),
            self.factor,
            self.mode,
            |cfg| SpatialScaler::new(&self.ctx, cfg),
        )?;

        let readback = pipeline::execute(&self.ctx, scaler, input)?;

        let format = ImageFormat {
            format: config.format,
            width: config.output_width,
            height: config.output_height,
        };
        let out = {
            let bytes = readback.mapped_bytes();
            rebuild_frame(&bytes, readback.layout().padded_bytes_per_row, format, frame)?
        };

        log::trace!(
            "upscaled {}x{} -> {}x{} at pts {:?}",
            config.input_width,
            config.input_height,
            config.output_width,
            config.output_height,
            frame.pts,
        );
        Ok(out)
    }

    /// The active scaler configuration; `None` until the first frame
    /// configures it.
    pub fn scaler_config(&self) -> Option<&ScalerConfig> {
        self.scaler.config()
    }

    /// Drops the scaler so the next frame reconfigures from its own
    /// dimensions. The corrective path for capture sessions that change
    /// dimensions mid-stream.
    pub fn reset_scaler(&mut self) {
        self.scaler.reset();
    }
}
