use crate::error::{ProcessError, Result};
use crate::frame::{PixelBuffer, PixelFormat};

use super::GpuContext;

/// Texture import bridge.
///
/// Turns a host [`PixelBuffer`] into a GPU texture the upscale operator can
/// sample. The underlying texture is cached and reused for every frame with
/// the same dimensions; it is reallocated only when the incoming dimensions
/// change, and torn down with the importer.
///
/// wgpu cannot alias host memory into a texture, so each import performs one
/// stride-aware upload through the queue into the cached texture. The frame's
/// own memory is only read, never retained.
pub struct TextureImporter {
    /// The single packed color format this bridge accepts.
    format: PixelFormat,

    /// Cached input texture, allocated lazily on first import.
    texture: Option<wgpu::Texture>,
}

impl TextureImporter {
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            texture: None,
        }
    }

    /// Imports a frame's pixels, returning the GPU texture holding them.
    ///
    /// The returned reference is valid until the next import; the pipeline
    /// consumes it within the same processing call.
    pub fn import(&mut self, ctx: &GpuContext, image: &PixelBuffer) -> Result<&wgpu::Texture> {
        if image.format() != self.format {
            return Err(ProcessError::FormatMismatch {
                expected: self.format,
                actual: image.format(),
            });
        }

        let (width, height) = (image.width(), image.height());
        let max = ctx.max_texture_dimension();
        if width > max || height > max {
            return Err(ProcessError::Import(format!(
                "input {width}x{height} exceeds device texture limit {max}"
            )));
        }

        let texture = self.ensure_texture(ctx, width, height);

        ctx.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.stride() as u32),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        Ok(texture)
    }

    fn ensure_texture(&mut self, ctx: &GpuContext, width: u32, height: u32) -> &wgpu::Texture {
        let stale = match &self.texture {
            Some(t) => t.width() != width || t.height() != height,
            None => true,
        };

        if stale {
            log::debug!("allocating input texture {width}x{height}");
            self.texture = Some(ctx.device().create_texture(&wgpu::TextureDescriptor {
                label: Some("framelift input texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: self.format.texture_format(),
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            }));
        }

        self.texture.as_ref().expect("texture allocated above")
    }
}
