//! Per-frame GPU execution.
//!
//! One call allocates the output-side resources, records a single command
//! encoder (upscale dispatch + copy to the readback buffer), submits it, and
//! blocks until the device signals completion. Nothing allocated here
//! outlives the processing call.

mod readback;

pub use readback::{Readback, RowLayout};

use std::sync::mpsc;

use crate::device::GpuContext;
use crate::error::{ProcessError, Result};
use crate::scaler::SpatialScaler;

/// Runs the upscale + readback path for one imported frame.
///
/// The scaled texture is device-local and storage-writable (what the
/// operator requires); its bytes are not host-addressable, so the encoder
/// also copies it into a mappable buffer, the only host-visible storage
/// class, before submission. The calling thread parks until the queue
/// drains; there is no overlap between frames.
pub fn execute(
    ctx: &GpuContext,
    scaler: &SpatialScaler,
    input: &wgpu::Texture,
) -> Result<Readback> {
    let config = scaler.config();
    let device = ctx.device();

    // Surface allocation/encoding problems as typed errors; without scopes
    // they only reach the uncaptured-error handler.
    let oom_scope = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let validation_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let extent = wgpu::Extent3d {
        width: config.output_width,
        height: config.output_height,
        depth_or_array_layers: 1,
    };

    let scaled = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("framelift scaled texture"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: config.format.texture_format(),
        usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });

    let layout = RowLayout::new(
        config.output_width,
        config.output_height,
        config.format.bytes_per_pixel(),
    );
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("framelift readback buffer"),
        size: layout.buffer_size(),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("framelift frame encoder"),
    });

    let input_view = input.create_view(&wgpu::TextureViewDescriptor::default());
    let scaled_view = scaled.create_view(&wgpu::TextureViewDescriptor::default());
    scaler.encode(ctx, &mut encoder, &input_view, &scaled_view);

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &scaled,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(layout.padded_bytes_per_row as u32),
                rows_per_image: Some(layout.rows),
            },
        },
        extent,
    );

    ctx.queue().submit(std::iter::once(encoder.finish()));

    // The single blocking point of the whole pipeline.
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|err| ProcessError::DeviceWait(err.to_string()))?;

    if let Some(err) = pollster::block_on(validation_scope.pop()) {
        return Err(ProcessError::ResourceCreation(err.to_string()));
    }
    if let Some(err) = pollster::block_on(oom_scope.pop()) {
        return Err(ProcessError::ResourceCreation(err.to_string()));
    }

    map_for_read(ctx, &buffer)?;

    Ok(Readback { buffer, layout })
}

/// Maps the readback buffer, blocking until the device delivers the result.
fn map_for_read(ctx: &GpuContext, buffer: &wgpu::Buffer) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    buffer.slice(..).map_async(wgpu::MapMode::Read, move |res| {
        let _ = tx.send(res);
    });

    ctx.device()
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|err| ProcessError::DeviceWait(err.to_string()))?;

    rx.recv()
        .map_err(|_| ProcessError::Readback("map callback dropped".into()))?
        .map_err(|err| ProcessError::Readback(err.to_string()))
}
