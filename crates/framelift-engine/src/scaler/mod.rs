//! The hardware spatial-upscaling operator and its lifecycle.
//!
//! [`SpatialScaler`] wraps a compute pipeline that maps an input color
//! texture of fixed size to an output color texture of a larger fixed size.
//! Its [`ScalerConfig`] is immutable for the instance's lifetime; the
//! [`ScalerState`] lifecycle manager decides when an instance must be
//! (re)constructed.

mod config;
mod state;

pub use config::{Ratio, ScaleMode, ScalerConfig};
pub use state::ScalerState;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::device::GpuContext;
use crate::error::{ProcessError, Result};

/// Uniform parameter block; layout mirrors `Params` in `upscale.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ScalerParams {
    input_size: [u32; 2],
    output_size: [u32; 2],
    mode: u32,
    _pad: [u32; 3],
}

/// GPU spatial upscaler bound to one immutable [`ScalerConfig`].
///
/// Construction bakes the configuration into the pipeline's uniform block;
/// changing dimensions requires a new instance (see [`ScalerState`]).
pub struct SpatialScaler {
    config: ScalerConfig,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params: wgpu::Buffer,
}

impl SpatialScaler {
    /// Workgroup extent of the upscale dispatch; matches `@workgroup_size`
    /// in the shader.
    const WORKGROUP: u32 = 8;

    pub fn new(ctx: &GpuContext, config: ScalerConfig) -> Result<Self> {
        let max = ctx.max_texture_dimension();
        if config.output_width > max || config.output_height > max {
            return Err(ProcessError::ScalerUnavailable {
                input_width: config.input_width,
                input_height: config.input_height,
                reason: format!(
                    "output {}x{} exceeds device texture limit {max}",
                    config.output_width, config.output_height
                ),
            });
        }

        let device = ctx.device();

        // The device reports pipeline problems asynchronously; capture them
        // here so an unsupported configuration surfaces as a typed error
        // instead of a device panic.
        let validation_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("framelift upscale shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/upscale.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("framelift upscale bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: config.format.texture_format(),
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(
                            std::num::NonZeroU64::new(std::mem::size_of::<ScalerParams>() as u64)
                                .unwrap(),
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("framelift upscale pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            // Newer wgpu uses immediate constants; keep disabled for now.
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("framelift upscale pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("upscale"),
            compilation_options: Default::default(),
            cache: None,
        });

        let params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("framelift upscale params"),
            contents: bytemuck::bytes_of(&ScalerParams {
                input_size: [config.input_width, config.input_height],
                output_size: [config.output_width, config.output_height],
                mode: match config.mode {
                    ScaleMode::Perceptual => 0,
                    ScaleMode::Linear => 1,
                },
                _pad: [0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        if let Some(err) = pollster::block_on(validation_scope.pop()) {
            return Err(ProcessError::ScalerUnavailable {
                input_width: config.input_width,
                input_height: config.input_height,
                reason: err.to_string(),
            });
        }

        Ok(Self {
            config,
            pipeline,
            bind_group_layout,
            params,
        })
    }

    #[inline]
    pub fn config(&self) -> &ScalerConfig {
        &self.config
    }

    /// Encodes the upscale of `input` into `output` on the given encoder.
    ///
    /// `input` must match the config's input dimensions; `output` must be a
    /// storage-writable view with the config's output dimensions.
    pub fn encode(
        &self,
        ctx: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        input: &wgpu::TextureView,
        output: &wgpu::TextureView,
    ) {
        let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("framelift upscale bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(output),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.params.as_entire_binding(),
                },
            ],
        });

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("framelift upscale pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(
            self.config.output_width.div_ceil(Self::WORKGROUP),
            self.config.output_height.div_ceil(Self::WORKGROUP),
            1,
        );
    }
}
