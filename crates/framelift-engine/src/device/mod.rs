//! GPU device management and texture import.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (headless; the
//!   processor never owns a surface)
//! - the texture import bridge that turns host pixel buffers into
//!   GPU textures through a reusable cache

mod context;
mod import;
mod init;

pub use context::GpuContext;
pub use import::TextureImporter;
pub use init::GpuInit;
