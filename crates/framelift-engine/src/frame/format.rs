/// Packed color formats a capture source may deliver.
///
/// The pipeline processes exactly one of these ([`PixelFormat::Rgba8`]);
/// everything else is rejected at the import boundary. The enum still names
/// the common alternative so a mismatch error can say what actually arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// 8-bit RGBA, row-major, 4 bytes per pixel. The processing format.
    Rgba8,
    /// 8-bit BGRA, 4 bytes per pixel. Recognized but not processed;
    /// storage writes to BGRA require a non-default device feature.
    Bgra8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }

    /// The matching wgpu texture format.
    #[inline]
    pub const fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            Self::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
            Self::Bgra8 => wgpu::TextureFormat::Bgra8Unorm,
        }
    }
}

/// Format description attached to a frame's pixel storage.
///
/// Intentionally minimal: format and dimensions only, no codec or color-space
/// metadata. Reconstructed frames get a fresh one derived from their new
/// storage rather than a copy of the input's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFormat {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageFormat {
    /// Minimum bytes one row occupies at this format.
    #[inline]
    pub const fn min_stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_formats_are_four_bytes() {
        assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Bgra8.bytes_per_pixel(), 4);
    }

    #[test]
    fn min_stride_is_width_times_bpp() {
        let fmt = ImageFormat {
            format: PixelFormat::Rgba8,
            width: 1280,
            height: 720,
        };
        assert_eq!(fmt.min_stride(), 1280 * 4);
    }
}
