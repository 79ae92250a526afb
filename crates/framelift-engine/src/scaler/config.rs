use crate::error::{ProcessError, Result};
use crate::frame::PixelFormat;

/// An exact rational scale factor (numerator / denominator).
///
/// Output dimensions are derived with integer math so the truncation
/// behavior is exact: `scale(w) = ⌊w · numerator / denominator⌋`. The
/// default pipeline factor of 3/2 reproduces a ×1.5 spatial upscale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    pub numerator: u32,
    pub denominator: u32,
}

impl Ratio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        assert!(denominator > 0, "ratio denominator must be nonzero");
        Self {
            numerator,
            denominator,
        }
    }

    /// Scales `value`, truncating toward zero.
    #[inline]
    pub const fn scale(self, value: u32) -> u32 {
        (value as u64 * self.numerator as u64 / self.denominator as u64) as u32
    }

    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// Filtering space of the spatial scaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleMode {
    /// Filter the encoded (sRGB) values directly. Matches how video
    /// pipelines usually resample and is the default.
    #[default]
    Perceptual,
    /// Convert samples to linear light before filtering, re-encode after.
    Linear,
}

/// The immutable contract bound to one spatial scaler instance.
///
/// Derived once from the first observed frame dimensions; any dimension
/// change requires constructing a new scaler from a new config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalerConfig {
    pub input_width: u32,
    pub input_height: u32,
    pub output_width: u32,
    pub output_height: u32,
    pub format: PixelFormat,
    pub mode: ScaleMode,
}

impl ScalerConfig {
    /// Derives the config for the given input dimensions and factor.
    ///
    /// The scaler contract forbids shrinking: a factor that truncates either
    /// output dimension below its input is rejected.
    pub fn derive(width: u32, height: u32, factor: Ratio, mode: ScaleMode) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ProcessError::InvalidDimensions { width, height });
        }

        let output_width = factor.scale(width);
        let output_height = factor.scale(height);
        if output_width < width || output_height < height {
            return Err(ProcessError::ScalerUnavailable {
                input_width: width,
                input_height: height,
                reason: format!(
                    "factor {}/{} would shrink to {output_width}x{output_height}",
                    factor.numerator, factor.denominator
                ),
            });
        }

        Ok(Self {
            input_width: width,
            input_height: height,
            output_width,
            output_height,
            format: PixelFormat::Rgba8,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_UP: Ratio = Ratio::new(3, 2);

    // ── derivation ────────────────────────────────────────────────────

    #[test]
    fn hd_input_maps_to_full_hd() {
        let cfg = ScalerConfig::derive(1280, 720, HALF_UP, ScaleMode::Perceptual).unwrap();
        assert_eq!(cfg.output_width, 1920);
        assert_eq!(cfg.output_height, 1080);
        assert_eq!(cfg.input_width, 1280);
        assert_eq!(cfg.input_height, 720);
    }

    #[test]
    fn odd_dimensions_truncate_toward_zero() {
        let cfg = ScalerConfig::derive(641, 361, HALF_UP, ScaleMode::Perceptual).unwrap();
        // 641 · 1.5 = 961.5, 361 · 1.5 = 541.5
        assert_eq!(cfg.output_width, 961);
        assert_eq!(cfg.output_height, 541);
    }

    #[test]
    fn identity_factor_is_allowed() {
        let cfg = ScalerConfig::derive(64, 48, Ratio::new(1, 1), ScaleMode::Perceptual).unwrap();
        assert_eq!((cfg.output_width, cfg.output_height), (64, 48));
    }

    #[test]
    fn shrinking_factor_is_rejected() {
        let err = ScalerConfig::derive(64, 48, Ratio::new(1, 2), ScaleMode::Perceptual).unwrap_err();
        assert!(matches!(err, ProcessError::ScalerUnavailable { .. }));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = ScalerConfig::derive(0, 48, HALF_UP, ScaleMode::Perceptual).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidDimensions { .. }));
    }

    // ── ratio ─────────────────────────────────────────────────────────

    #[test]
    fn scale_truncates() {
        assert_eq!(HALF_UP.scale(5), 7); // 7.5 → 7
        assert_eq!(HALF_UP.scale(4), 6);
        assert_eq!(Ratio::new(2, 1).scale(31), 62);
    }

    #[test]
    fn scale_survives_large_inputs() {
        // value · numerator overflows u32 but not the u64 intermediate.
        assert_eq!(HALF_UP.scale(2_000_000_000), 3_000_000_000);
    }
}
