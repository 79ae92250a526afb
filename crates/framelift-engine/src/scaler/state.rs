use crate::error::Result;

use super::{Ratio, ScaleMode, ScalerConfig};

enum State<S> {
    Uninitialized,
    Configured { config: ScalerConfig, scaler: S },
}

/// Operator lifecycle manager.
///
/// Holds the single spatial-scaler instance and the explicit state it moves
/// through: `Uninitialized` until the first frame fixes the configuration,
/// then `Configured` for the rest of the processor's life (absent an
/// explicit [`reset`](ScalerState::reset)). All transitions happen through
/// [`ensure_ready`](ScalerState::ensure_ready), never implicitly.
///
/// Generic over the operator type so the transition policy is testable
/// without a GPU; the processor instantiates it with the real scaler.
pub struct ScalerState<S> {
    inner: State<S>,
    warned_dimension_change: bool,
}

impl<S> ScalerState<S> {
    pub fn new() -> Self {
        Self {
            inner: State::Uninitialized,
            warned_dimension_change: false,
        }
    }

    /// Returns the configured scaler, constructing it on first use.
    ///
    /// While `Uninitialized`, derives the config from the observed
    /// dimensions and invokes `build`; a construction failure leaves the
    /// state `Uninitialized` so the next frame retries. Once `Configured`,
    /// the stored instance is returned unconditionally: differing observed
    /// dimensions do not rebuild it (logged once per configuration; see
    /// [`reset`](ScalerState::reset) for the explicit escape hatch).
    pub fn ensure_ready<F>(
        &mut self,
        width: u32,
        height: u32,
        factor: Ratio,
        mode: ScaleMode,
        build: F,
    ) -> Result<(&ScalerConfig, &S)>
    where
        F: FnOnce(ScalerConfig) -> Result<S>,
    {
        if let State::Uninitialized = self.inner {
            let config = ScalerConfig::derive(width, height, factor, mode)?;
            let scaler = build(config).inspect_err(|err| {
                log::warn!(
                    "spatial scaler construction failed for {width}x{height} (will retry): {err}"
                );
            })?;
            log::info!(
                "spatial scaler configured: {}x{} -> {}x{} ({:?})",
                config.input_width,
                config.input_height,
                config.output_width,
                config.output_height,
                config.mode,
            );
            self.inner = State::Configured { config, scaler };
            self.warned_dimension_change = false;
        }

        match &self.inner {
            State::Configured { config, scaler } => {
                if (config.input_width, config.input_height) != (width, height)
                    && !self.warned_dimension_change
                {
                    log::warn!(
                        "input dimensions changed ({}x{} -> {width}x{height}); \
                         scaler keeps its original configuration",
                        config.input_width,
                        config.input_height,
                    );
                    self.warned_dimension_change = true;
                }
                Ok((config, scaler))
            }
            State::Uninitialized => unreachable!("configured above or returned early"),
        }
    }

    /// The active configuration, if any.
    pub fn config(&self) -> Option<&ScalerConfig> {
        match &self.inner {
            State::Configured { config, .. } => Some(config),
            State::Uninitialized => None,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.inner, State::Configured { .. })
    }

    /// Drops the operator and returns to `Uninitialized`; the next frame
    /// re-derives the configuration from its own dimensions.
    pub fn reset(&mut self) {
        if self.is_configured() {
            log::info!("spatial scaler reset; next frame reconfigures");
        }
        self.inner = State::Uninitialized;
        self.warned_dimension_change = false;
    }
}

impl<S> Default for ScalerState<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessError;

    const FACTOR: Ratio = Ratio::new(3, 2);

    /// Fake operator recording the config it was built from.
    #[derive(Debug, PartialEq, Eq)]
    struct FakeScaler(ScalerConfig);

    // ── nominal flow ──────────────────────────────────────────────────

    #[test]
    fn configures_from_first_dimensions() {
        let mut state = ScalerState::new();
        let mut builds = 0;
        let (config, scaler) = state
            .ensure_ready(1280, 720, FACTOR, ScaleMode::Perceptual, |cfg| {
                builds += 1;
                Ok(FakeScaler(cfg))
            })
            .unwrap();
        assert_eq!((config.output_width, config.output_height), (1920, 1080));
        assert_eq!(scaler.0.input_width, 1280);
        assert_eq!(builds, 1);
    }

    #[test]
    fn second_call_with_same_dimensions_reuses_instance() {
        let mut state = ScalerState::new();
        let mut builds = 0;
        for _ in 0..2 {
            state
                .ensure_ready(640, 480, FACTOR, ScaleMode::Perceptual, |cfg| {
                    builds += 1;
                    Ok(FakeScaler(cfg))
                })
                .unwrap();
        }
        assert_eq!(builds, 1);
    }

    // ── retry policy ──────────────────────────────────────────────────

    #[test]
    fn failed_construction_stays_uninitialized_and_retries() {
        let mut state = ScalerState::new();
        let mut attempts = 0u32;

        for _ in 0..3 {
            let err = state
                .ensure_ready(640, 480, FACTOR, ScaleMode::Perceptual, |cfg| {
                    attempts += 1;
                    Err(ProcessError::ScalerUnavailable {
                        input_width: cfg.input_width,
                        input_height: cfg.input_height,
                        reason: "simulated".into(),
                    })
                })
                .unwrap_err();
            assert!(matches!(err, ProcessError::ScalerUnavailable { .. }));
            assert!(!state.is_configured());
        }
        assert_eq!(attempts, 3);

        // A later frame succeeds and finally configures.
        state
            .ensure_ready(640, 480, FACTOR, ScaleMode::Perceptual, |cfg| Ok(FakeScaler(cfg)))
            .unwrap();
        assert!(state.is_configured());
    }

    #[test]
    fn derive_error_does_not_invoke_build() {
        let mut state: ScalerState<FakeScaler> = ScalerState::new();
        let err = state
            .ensure_ready(0, 480, FACTOR, ScaleMode::Perceptual, |_| {
                panic!("build must not run for an invalid config")
            })
            .unwrap_err();
        assert!(matches!(err, ProcessError::InvalidDimensions { .. }));
    }

    // ── dimension-change blind spot ───────────────────────────────────

    #[test]
    fn dimension_change_keeps_original_configuration() {
        let mut state = ScalerState::new();
        let mut builds = 0;
        state
            .ensure_ready(1280, 720, FACTOR, ScaleMode::Perceptual, |cfg| {
                builds += 1;
                Ok(FakeScaler(cfg))
            })
            .unwrap();
        let (config, _) = state
            .ensure_ready(1920, 1080, FACTOR, ScaleMode::Perceptual, |_| {
                panic!("configured state must not rebuild")
            })
            .unwrap();
        assert_eq!(config.input_width, 1280);
        assert_eq!(builds, 1);
    }

    #[test]
    fn reset_reconfigures_from_next_frame() {
        let mut state = ScalerState::new();
        state
            .ensure_ready(1280, 720, FACTOR, ScaleMode::Perceptual, |cfg| Ok(FakeScaler(cfg)))
            .unwrap();
        state.reset();
        assert!(!state.is_configured());
        let (config, _) = state
            .ensure_ready(1920, 1080, FACTOR, ScaleMode::Perceptual, |cfg| Ok(FakeScaler(cfg)))
            .unwrap();
        assert_eq!(config.input_width, 1920);
        assert_eq!(config.output_width, 2880);
    }
}
