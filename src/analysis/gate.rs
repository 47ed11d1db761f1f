//! Visibility gate.
//!
//! Decides whether a frame's landmark confidences are good enough to
//! measure from, and reports an aggregate visibility percentage for
//! user feedback. The percentage never gates detection by itself.

use crate::config::ConfigError;
use crate::pose::{index, Frame};
use serde::{Deserialize, Serialize};

/// Visibility gate thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// A landmark counts as visible when its confidence is strictly above this.
    pub threshold: f32,
    /// Minimum visible landmarks among shoulders, elbows and wrists.
    pub min_upper_body: usize,
    /// Require at least one visible knee and one visible ankle.
    ///
    /// Rejects frames where the athlete is too close to the camera and
    /// only the arms are in view.
    pub require_lower_body: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            min_upper_body: 4,
            require_lower_body: true,
        }
    }
}

impl GateConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::GateThreshold(self.threshold));
        }
        if self.min_upper_body == 0 || self.min_upper_body > index::UPPER_BODY.len() {
            return Err(ConfigError::UpperBodyCount(self.min_upper_body));
        }
        Ok(())
    }
}

/// Outcome of gating one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateResult {
    /// Whether the frame can be measured from.
    pub trackable: bool,
    /// Mean confidence of the gated landmarks, as a percentage.
    pub visibility_pct: u8,
}

/// Frame-level visibility check. Pure; holds only its thresholds.
#[derive(Debug, Clone, Default)]
pub struct VisibilityGate {
    config: GateConfig,
}

impl VisibilityGate {
    /// Creates a gate with the given thresholds.
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Returns the active thresholds.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluates a frame. Never fails; absent landmarks read as confidence 0.
    pub fn evaluate(&self, frame: &Frame) -> GateResult {
        let visible = |idx: &usize| frame.confidence(*idx) > self.config.threshold;

        let upper_visible = index::UPPER_BODY.iter().filter(|i| visible(*i)).count();
        let lower_ok = !self.config.require_lower_body
            || (index::KNEES.iter().any(visible) && index::ANKLES.iter().any(visible));

        let trackable =
            frame.is_valid() && upper_visible >= self.config.min_upper_body && lower_ok;

        let gated = index::UPPER_BODY
            .iter()
            .chain(index::KNEES.iter())
            .chain(index::ANKLES.iter());
        let (sum, n) = gated.fold((0.0f32, 0usize), |(sum, n), &idx| {
            (sum + frame.confidence(idx), n + 1)
        });
        let visibility_pct = ((sum / n as f32) * 100.0).round().clamp(0.0, 100.0) as u8;

        tracing::trace!(
            upper_visible,
            lower_ok,
            visibility_pct,
            trackable,
            "Visibility gate"
        );

        GateResult {
            trackable,
            visibility_pct,
        }
    }
}
