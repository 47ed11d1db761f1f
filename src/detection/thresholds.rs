//! Hysteresis thresholds and timing for the repetition state machine.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Angle thresholds (degrees) and timings (milliseconds).
///
/// The down band (`down_enter` / `down_exit`) and the up band
/// (`up_exit` / `up_enter`) are separate so that noise around a single
/// boundary cannot toggle the phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepThresholds {
    /// Waiting → Down when the angle is at or below this.
    pub down_enter: f32,
    /// Down is abandoned when the angle rises above this.
    pub down_exit: f32,
    /// Holding → Up (and a counted rep) at or above this.
    pub up_enter: f32,
    /// Up → Waiting at or below this.
    pub up_exit: f32,
    /// Minimum time below `down_exit` before a descent counts as a hold.
    pub min_hold_ms: i64,
    /// Grace period before counting begins.
    pub setup_ms: i64,
}

impl Default for RepThresholds {
    fn default() -> Self {
        Self {
            down_enter: 120.0,
            down_exit: 125.0,
            up_enter: 130.0,
            up_exit: 125.0,
            min_hold_ms: 300,
            setup_ms: 5000,
        }
    }
}

impl RepThresholds {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("down_enter", self.down_enter),
            ("down_exit", self.down_exit),
            ("up_enter", self.up_enter),
            ("up_exit", self.up_exit),
        ] {
            if !value.is_finite() || !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::AngleOutOfRange { name, value });
            }
        }

        for (name, value) in [("min_hold_ms", self.min_hold_ms), ("setup_ms", self.setup_ms)] {
            if value < 0 {
                return Err(ConfigError::NegativeDuration { name, value });
            }
        }

        for (lower, lower_value, upper, upper_value) in [
            ("down_enter", self.down_enter, "down_exit", self.down_exit),
            ("up_exit", self.up_exit, "up_enter", self.up_enter),
            ("down_exit", self.down_exit, "up_enter", self.up_enter),
        ] {
            if lower_value > upper_value {
                return Err(ConfigError::HysteresisOrder {
                    lower,
                    lower_value,
                    upper,
                    upper_value,
                });
            }
        }

        Ok(())
    }

    /// Minimum hold as a duration. Negative values clamp to zero.
    pub fn min_hold(&self) -> Duration {
        Duration::from_millis(self.min_hold_ms.max(0) as u64)
    }

    /// Setup grace period as a duration. Negative values clamp to zero.
    pub fn setup(&self) -> Duration {
        Duration::from_millis(self.setup_ms.max(0) as u64)
    }
}
