//! Engine and demo configuration.
//!
//! Every parameter has a default matching the tuned push-up setup.
//! Invalid values are programmer errors and are rejected when a
//! session is constructed, never while frames are being processed.

use crate::analysis::GateConfig;
use crate::detection::RepThresholds;
use crate::extraction::SidePolicy;
use crate::pose::SourceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a finite angle within [0, 180] degrees, got {value}")]
    AngleOutOfRange { name: &'static str, value: f32 },
    #[error("{name} must be non-negative, got {value} ms")]
    NegativeDuration { name: &'static str, value: i64 },
    #[error("{lower} ({lower_value}) must not exceed {upper} ({upper_value})")]
    HysteresisOrder {
        lower: &'static str,
        lower_value: f32,
        upper: &'static str,
        upper_value: f32,
    },
    #[error("visibility threshold must be within [0, 1], got {0}")]
    GateThreshold(f32),
    #[error("minimum visible upper-body landmarks must be 1-6, got {0}")]
    UpperBodyCount(usize),
    #[error("side switch margin must be finite and non-negative, got {0}")]
    SideMargin(f32),
    #[error("source visibility must be within [0, 1], got {0}")]
    Visibility(f32),
    #[error("jitter must be finite and non-negative, got {0}")]
    Jitter(f32),
    #[error("occlusion rate must be within [0, 1], got {0}")]
    OcclusionRate(f32),
    #[error("invalid frame rate (must be 1-120 fps), got {0}")]
    FrameRate(u32),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Everything a session needs to process frames.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Visibility gate thresholds.
    #[serde(default)]
    pub gate: GateConfig,
    /// Rep state machine thresholds.
    #[serde(default)]
    pub thresholds: RepThresholds,
    /// How the measured arm is chosen.
    #[serde(default)]
    pub side: SidePolicy,
}

impl EngineConfig {
    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gate.validate()?;
        self.thresholds.validate()?;
        self.side.validate()?;
        Ok(())
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Per-session engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Synthetic replay settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Where results go.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Demo replay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Repetitions performed by the synthetic athlete.
    pub reps: u32,
    /// Frames per second of the synthetic stream.
    pub fps: u32,
    /// Pace playback against the wall clock instead of simulated time.
    pub realtime: bool,
    /// Synthetic pose source settings.
    pub source: SourceConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            reps: 5,
            fps: 30,
            realtime: false,
            source: SourceConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::FrameRate(self.fps));
        }
        self.source.validate()
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File that finished session records are appended to.
    pub path: Option<PathBuf>,
    /// Notes attached to the session record.
    pub notes: String,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.engine.validate()?;
        config.simulation.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.engine.thresholds.down_enter, 120.0);
        assert_eq!(config.simulation.fps, 30);
        assert!(config.output.path.is_none());
    }

    #[test]
    fn test_partial_sections_parse() {
        let config = FileConfig::from_toml(
            r#"
            [engine.gate]
            threshold = 0.5

            [engine.thresholds]
            min_hold_ms = 500

            [engine.side]
            policy = "margin"
            margin = 0.3

            [simulation]
            reps = 3

            [simulation.source]
            jitter_deg = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.gate.threshold, 0.5);
        assert_eq!(config.engine.thresholds.min_hold_ms, 500);
        assert_eq!(config.engine.thresholds.up_enter, 130.0);
        assert_eq!(config.engine.side, SidePolicy::Margin { margin: 0.3 });
        assert_eq!(config.simulation.reps, 3);
        assert_eq!(config.simulation.source.jitter_deg, 2.0);
    }

    #[test]
    fn test_invalid_threshold_rejected_at_load() {
        let err = FileConfig::from_toml(
            r#"
            [engine.thresholds]
            up_enter = 200.0
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::AngleOutOfRange { name: "up_enter", .. }
        ));
    }

    #[test]
    fn test_zero_fps_invalid() {
        let config = SimulationConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FrameRate(0))));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            FileConfig::from_toml("engine = 3"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
