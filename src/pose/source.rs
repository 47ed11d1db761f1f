//! Pose source abstraction.
//!
//! The pose estimator is an external collaborator. This trait lets the
//! engine be driven by a real estimator binding or by the synthetic
//! source used for tests and the demo CLI.

use super::synthetic;
use super::{Frame, Side};
use crate::config::ConfigError;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while pulling frames from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to configure pose source: {0}")]
    ConfigFailed(String),
    #[error("pose source not initialized")]
    NotInitialized,
    #[error("pose source exhausted")]
    Exhausted,
}

/// Trait for pose estimator front-ends.
pub trait PoseSource {
    /// Opens the source with the given configuration.
    fn open(&mut self, config: &SourceConfig) -> Result<(), SourceError>;

    /// Produces the next frame.
    fn capture(&mut self) -> Result<Frame, SourceError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Closes the source and releases resources.
    fn close(&mut self);
}

/// Configuration of the synthetic pose source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Arm that faces the camera.
    pub side: Side,
    /// Visibility reported for every landmark on clear frames.
    pub visibility: f32,
    /// Uniform angle noise amplitude in degrees.
    pub jitter_deg: f32,
    /// Probability that a frame is occluded (all visibility ~0.1).
    pub occlusion_rate: f32,
    /// RNG seed for jitter and occlusion.
    pub seed: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            side: Side::Right,
            visibility: 0.95,
            jitter_deg: 0.0,
            occlusion_rate: 0.0,
            seed: 42,
        }
    }
}

impl SourceConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.visibility) {
            return Err(ConfigError::Visibility(self.visibility));
        }
        if !self.jitter_deg.is_finite() || self.jitter_deg < 0.0 {
            return Err(ConfigError::Jitter(self.jitter_deg));
        }
        if !(0.0..=1.0).contains(&self.occlusion_rate) {
            return Err(ConfigError::OcclusionRate(self.occlusion_rate));
        }
        Ok(())
    }
}

/// Visibility assigned to occluded frames.
const OCCLUDED_VISIBILITY: f32 = 0.1;

/// Renders frames from a scripted elbow-angle trace.
#[derive(Debug)]
pub struct SyntheticPoseSource {
    trace: Vec<f32>,
    position: usize,
    config: Option<SourceConfig>,
    rng: ChaCha8Rng,
    sequence: u64,
}

impl SyntheticPoseSource {
    /// Creates a source that plays back `trace`, one angle per frame.
    pub fn new(trace: Vec<f32>) -> Self {
        Self {
            trace,
            position: 0,
            config: None,
            rng: ChaCha8Rng::seed_from_u64(0),
            sequence: 0,
        }
    }

    /// Creates a source that performs `reps` push-ups at `fps`.
    pub fn push_ups(reps: u32, fps: u32, lead_in: Duration) -> Self {
        Self::new(push_up_trace(reps, fps, lead_in))
    }

    /// Number of frames left in the trace.
    pub fn remaining(&self) -> usize {
        self.trace.len() - self.position
    }

    /// Returns a value uniformly distributed in `[0, 1)`.
    fn unit(&mut self) -> f32 {
        (self.rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

impl PoseSource for SyntheticPoseSource {
    fn open(&mut self, config: &SourceConfig) -> Result<(), SourceError> {
        config
            .validate()
            .map_err(|e| SourceError::ConfigFailed(e.to_string()))?;
        self.rng = ChaCha8Rng::seed_from_u64(config.seed);
        self.config = Some(config.clone());
        self.position = 0;
        self.sequence = 0;
        tracing::info!(frames = self.trace.len(), "Synthetic pose source opened");
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, SourceError> {
        let config = self.config.clone().ok_or(SourceError::NotInitialized)?;
        let target = *self.trace.get(self.position).ok_or(SourceError::Exhausted)?;
        self.position += 1;
        self.sequence += 1;

        let noise = (self.unit() * 2.0 - 1.0) * config.jitter_deg;
        let angle = (target + noise).clamp(0.0, 180.0);
        let visibility = if self.unit() < config.occlusion_rate {
            OCCLUDED_VISIBILITY
        } else {
            config.visibility
        };

        Ok(synthetic::sequenced(angle, config.side, visibility, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("Synthetic pose source closed");
    }
}

/// Builds an elbow-angle trace of `reps` push-ups sampled at `fps`.
///
/// Each repetition descends from 170° to 90° over 0.5 s, holds for
/// 0.5 s, rises back over 0.5 s and rests at the top for 0.5 s. The
/// trace starts with `lead_in` of straight arms.
pub fn push_up_trace(reps: u32, fps: u32, lead_in: Duration) -> Vec<f32> {
    const TOP: f32 = 170.0;
    const BOTTOM: f32 = 90.0;

    let fps = fps.max(1);
    let segment = (fps / 2).max(1) as usize;
    let lead_frames = (lead_in.as_secs_f64() * fps as f64).ceil() as usize;

    let mut trace = vec![TOP; lead_frames];
    for _ in 0..reps {
        for i in 1..=segment {
            trace.push(TOP - (TOP - BOTTOM) * i as f32 / segment as f32);
        }
        trace.extend(std::iter::repeat(BOTTOM).take(segment));
        for i in 1..=segment {
            trace.push(BOTTOM + (TOP - BOTTOM) * i as f32 / segment as f32);
        }
        trace.extend(std::iter::repeat(TOP).take(segment));
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::AngleExtractor;

    #[test]
    fn test_synthetic_source_lifecycle() {
        let mut source = SyntheticPoseSource::new(vec![170.0, 90.0]);
        assert!(!source.is_open());

        source.open(&SourceConfig::default()).unwrap();
        assert!(source.is_open());

        let frame = source.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);

        let frame2 = source.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);

        assert!(matches!(source.capture(), Err(SourceError::Exhausted)));

        source.close();
        assert!(!source.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut source = SyntheticPoseSource::new(vec![170.0]);
        assert!(matches!(
            source.capture(),
            Err(SourceError::NotInitialized)
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut source = SyntheticPoseSource::new(vec![170.0]);
        let config = SourceConfig {
            occlusion_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            source.open(&config),
            Err(SourceError::ConfigFailed(_))
        ));
    }

    #[test]
    fn test_frames_follow_trace() {
        let mut source = SyntheticPoseSource::new(vec![150.0, 100.0]);
        source.open(&SourceConfig::default()).unwrap();
        let mut extractor = AngleExtractor::default();

        let first = extractor.extract(&source.capture().unwrap()).unwrap();
        let second = extractor.extract(&source.capture().unwrap()).unwrap();

        assert!((first.angle_deg - 150.0).abs() < 0.1);
        assert!((second.angle_deg - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_jitter_is_reproducible() {
        let config = SourceConfig {
            jitter_deg: 5.0,
            seed: 7,
            ..Default::default()
        };
        let mut a = SyntheticPoseSource::new(vec![120.0; 10]);
        let mut b = SyntheticPoseSource::new(vec![120.0; 10]);
        a.open(&config).unwrap();
        b.open(&config).unwrap();

        for _ in 0..10 {
            assert_eq!(a.capture().unwrap(), b.capture().unwrap());
        }
    }

    #[test]
    fn test_push_up_trace_shape() {
        let trace = push_up_trace(2, 10, Duration::from_secs(1));
        // 10 lead-in frames, then 4 segments of 5 frames per rep.
        assert_eq!(trace.len(), 10 + 2 * 20);
        assert!(trace.iter().all(|a| (90.0..=170.0).contains(a)));
    }
}
