//! Metrics collection and registry.

use crate::detection::Phase;
use crate::session::{Clock, Session};
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of session state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Repetitions counted.
    pub reps: u32,
    /// Current phase.
    pub phase: Phase,
    /// Visibility of the last frame, 0-100.
    pub visibility_pct: u8,
    /// Last measured angle; left untouched when `None`.
    pub angle_deg: Option<f32>,
    /// Frames processed.
    pub frames_total: u64,
    /// Frames that failed the gate or extraction.
    pub frames_untrackable: u64,
    /// Descents abandoned before the dwell time.
    pub bounces_rejected: u64,
    /// Seconds since counting started.
    pub active_secs: f64,
}

impl MetricsSnapshot {
    /// Captures the current state of a session.
    pub fn from_session<C: Clock>(session: &Session<C>) -> Self {
        let stats = session.stats();
        Self {
            reps: session.count(),
            phase: session.phase(),
            visibility_pct: stats.last_visibility_pct,
            angle_deg: stats.last_angle_deg,
            frames_total: stats.frames_total,
            frames_untrackable: stats.frames_untrackable,
            bounces_rejected: stats.bounces_rejected,
            active_secs: session.elapsed().as_secs_f64(),
        }
    }
}

/// Prometheus metrics registry for one session.
pub struct MetricsRegistry {
    registry: Registry,

    reps_total: IntCounter,
    phase: IntGauge,
    visibility_percent: IntGauge,
    elbow_angle: Gauge,

    frames_total: IntCounter,
    untrackable_frames_total: IntCounter,
    bounces_rejected_total: IntCounter,
    active_duration: Gauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all session metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let reps_total = IntCounter::new(
            "rep_engine_reps_total",
            "Repetitions counted in the current session",
        )?;
        let phase = IntGauge::new(
            "rep_engine_phase",
            "Current phase (0=setup, 1=waiting, 2=down, 3=holding, 4=up)",
        )?;
        let visibility_percent = IntGauge::new(
            "rep_engine_visibility_percent",
            "Mean landmark visibility of the last frame",
        )?;
        let elbow_angle = Gauge::new(
            "rep_engine_elbow_angle_degrees",
            "Last measured elbow angle",
        )?;
        let frames_total =
            IntCounter::new("rep_engine_frames_total", "Total frames processed")?;
        let untrackable_frames_total = IntCounter::new(
            "rep_engine_untrackable_frames_total",
            "Frames that failed the visibility gate or angle extraction",
        )?;
        let bounces_rejected_total = IntCounter::new(
            "rep_engine_bounces_rejected_total",
            "Descents abandoned before the minimum hold time",
        )?;
        let active_duration = Gauge::new(
            "rep_engine_active_duration_seconds",
            "Time since counting started",
        )?;

        registry.register(Box::new(reps_total.clone()))?;
        registry.register(Box::new(phase.clone()))?;
        registry.register(Box::new(visibility_percent.clone()))?;
        registry.register(Box::new(elbow_angle.clone()))?;
        registry.register(Box::new(frames_total.clone()))?;
        registry.register(Box::new(untrackable_frames_total.clone()))?;
        registry.register(Box::new(bounces_rejected_total.clone()))?;
        registry.register(Box::new(active_duration.clone()))?;

        Ok(Self {
            registry,
            reps_total,
            phase,
            visibility_percent,
            elbow_angle,
            frames_total,
            untrackable_frames_total,
            bounces_rejected_total,
            active_duration,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.phase.set(snapshot.phase.code());
        self.visibility_percent.set(i64::from(snapshot.visibility_pct));
        if let Some(angle) = snapshot.angle_deg {
            self.elbow_angle.set(f64::from(angle));
        }
        self.active_duration.set(snapshot.active_secs);

        // Counters only move forward by the difference
        advance(&self.reps_total, u64::from(snapshot.reps));
        advance(&self.frames_total, snapshot.frames_total);
        advance(&self.untrackable_frames_total, snapshot.frames_untrackable);
        advance(&self.bounces_rejected_total, snapshot.bounces_rejected);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::pose::synthetic::frame_with_elbow_angle;
    use crate::pose::Side;
    use crate::session::ManualClock;

    #[test]
    fn test_registry_creation() {
        assert!(MetricsRegistry::new().is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        registry.update(&MetricsSnapshot {
            reps: 3,
            phase: Phase::Holding,
            visibility_pct: 88,
            angle_deg: Some(97.0),
            frames_total: 400,
            frames_untrackable: 7,
            bounces_rejected: 2,
            active_secs: 14.5,
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("rep_engine_reps_total 3"));
        assert!(output.contains("rep_engine_phase 3"));
        assert!(output.contains("rep_engine_visibility_percent 88"));
        assert!(output.contains("rep_engine_untrackable_frames_total 7"));
    }

    #[test]
    fn test_counters_never_decrease() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            reps: 5,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            reps: 2,
            ..Default::default()
        });

        assert!(registry.encode().unwrap().contains("rep_engine_reps_total 5"));
    }

    #[test]
    fn test_snapshot_from_session() {
        let clock = ManualClock::default();
        let mut session = Session::start(&EngineConfig::default(), clock.clone()).unwrap();
        clock.advance_ms(5_000);
        session.tick();
        clock.advance_ms(100);
        session.process(&frame_with_elbow_angle(110.0, Side::Right, 0.9));

        let snapshot = MetricsSnapshot::from_session(&session);
        assert_eq!(snapshot.phase, Phase::Down);
        assert_eq!(snapshot.frames_total, 1);
        assert_eq!(snapshot.visibility_pct, 90);
        assert!((snapshot.active_secs - 0.1).abs() < 1e-9);
    }
}
