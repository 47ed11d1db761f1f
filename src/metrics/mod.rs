//! Prometheus metrics exporter for session monitoring.
//!
//! # Metrics Exposed
//!
//! - `rep_engine_reps_total` - Repetitions counted in the current session
//! - `rep_engine_phase` - Current phase (0=setup, 1=waiting, 2=down, 3=holding, 4=up)
//! - `rep_engine_visibility_percent` - Visibility of the last frame
//! - `rep_engine_elbow_angle_degrees` - Last measured elbow angle
//! - `rep_engine_frames_total` - Frames processed
//! - `rep_engine_untrackable_frames_total` - Frames that could not be measured
//! - `rep_engine_bounces_rejected_total` - Descents abandoned before the dwell time
//! - `rep_engine_active_duration_seconds` - Time since counting started
//!
//! # Example
//!
//! ```no_run
//! use rep_engine::metrics::{MetricsRegistry, MetricsSnapshot};
//! use rep_engine::detection::Phase;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     reps: 4,
//!     phase: Phase::Holding,
//!     visibility_pct: 92,
//!     angle_deg: Some(96.5),
//!     frames_total: 900,
//!     frames_untrackable: 12,
//!     bounces_rejected: 1,
//!     active_secs: 25.0,
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
