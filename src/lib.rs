//! Repetition Detection Engine
//!
//! Turns a noisy per-frame stream of body-landmark estimates into a
//! reliable count of completed exercise repetitions, a live phase signal
//! for UI feedback, and session timing.
//!
//! # Architecture
//!
//! Each frame flows strictly one way and is processed to completion
//! before the next is accepted:
//!
//! ```text
//! pose → analysis (visibility gate) → extraction (elbow angle) → detection (phase, count)
//!                                                                      ↓
//!                                               session (timer, guidance, record)
//! ```
//!
//! # Design Principles
//!
//! - **Never crash the host**: malformed or occluded frames are treated as
//!   untrackable, never as errors
//! - **Freeze, don't reset**: untrackable frames pause progress instead of
//!   erasing it
//! - **Fail early**: invalid thresholds are rejected when a session starts
//! - **No retroactive correction**: the count only ever increases
//!
//! # Example
//!
//! ```no_run
//! use rep_engine::{
//!     config::EngineConfig,
//!     pose::{PoseSource, SourceConfig, SyntheticPoseSource},
//!     session::{Notes, Session, SystemClock},
//! };
//! use std::time::Duration;
//!
//! let mut source = SyntheticPoseSource::push_ups(3, 30, Duration::from_secs(6));
//! source.open(&SourceConfig::default()).unwrap();
//!
//! let mut session = Session::start(&EngineConfig::default(), SystemClock::new()).unwrap();
//!
//! while let Ok(frame) = source.capture() {
//!     session.tick();
//!     let report = session.process(&frame);
//!     println!("{} reps, {}", report.count, report.guidance);
//! }
//!
//! let record = session.finish(Notes::new("evening set").unwrap()).unwrap();
//! println!("{} reps in {}", record.count(), record.duration_formatted());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod detection;
pub mod extraction;
pub mod metrics;
pub mod pose;
pub mod session;

// Re-export commonly used types at crate root
pub use analysis::{GateConfig, GateResult, VisibilityGate};
pub use config::{ConfigError, EngineConfig, FileConfig};
pub use detection::{Phase, RepStateMachine, RepThresholds};
pub use extraction::{AngleExtractor, AngleSample, SidePolicy};
pub use pose::{Frame, Landmark, PoseSource, Side};
pub use session::{FrameReport, Session, SessionRecord, SessionReporter};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
