//! Repetition detection.
//!
//! A small explicit state machine turns a per-frame elbow angle into a
//! movement phase and a repetition count. Hysteresis bands and a minimum
//! dwell time reject jitter; untracked frames freeze progress instead of
//! resetting it.

mod machine;
mod phase;
mod thresholds;

pub use machine::{transition, MachineState, Observation, RepStateMachine, StepOutcome};
pub use phase::Phase;
pub use thresholds::RepThresholds;
