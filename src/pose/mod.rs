//! Pose input and frame handling.
//!
//! This module provides the landmark and frame types consumed by the
//! engine, plus an abstraction over the external pose estimator. The
//! estimator itself is never implemented here; it is treated as a
//! black-box source of landmark frames.

mod frame;
mod source;
pub mod synthetic;

pub use frame::{Frame, Landmark, Side, LANDMARK_COUNT};
pub use source::{push_up_trace, PoseSource, SourceConfig, SourceError, SyntheticPoseSource};

/// MediaPipe Pose landmark indices used by the engine.
#[allow(missing_docs)]
pub mod index {
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;

    /// Shoulders, elbows and wrists of both arms.
    pub const UPPER_BODY: [usize; 6] = [
        LEFT_SHOULDER,
        RIGHT_SHOULDER,
        LEFT_ELBOW,
        RIGHT_ELBOW,
        LEFT_WRIST,
        RIGHT_WRIST,
    ];

    pub const KNEES: [usize; 2] = [LEFT_KNEE, RIGHT_KNEE];
    pub const ANKLES: [usize; 2] = [LEFT_ANKLE, RIGHT_ANKLE];
}
