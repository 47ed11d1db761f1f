//! Joint angle extraction.
//!
//! Converts a trackable frame into a single elbow angle measured on the
//! more confidently visible arm. No smoothing is applied here; the rep
//! state machine's hysteresis and dwell time absorb per-frame jitter.

mod angle;
mod side;

pub use angle::joint_angle;
pub use side::{SidePolicy, SideSelector};

use crate::pose::{index, Frame, Side};

/// One elbow angle measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    /// Elbow angle in degrees, within `[0, 180]`.
    pub angle_deg: f32,
    /// Arm the angle was measured on.
    pub side: Side,
}

/// Extracts elbow angles from frames.
#[derive(Debug, Clone, Default)]
pub struct AngleExtractor {
    selector: SideSelector,
}

impl AngleExtractor {
    /// Creates an extractor using `policy` to choose the arm.
    pub fn new(policy: SidePolicy) -> Self {
        Self {
            selector: SideSelector::new(policy),
        }
    }

    /// Measures the elbow angle of the better-visible arm.
    ///
    /// Returns `None` if the chosen arm's landmarks are missing or have
    /// no usable position, in which case the frame must be treated as
    /// untrackable for this cycle.
    pub fn extract(&mut self, frame: &Frame) -> Option<AngleSample> {
        let arm_sum = |(s, e, w): (usize, usize, usize)| {
            frame.confidence(s) + frame.confidence(e) + frame.confidence(w)
        };
        let left = arm_sum(arm(Side::Left));
        let right = arm_sum(arm(Side::Right));

        let side = self.selector.select(left, right);
        let (s, e, w) = arm(side);

        let point = |idx: usize| {
            frame
                .landmark(idx)
                .filter(|lm| lm.has_position())
                .map(|lm| (lm.x, lm.y))
        };
        let (Some(shoulder), Some(elbow), Some(wrist)) = (point(s), point(e), point(w)) else {
            tracing::debug!(%side, sequence = frame.sequence(), "Arm landmarks missing");
            return None;
        };

        let angle_deg = joint_angle(shoulder, elbow, wrist)?;
        tracing::trace!(%side, angle_deg, "Elbow angle");

        Some(AngleSample { angle_deg, side })
    }

    /// Forgets any latched side.
    pub fn reset(&mut self) {
        self.selector.reset();
    }
}

/// Shoulder, elbow and wrist indices of one arm.
fn arm(side: Side) -> (usize, usize, usize) {
    match side {
        Side::Left => (index::LEFT_SHOULDER, index::LEFT_ELBOW, index::LEFT_WRIST),
        Side::Right => (index::RIGHT_SHOULDER, index::RIGHT_ELBOW, index::RIGHT_WRIST),
    }
}
