//! Synthetic pose frames for tests, benchmarks and the demo CLI.
//!
//! Frames are laid out as a side-on push-up: the chosen arm is posed so
//! that the elbow angle equals the requested value, the other arm is
//! mirrored, and the legs are placed in a straight plank.

use super::frame::{Frame, Landmark, Side, LANDMARK_COUNT};
use super::index;

/// Upper arm and forearm length in normalized units.
const SEGMENT: f32 = 0.15;

/// Elbow position of the posed arm.
const ELBOW: (f32, f32) = (0.5, 0.5);

/// Builds a frame whose `side` elbow angle is `angle_deg` and whose
/// every landmark carries `visibility`.
pub fn frame_with_elbow_angle(angle_deg: f32, side: Side, visibility: f32) -> Frame {
    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0, visibility); LANDMARK_COUNT];
    let (shoulder, elbow, wrist) = match side {
        Side::Left => (index::LEFT_SHOULDER, index::LEFT_ELBOW, index::LEFT_WRIST),
        Side::Right => (index::RIGHT_SHOULDER, index::RIGHT_ELBOW, index::RIGHT_WRIST),
    };
    let (other_shoulder, other_elbow, other_wrist) = match side {
        Side::Left => (index::RIGHT_SHOULDER, index::RIGHT_ELBOW, index::RIGHT_WRIST),
        Side::Right => (index::LEFT_SHOULDER, index::LEFT_ELBOW, index::LEFT_WRIST),
    };

    let (s, e, w) = arm_points(angle_deg);
    landmarks[shoulder] = Landmark::new(s.0, s.1, 0.0, visibility);
    landmarks[elbow] = Landmark::new(e.0, e.1, 0.0, visibility);
    landmarks[wrist] = Landmark::new(w.0, w.1, 0.0, visibility);

    // Far arm sits slightly behind the near one.
    landmarks[other_shoulder] = Landmark::new(s.0, s.1, 0.1, visibility);
    landmarks[other_elbow] = Landmark::new(e.0, e.1, 0.1, visibility);
    landmarks[other_wrist] = Landmark::new(w.0, w.1, 0.1, visibility);

    for (i, &idx) in [index::LEFT_HIP, index::RIGHT_HIP].iter().enumerate() {
        landmarks[idx] = Landmark::new(s.0 + 0.25, s.1, i as f32 * 0.1, visibility);
    }
    for (i, &idx) in index::KNEES.iter().enumerate() {
        landmarks[idx] = Landmark::new(s.0 + 0.4, s.1 + 0.02, i as f32 * 0.1, visibility);
    }
    for (i, &idx) in index::ANKLES.iter().enumerate() {
        landmarks[idx] = Landmark::new(s.0 + 0.55, s.1 + 0.04, i as f32 * 0.1, visibility);
    }

    Frame::new(landmarks, 0)
}

/// Same as [`frame_with_elbow_angle`] with a sequence number attached.
pub fn sequenced(angle_deg: f32, side: Side, visibility: f32, sequence: u64) -> Frame {
    let frame = frame_with_elbow_angle(angle_deg, side, visibility);
    Frame::new(frame.landmarks().to_vec(), sequence)
}

/// Returns (shoulder, elbow, wrist) positions for an elbow angle.
///
/// The shoulder lies straight to the left of the elbow; the wrist is
/// rotated away from it by `angle_deg`.
pub fn arm_points(angle_deg: f32) -> ((f32, f32), (f32, f32), (f32, f32)) {
    let shoulder = (ELBOW.0 - SEGMENT, ELBOW.1);
    let theta = std::f32::consts::PI - angle_deg.to_radians();
    let wrist = (ELBOW.0 + SEGMENT * theta.cos(), ELBOW.1 + SEGMENT * theta.sin());
    (shoulder, ELBOW, wrist)
}
