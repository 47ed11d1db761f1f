//! Landmark frame types produced by the pose estimator.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a well-formed pose frame.
pub const LANDMARK_COUNT: usize = 33;

/// A single tracked body keypoint.
///
/// Coordinates are normalized to roughly `[0, 1]` image space;
/// `visibility` is the estimator's confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal image position.
    pub x: f32,
    /// Vertical image position, growing downwards.
    pub y: f32,
    /// Depth relative to the hips; unused by the engine.
    pub z: f32,
    /// Estimator confidence.
    pub visibility: f32,
}

impl Landmark {
    /// Creates a landmark.
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Confidence clamped to `[0, 1]`, with non-finite values read as 0.
    #[inline]
    pub fn confidence(&self) -> f32 {
        if self.visibility.is_finite() {
            self.visibility.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Returns true if the 2D position can be used for geometry.
    #[inline]
    pub fn has_position(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Body side of a bilateral landmark group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The athlete's left side.
    Left,
    /// The athlete's right side.
    Right,
}

impl Side {
    /// Returns the opposite side.
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// One inference cycle's worth of landmarks.
///
/// Frames are ephemeral: the engine reads them once and never retains
/// them. A frame whose landmark count is not [`LANDMARK_COUNT`] is
/// malformed; lookups still work and missing entries read as absent.
#[derive(Clone, PartialEq)]
pub struct Frame {
    landmarks: Vec<Landmark>,
    /// Monotonic sequence number assigned by the source.
    sequence: u64,
}

impl Frame {
    /// Creates a frame from estimator output.
    pub fn new(landmarks: Vec<Landmark>, sequence: u64) -> Self {
        Self {
            landmarks,
            sequence,
        }
    }

    /// Returns the landmark at `index`, or `None` if absent.
    #[inline]
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Confidence of the landmark at `index`; absent landmarks read as 0.
    #[inline]
    pub fn confidence(&self, index: usize) -> f32 {
        self.landmark(index).map_or(0.0, Landmark::confidence)
    }

    /// Returns all landmarks.
    #[inline]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Validates that the frame has the expected landmark count.
    pub fn is_valid(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("sequence", &self.sequence)
            .field("landmarks", &self.landmarks.len())
            .finish()
    }
}
