//! Guidance shown to the athlete on every frame.

use crate::detection::Phase;
use serde::{Deserialize, Serialize};

/// Below this visibility an untrackable frame means the athlete is
/// mostly out of view rather than just cropped.
pub const LOW_VISIBILITY_PCT: u8 = 50;

/// Cue displayed for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Guidance {
    /// Too few landmarks detected with confidence.
    CantSeeYou,
    /// Landmarks seen but the pose is only partly in frame.
    MoveIntoView,
    /// Setup countdown running.
    GetReady,
    /// Waiting for a descent.
    GoDown,
    /// Descending; dwell not yet satisfied.
    Hold,
    /// Bottom confirmed.
    PushUp,
    /// Repetition just counted.
    GoodRep,
}

impl Guidance {
    /// Derives the cue from the frame's phase and visibility.
    pub fn for_frame(phase: Phase, trackable: bool, visibility_pct: u8) -> Self {
        if !trackable {
            return if visibility_pct < LOW_VISIBILITY_PCT {
                Guidance::CantSeeYou
            } else {
                Guidance::MoveIntoView
            };
        }
        match phase {
            Phase::Setup => Guidance::GetReady,
            Phase::Waiting => Guidance::GoDown,
            Phase::Down => Guidance::Hold,
            Phase::Holding => Guidance::PushUp,
            Phase::Up => Guidance::GoodRep,
        }
    }

    /// Text shown to the athlete.
    pub fn text(self) -> &'static str {
        match self {
            Guidance::CantSeeYou => "Can't see you clearly",
            Guidance::MoveIntoView => "Move back so your whole body is in view",
            Guidance::GetReady => "Get into position",
            Guidance::GoDown => "Lower your chest",
            Guidance::Hold => "Hold it...",
            Guidance::PushUp => "Push up!",
            Guidance::GoodRep => "Good rep!",
        }
    }
}

impl std::fmt::Display for Guidance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untrackable_overrides_phase() {
        for phase in Phase::ALL {
            assert_eq!(Guidance::for_frame(phase, false, 10), Guidance::CantSeeYou);
            assert_eq!(Guidance::for_frame(phase, false, 80), Guidance::MoveIntoView);
        }
    }

    #[test]
    fn test_phase_cues() {
        assert_eq!(Guidance::for_frame(Phase::Setup, true, 95), Guidance::GetReady);
        assert_eq!(Guidance::for_frame(Phase::Holding, true, 95), Guidance::PushUp);
        assert_eq!(Guidance::for_frame(Phase::Up, true, 95).text(), "Good rep!");
    }

    #[test]
    fn test_boundary_visibility() {
        assert_eq!(
            Guidance::for_frame(Phase::Waiting, false, LOW_VISIBILITY_PCT),
            Guidance::MoveIntoView
        );
    }
}
