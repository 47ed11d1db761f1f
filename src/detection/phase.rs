//! Movement phases of one repetition.

use serde::{Deserialize, Serialize};

/// Phase of the repetition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Grace period before counting starts.
    #[default]
    Setup,
    /// Arms extended, waiting for a descent.
    Waiting,
    /// Below the down threshold, dwell not yet satisfied.
    Down,
    /// Bottom position confirmed.
    Holding,
    /// Back at the top; the repetition has been counted.
    Up,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 5] = [
        Phase::Setup,
        Phase::Waiting,
        Phase::Down,
        Phase::Holding,
        Phase::Up,
    ];

    /// Stable numeric code, used for metrics.
    pub fn code(self) -> i64 {
        match self {
            Phase::Setup => 0,
            Phase::Waiting => 1,
            Phase::Down => 2,
            Phase::Holding => 3,
            Phase::Up => 4,
        }
    }

    /// Lowercase name used in logs and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Waiting => "waiting",
            Phase::Down => "down",
            Phase::Holding => "holding",
            Phase::Up => "up",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
