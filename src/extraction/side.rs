//! Choosing which arm to measure.
//!
//! The per-frame rule picks whichever arm has the larger visibility sum.
//! Near a front-facing pose the sums are close and the choice can flicker
//! between arms frame to frame, so two damped policies are available.

use crate::config::ConfigError;
use crate::pose::Side;
use serde::{Deserialize, Serialize};

/// How the measured side is chosen across frames.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SidePolicy {
    /// Recompute from visibility sums on every frame.
    #[default]
    PerFrame,
    /// Keep the first side chosen for the rest of the session.
    Latched,
    /// Switch only when the other side's sum wins by more than `margin`.
    Margin {
        /// Minimum lead in summed visibility before switching.
        margin: f32,
    },
}

impl SidePolicy {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            SidePolicy::Margin { margin } if !margin.is_finite() || margin < 0.0 => {
                Err(ConfigError::SideMargin(margin))
            }
            _ => Ok(()),
        }
    }
}

/// Applies a [`SidePolicy`] to per-frame visibility sums.
#[derive(Debug, Clone, Default)]
pub struct SideSelector {
    policy: SidePolicy,
    current: Option<Side>,
}

impl SideSelector {
    /// Creates a selector with no side chosen yet.
    pub fn new(policy: SidePolicy) -> Self {
        Self {
            policy,
            current: None,
        }
    }

    /// Picks a side given the left and right visibility sums.
    ///
    /// Ties go to the right arm.
    pub fn select(&mut self, left: f32, right: f32) -> Side {
        let preferred = if left > right { Side::Left } else { Side::Right };

        let chosen = match (self.policy, self.current) {
            (SidePolicy::PerFrame, _) | (_, None) => preferred,
            (SidePolicy::Latched, Some(side)) => side,
            (SidePolicy::Margin { margin }, Some(side)) => {
                let (mine, theirs) = match side {
                    Side::Left => (left, right),
                    Side::Right => (right, left),
                };
                if theirs - mine > margin {
                    side.other()
                } else {
                    side
                }
            }
        };

        if self.current.is_some_and(|side| side != chosen) {
            tracing::debug!(side = %chosen, left, right, "Measured side switched");
        }
        self.current = Some(chosen);
        chosen
    }

    /// Side chosen on the last call, if any.
    pub fn current(&self) -> Option<Side> {
        self.current
    }

    /// Forgets the chosen side.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
