//! Repetition state machine.
//!
//! The machine is a pure transition function over an explicit state
//! value, wrapped by [`RepStateMachine`] which owns the state and the
//! repetition counter for one session.
//!
//! ```text
//!  Setup ──(setup elapsed)──▶ Waiting ──(≤ down_enter)──▶ Down
//!                               ▲  ▲                       │  │
//!                               │  └──(> down_exit)────────┘  │ (held ≥ min_hold)
//!                               │                             ▼
//!                               └──(≤ up_exit)── Up ◀──(≥ up_enter, +1)── Holding
//! ```

use super::{Phase, RepThresholds};
use crate::config::ConfigError;
use std::time::Duration;

/// What the machine observed at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// A trackable frame with its elbow angle in degrees.
    Tracked(f32),
    /// A frame that failed the visibility gate or angle extraction.
    Untracked,
    /// A timer tick with no frame attached.
    Tick,
}

/// Complete mutable state of one machine.
///
/// All instants are offsets from the session's monotonic origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineState {
    /// Current phase.
    pub phase: Phase,
    /// When the setup grace period began.
    pub setup_started: Duration,
    /// When the current descent began, adjusted for occlusion pauses.
    pub down_started: Option<Duration>,
    /// When the dwell timer was frozen by an untracked frame.
    pub paused_at: Option<Duration>,
}

impl MachineState {
    /// Fresh state at session start.
    pub fn new(now: Duration) -> Self {
        Self {
            phase: Phase::Setup,
            setup_started: now,
            down_started: None,
            paused_at: None,
        }
    }
}

/// Side effects of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Phase before the step.
    pub from: Phase,
    /// Phase after the step.
    pub to: Phase,
    /// Holding → Up happened: exactly one repetition completed.
    pub rep_completed: bool,
    /// Setup → Waiting happened: the session duration clock should start.
    pub clock_started: bool,
    /// A descent was abandoned before the dwell time elapsed.
    pub bounce_rejected: bool,
}

impl StepOutcome {
    fn unchanged(phase: Phase) -> Self {
        Self {
            from: phase,
            to: phase,
            rep_completed: false,
            clock_started: false,
            bounce_rejected: false,
        }
    }

    /// Returns true if the phase changed.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Computes the next state. Performs at most one phase change.
pub fn transition(
    state: &MachineState,
    observation: Observation,
    now: Duration,
    thresholds: &RepThresholds,
) -> (MachineState, StepOutcome) {
    let observation = match observation {
        Observation::Tracked(angle) if !angle.is_finite() => Observation::Untracked,
        other => other,
    };

    let mut next = *state;
    let mut outcome = StepOutcome::unchanged(state.phase);

    match (state.phase, observation) {
        // Wall-clock driven: frames of any kind only advance time.
        (Phase::Setup, _) => {
            if now.saturating_sub(state.setup_started) >= thresholds.setup() {
                next.phase = Phase::Waiting;
                outcome.clock_started = true;
            }
        }
        (_, Observation::Tick) => {}
        (Phase::Down, Observation::Untracked) => {
            if next.paused_at.is_none() {
                next.paused_at = Some(now);
            }
        }
        (_, Observation::Untracked) => {}
        (Phase::Waiting, Observation::Tracked(angle)) => {
            if angle <= thresholds.down_enter {
                next.phase = Phase::Down;
                next.down_started = Some(now);
                next.paused_at = None;
            }
        }
        (Phase::Down, Observation::Tracked(angle)) => {
            let mut started = state.down_started.unwrap_or(now);
            if let Some(paused) = state.paused_at {
                started += now.saturating_sub(paused);
            }
            next.down_started = Some(started);
            next.paused_at = None;

            let held = now.saturating_sub(started);
            if angle > thresholds.down_exit {
                next.phase = Phase::Waiting;
                next.down_started = None;
                outcome.bounce_rejected = held < thresholds.min_hold();
            } else if held >= thresholds.min_hold() {
                next.phase = Phase::Holding;
                next.down_started = None;
            }
        }
        (Phase::Holding, Observation::Tracked(angle)) => {
            if angle >= thresholds.up_enter {
                next.phase = Phase::Up;
                outcome.rep_completed = true;
            }
        }
        (Phase::Up, Observation::Tracked(angle)) => {
            if angle <= thresholds.up_exit {
                next.phase = Phase::Waiting;
            }
        }
    }

    outcome.to = next.phase;
    (next, outcome)
}

/// Owns one session's phase, dwell timers and repetition count.
#[derive(Debug, Clone)]
pub struct RepStateMachine {
    thresholds: RepThresholds,
    state: MachineState,
    count: u32,
    bounces_rejected: u64,
}

impl RepStateMachine {
    /// Creates a machine in `Setup`, starting its grace period at `now`.
    ///
    /// Fails if the thresholds are invalid.
    pub fn new(thresholds: RepThresholds, now: Duration) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            state: MachineState::new(now),
            count: 0,
            bounces_rejected: 0,
        })
    }

    /// Feeds one observation at time `now`.
    pub fn step(&mut self, observation: Observation, now: Duration) -> StepOutcome {
        let (next, outcome) = transition(&self.state, observation, now, &self.thresholds);
        self.state = next;

        if outcome.changed() {
            tracing::debug!(from = %outcome.from, to = %outcome.to, ?observation, "Phase transition");
        }
        if outcome.clock_started {
            tracing::info!("Setup complete, counting started");
        }
        if outcome.bounce_rejected {
            self.bounces_rejected += 1;
            tracing::debug!(total = self.bounces_rejected, "Descent rejected before dwell time");
        }
        if outcome.rep_completed {
            self.count = self.count.saturating_add(1);
            tracing::info!(count = self.count, "Repetition counted");
        }

        outcome
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Repetitions counted so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Descents abandoned before the dwell time elapsed.
    pub fn bounces_rejected(&self) -> u64 {
        self.bounces_rejected
    }

    /// Full internal state.
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Active thresholds.
    pub fn thresholds(&self) -> &RepThresholds {
        &self.thresholds
    }
}
