//! Per-session controller.
//!
//! A [`Session`] owns every piece of transient state for one workout:
//! the visibility gate, the angle extractor, the repetition state
//! machine and the timer. Finishing or cancelling consumes the session;
//! dropping it releases everything too, so no exit path leaks state.

use super::clock::Clock;
use super::feedback::Guidance;
use super::record::{Notes, RecordError, SessionRecord};
use super::timer::{format_clock, SessionTimer};
use crate::analysis::VisibilityGate;
use crate::config::{ConfigError, EngineConfig};
use crate::detection::{Observation, Phase, RepStateMachine, StepOutcome};
use crate::extraction::AngleExtractor;
use crate::pose::{Frame, Side};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Per-frame output for the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Phase after this frame.
    pub phase: Phase,
    /// Measured elbow angle; `None` when the frame was untrackable.
    pub angle_deg: Option<f32>,
    /// Arm the angle was measured on.
    pub side: Option<Side>,
    /// Repetitions counted so far.
    pub count: u32,
    /// Aggregate landmark visibility, 0-100.
    pub visibility_pct: u8,
    /// Whether an angle was measured on this frame.
    pub trackable: bool,
    /// This frame completed a repetition.
    pub rep_completed: bool,
    /// Cue for the athlete.
    pub guidance: Guidance,
}

/// Per-tick output for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Phase after the tick.
    pub phase: Phase,
    /// Whole seconds left before counting starts.
    pub setup_remaining_secs: u64,
    /// Whole seconds since counting started.
    pub elapsed_secs: u64,
}

impl TickReport {
    /// Clock text for the current state: setup countdown or elapsed time.
    pub fn clock_text(&self) -> String {
        if self.phase == Phase::Setup {
            format_clock(self.setup_remaining_secs)
        } else {
            format_clock(self.elapsed_secs)
        }
    }
}

/// Running totals for diagnostics and metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    /// Frames processed.
    pub frames_total: u64,
    /// Frames without a usable angle.
    pub frames_untrackable: u64,
    /// Descents abandoned before the dwell time.
    pub bounces_rejected: u64,
    /// Angle measured on the last frame.
    pub last_angle_deg: Option<f32>,
    /// Visibility of the last frame.
    pub last_visibility_pct: u8,
}

/// One workout session.
pub struct Session<C: Clock> {
    clock: C,
    gate: VisibilityGate,
    extractor: AngleExtractor,
    machine: RepStateMachine,
    timer: SessionTimer,
    /// Monotonic time at session start; all internal instants are offsets from it.
    origin: Duration,
    /// Wall time matching `origin`.
    wall_origin: DateTime<Utc>,
    stats: SessionStats,
    closed: bool,
}

impl<C: Clock> Session<C> {
    /// Starts a session in `Setup`.
    ///
    /// Invalid configuration is rejected here, before any frame is seen.
    pub fn start(config: &EngineConfig, clock: C) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "Rejected session configuration");
            return Err(e);
        }

        let origin = clock.now();
        let wall_origin = clock.wall_now();
        let machine = RepStateMachine::new(config.thresholds.clone(), Duration::ZERO)?;
        let timer = SessionTimer::new(config.thresholds.setup(), Duration::ZERO);

        tracing::info!(
            setup_ms = config.thresholds.setup_ms,
            min_hold_ms = config.thresholds.min_hold_ms,
            side_policy = ?config.side,
            "Session started"
        );

        Ok(Self {
            clock,
            gate: VisibilityGate::new(config.gate.clone()),
            extractor: AngleExtractor::new(config.side),
            machine,
            timer,
            origin,
            wall_origin,
            stats: SessionStats::default(),
            closed: false,
        })
    }

    /// Runs one frame through gate, extractor and state machine.
    pub fn process(&mut self, frame: &Frame) -> FrameReport {
        let now = self.offset();
        let gate = self.gate.evaluate(frame);
        let sample = if gate.trackable {
            self.extractor.extract(frame)
        } else {
            None
        };

        let observation = match sample {
            Some(s) => Observation::Tracked(s.angle_deg),
            None => Observation::Untracked,
        };
        let outcome = self.step(observation, now);

        self.stats.frames_total += 1;
        if sample.is_none() {
            self.stats.frames_untrackable += 1;
        }
        self.stats.last_angle_deg = sample.map(|s| s.angle_deg);
        self.stats.last_visibility_pct = gate.visibility_pct;

        let trackable = sample.is_some();
        FrameReport {
            phase: outcome.to,
            angle_deg: sample.map(|s| s.angle_deg),
            side: sample.map(|s| s.side),
            count: self.machine.count(),
            visibility_pct: gate.visibility_pct,
            trackable,
            rep_completed: outcome.rep_completed,
            guidance: Guidance::for_frame(outcome.to, trackable, gate.visibility_pct),
        }
    }

    /// Advances wall-clock driven state without a frame.
    ///
    /// Hosts call this on a fixed tick so that setup completes even when
    /// frames arrive slowly or not at all.
    pub fn tick(&mut self) -> TickReport {
        let now = self.offset();
        let outcome = self.step(Observation::Tick, now);
        TickReport {
            phase: outcome.to,
            setup_remaining_secs: self.timer.setup_remaining_secs(now),
            elapsed_secs: self.timer.elapsed_secs(now),
        }
    }

    /// Stops the session and produces its record.
    ///
    /// If counting never started, the record starts and ends at the
    /// moment of finishing.
    pub fn finish(mut self, notes: Notes) -> Result<SessionRecord, RecordError> {
        let now = self.offset();
        self.timer.stop(now);
        self.closed = true;

        let ended_at = self.wall_at(now);
        let started_at = self
            .timer
            .started_at()
            .map_or(ended_at, |start| self.wall_at(start));

        let record = SessionRecord::new(self.machine.count(), started_at, ended_at, notes)?;
        tracing::info!(
            count = record.count(),
            duration_sec = record.duration_sec(),
            frames = self.stats.frames_total,
            "Session finished"
        );
        Ok(record)
    }

    /// Abandons the session without producing a record.
    pub fn cancel(mut self) {
        let now = self.offset();
        self.timer.stop(now);
        self.closed = true;
        tracing::info!(
            count = self.machine.count(),
            phase = %self.machine.phase(),
            "Session cancelled"
        );
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Repetitions counted so far.
    pub fn count(&self) -> u32 {
        self.machine.count()
    }

    /// Active duration so far.
    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed(self.offset())
    }

    /// Whole seconds left in the setup countdown.
    pub fn setup_remaining_secs(&self) -> u64 {
        self.timer.setup_remaining_secs(self.offset())
    }

    /// Running totals, including rejected bounces.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            bounces_rejected: self.machine.bounces_rejected(),
            ..self.stats.clone()
        }
    }

    fn step(&mut self, observation: Observation, now: Duration) -> StepOutcome {
        let outcome = self.machine.step(observation, now);
        if outcome.clock_started && self.timer.start(now) {
            tracing::debug!(at_ms = now.as_millis() as u64, "Session clock started");
        }
        outcome
    }

    fn offset(&self) -> Duration {
        self.clock.now().saturating_sub(self.origin)
    }

    fn wall_at(&self, offset: Duration) -> DateTime<Utc> {
        let offset = chrono::Duration::from_std(offset).unwrap_or(chrono::Duration::zero());
        self.wall_origin + offset
    }
}

impl<C: Clock> Drop for Session<C> {
    fn drop(&mut self) {
        if !self.closed {
            let now = self.offset();
            self.timer.stop(now);
            tracing::info!(
                count = self.machine.count(),
                "Session dropped without finishing"
            );
        }
    }
}

impl<C: Clock> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.machine.phase())
            .field("count", &self.machine.count())
            .field("frames", &self.stats.frames_total)
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::RepThresholds;
    use crate::pose::synthetic::frame_with_elbow_angle;
    use crate::pose::{Landmark, LANDMARK_COUNT};
    use crate::session::ManualClock;
    use chrono::TimeZone;

    fn wall_origin() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn started() -> (Session<ManualClock>, ManualClock) {
        let clock = ManualClock::new(wall_origin());
        let session = Session::start(&EngineConfig::default(), clock.clone()).unwrap();
        (session, clock)
    }

    fn frame(angle: f32) -> Frame {
        frame_with_elbow_angle(angle, Side::Right, 0.95)
    }

    fn occluded() -> Frame {
        frame_with_elbow_angle(100.0, Side::Right, 0.1)
    }

    /// Plays angles at 100 ms intervals, advancing the clock before each frame.
    fn play(session: &mut Session<ManualClock>, clock: &ManualClock, angles: &[f32]) {
        for &angle in angles {
            clock.advance_ms(100);
            session.process(&frame(angle));
        }
    }

    const TRACE: [f32; 9] = [180.0, 178.0, 95.0, 94.0, 96.0, 95.0, 98.0, 170.0, 175.0];

    #[test]
    fn test_setup_completes_on_ticks_alone() {
        let (mut session, clock) = started();

        clock.advance_ms(2_200);
        let tick = session.tick();
        assert_eq!(tick.phase, Phase::Setup);
        assert_eq!(tick.setup_remaining_secs, 3);
        assert_eq!(tick.clock_text(), "00:03");

        clock.advance_ms(2_800);
        let tick = session.tick();
        assert_eq!(tick.phase, Phase::Waiting);
        assert_eq!(tick.elapsed_secs, 0);

        clock.advance_ms(65_000);
        assert_eq!(session.tick().clock_text(), "01:05");
    }

    #[test]
    fn test_counts_through_full_pipeline() {
        let (mut session, clock) = started();
        clock.advance_ms(5_000);
        session.tick();

        play(&mut session, &clock, &TRACE);
        assert_eq!(session.count(), 1);

        play(&mut session, &clock, &TRACE);
        assert_eq!(session.count(), 2);
        assert_eq!(session.phase(), Phase::Up);
    }

    #[test]
    fn test_frame_report_contents() {
        let (mut session, clock) = started();
        clock.advance_ms(5_000);
        session.tick();

        play(&mut session, &clock, &TRACE[..7]);
        clock.advance_ms(100);
        let report = session.process(&frame(170.0));

        assert!(report.rep_completed);
        assert!(report.trackable);
        assert_eq!(report.phase, Phase::Up);
        assert_eq!(report.count, 1);
        assert_eq!(report.side, Some(Side::Right));
        assert!((report.angle_deg.unwrap() - 170.0).abs() < 0.1);
        assert_eq!(report.visibility_pct, 95);
        assert_eq!(report.guidance, Guidance::GoodRep);
    }

    #[test]
    fn test_no_reps_during_setup() {
        let (mut session, clock) = started();

        play(&mut session, &clock, &TRACE);
        play(&mut session, &clock, &TRACE);

        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.count(), 0);
    }

    #[test]
    fn test_occlusion_does_not_reset_hold() {
        let (mut session, clock) = started();
        clock.advance_ms(5_000);
        session.tick();

        play(&mut session, &clock, &[170.0, 100.0]);
        assert_eq!(session.phase(), Phase::Down);

        for _ in 0..5 {
            clock.advance_ms(100);
            let report = session.process(&occluded());
            assert!(!report.trackable);
            assert_eq!(report.phase, Phase::Down);
            assert_eq!(report.guidance, Guidance::CantSeeYou);
        }

        play(&mut session, &clock, &[100.0, 100.0, 100.0, 100.0]);
        assert_eq!(session.phase(), Phase::Holding);

        play(&mut session, &clock, &[165.0]);
        assert_eq!(session.count(), 1);
        assert_eq!(session.stats().frames_untrackable, 5);
    }

    #[test]
    fn test_malformed_frame_is_untrackable() {
        let (mut session, clock) = started();
        clock.advance_ms(5_000);
        session.tick();

        let report = session.process(&Frame::new(
            vec![Landmark::new(0.5, 0.5, 0.0, 1.0); LANDMARK_COUNT - 1],
            1,
        ));
        assert!(!report.trackable);
        assert_eq!(report.angle_deg, None);
        assert_eq!(report.phase, Phase::Waiting);
    }

    #[test]
    fn test_finish_produces_consistent_record() {
        let (mut session, clock) = started();
        clock.advance_ms(5_000);
        session.tick();

        play(&mut session, &clock, &TRACE);
        clock.advance_ms(30_600);

        let record = session.finish(Notes::new("solid set").unwrap()).unwrap();
        assert_eq!(record.count(), 1);
        assert_eq!(
            record.started_at(),
            wall_origin() + chrono::Duration::seconds(5)
        );
        assert!(record.ended_at() >= record.started_at());
        // 0.9 s of frames plus 30.6 s idle.
        assert_eq!(record.duration_sec(), 32);
        assert_eq!(record.notes(), "solid set");
    }

    #[test]
    fn test_finish_before_counting_starts() {
        let (session, clock) = started();
        clock.advance_ms(1_000);

        let record = session.finish(Notes::default()).unwrap();
        assert_eq!(record.count(), 0);
        assert_eq!(record.duration_sec(), 0);
        assert_eq!(record.started_at(), record.ended_at());
    }

    #[test]
    fn test_invalid_config_rejected_at_start() {
        let config = EngineConfig {
            thresholds: RepThresholds {
                min_hold_ms: -10,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            Session::start(&config, ManualClock::default()),
            Err(ConfigError::NegativeDuration { .. })
        ));
    }

    #[test]
    fn test_sessions_are_independent() {
        let clock_a = ManualClock::default();
        let clock_b = ManualClock::default();
        let mut a = Session::start(&EngineConfig::default(), clock_a.clone()).unwrap();
        let mut b = Session::start(&EngineConfig::default(), clock_b.clone()).unwrap();

        clock_a.advance_ms(5_000);
        a.tick();
        play(&mut a, &clock_a, &TRACE);

        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 0);
        assert_eq!(b.tick().phase, Phase::Setup);
    }

    #[test]
    fn test_cancel_and_drop_release_session() {
        let (mut session, clock) = started();
        clock.advance_ms(5_000);
        session.tick();
        play(&mut session, &clock, &TRACE);
        session.cancel();

        let (session, _clock) = started();
        drop(session);
    }
}
