//! Session timing.
//!
//! Two independent clocks: the setup countdown shown while the athlete
//! gets into position, and the active duration that starts when counting
//! begins. All instants are offsets from the session origin.

use std::time::Duration;

/// Setup countdown and active duration of one session.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    setup: Duration,
    setup_started: Duration,
    active_started: Option<Duration>,
    stopped_at: Option<Duration>,
}

impl SessionTimer {
    /// Creates a timer whose setup countdown begins at `now`.
    pub fn new(setup: Duration, now: Duration) -> Self {
        Self {
            setup,
            setup_started: now,
            active_started: None,
            stopped_at: None,
        }
    }

    /// Whole seconds left in the setup countdown, rounded up.
    ///
    /// Zero once the active clock has started or the timer is stopped.
    pub fn setup_remaining_secs(&self, now: Duration) -> u64 {
        if self.active_started.is_some() || self.stopped_at.is_some() {
            return 0;
        }
        let remaining = self
            .setup
            .saturating_sub(now.saturating_sub(self.setup_started));
        remaining.as_millis().div_ceil(1000) as u64
    }

    /// Starts the active clock. Returns false if it was already started
    /// or the timer has been stopped.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.active_started.is_some() || self.stopped_at.is_some() {
            return false;
        }
        self.active_started = Some(now);
        true
    }

    /// Stops both clocks. Later calls keep the first stop time.
    pub fn stop(&mut self, now: Duration) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    /// Returns true while the active clock is running.
    pub fn is_running(&self) -> bool {
        self.active_started.is_some() && self.stopped_at.is_none()
    }

    /// When the active clock started.
    pub fn started_at(&self) -> Option<Duration> {
        self.active_started
    }

    /// Active time, frozen once stopped.
    pub fn elapsed(&self, now: Duration) -> Duration {
        match self.active_started {
            Some(start) => self.stopped_at.unwrap_or(now).saturating_sub(start),
            None => Duration::ZERO,
        }
    }

    /// Active whole seconds.
    pub fn elapsed_secs(&self, now: Duration) -> u64 {
        self.elapsed(now).as_secs()
    }
}

/// Formats seconds as `mm:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Formats seconds as `{m}m {s}s`.
pub fn format_duration(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_countdown_rounds_up() {
        let timer = SessionTimer::new(ms(5_000), Duration::ZERO);
        assert_eq!(timer.setup_remaining_secs(ms(0)), 5);
        assert_eq!(timer.setup_remaining_secs(ms(100)), 5);
        assert_eq!(timer.setup_remaining_secs(ms(1_000)), 4);
        assert_eq!(timer.setup_remaining_secs(ms(4_999)), 1);
        assert_eq!(timer.setup_remaining_secs(ms(5_000)), 0);
        assert_eq!(timer.setup_remaining_secs(ms(9_000)), 0);
    }

    #[test]
    fn test_active_clock_starts_once() {
        let mut timer = SessionTimer::new(ms(5_000), Duration::ZERO);
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(ms(4_000)), Duration::ZERO);

        assert!(timer.start(ms(5_000)));
        assert!(!timer.start(ms(7_000)));
        assert_eq!(timer.started_at(), Some(ms(5_000)));
        assert_eq!(timer.elapsed_secs(ms(8_500)), 3);
        assert_eq!(timer.setup_remaining_secs(ms(5_500)), 0);
    }

    #[test]
    fn test_stop_freezes_elapsed() {
        let mut timer = SessionTimer::new(ms(0), Duration::ZERO);
        timer.start(ms(0));
        timer.stop(ms(12_000));
        timer.stop(ms(20_000));

        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_secs(ms(60_000)), 12);
    }

    #[test]
    fn test_stopped_timer_cannot_start() {
        let mut timer = SessionTimer::new(ms(5_000), Duration::ZERO);
        timer.stop(ms(1_000));

        assert!(!timer.start(ms(5_000)));
        assert_eq!(timer.setup_remaining_secs(ms(1_500)), 0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3_600), "60:00");
        assert_eq!(format_duration(125), "2m 5s");
    }
}
