//! Driving a session from a pose source.

use super::clock::Clock;
use super::controller::{FrameReport, Session, TickReport};
use crate::pose::{PoseSource, SourceError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// The source ran out of frames.
    Exhausted,
    /// `cancelled` was raised before the source ran out.
    Cancelled,
}

/// Feeds every frame of `source` through `session`.
///
/// `pace` is called with `interval` before each frame, either to advance
/// a manual clock or to sleep. Each frame is preceded by a tick, and
/// `on_frame` sees the session after the frame has been processed. The
/// session is left open: the caller finishes or cancels it depending on
/// the outcome.
pub fn replay<C, S>(
    session: &mut Session<C>,
    source: &mut S,
    interval: Duration,
    cancelled: &AtomicBool,
    mut pace: impl FnMut(Duration),
    mut on_frame: impl FnMut(&Session<C>, &TickReport, &FrameReport),
) -> Result<ReplayOutcome, SourceError>
where
    C: Clock,
    S: PoseSource,
{
    loop {
        if cancelled.load(Ordering::SeqCst) {
            return Ok(ReplayOutcome::Cancelled);
        }

        pace(interval);
        let frame = match source.capture() {
            Ok(frame) => frame,
            Err(SourceError::Exhausted) => return Ok(ReplayOutcome::Exhausted),
            Err(e) => return Err(e),
        };

        let tick = session.tick();
        let report = session.process(&frame);
        on_frame(session, &tick, &report);
    }
}
