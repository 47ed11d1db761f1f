//! Session lifecycle.
//!
//! Ties the per-frame pipeline to session timing and produces the
//! finalized record handed to persistence.

mod clock;
mod controller;
mod feedback;
mod record;
mod replay;
mod reporter;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{FrameReport, Session, SessionStats, TickReport};
pub use feedback::{Guidance, LOW_VISIBILITY_PCT};
pub use record::{Notes, RecordError, SessionRecord, MAX_NOTES_CHARS};
pub use replay::{replay, ReplayOutcome};
pub use reporter::{MemoryReporter, ReportError, SessionReporter, TomlReporter};
pub use timer::{format_clock, format_duration, SessionTimer};
