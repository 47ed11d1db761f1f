//! Finalized session records.
//!
//! A record is created once, when a session finishes, and handed to a
//! [`SessionReporter`](super::SessionReporter). It cannot be modified
//! afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of session notes, in characters.
pub const MAX_NOTES_CHARS: usize = 500;

/// Record validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("notes cannot exceed {MAX_NOTES_CHARS} characters (got {0})")]
    NotesTooLong(usize),
    #[error("session ended at {ended} before it started at {started}")]
    EndBeforeStart {
        started: DateTime<Utc>,
        ended: DateTime<Utc>,
    },
}

/// Free-text session notes: trimmed, at most [`MAX_NOTES_CHARS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Notes(String);

impl Notes {
    /// Trims and validates `text`.
    pub fn new(text: &str) -> Result<Self, RecordError> {
        let trimmed = text.trim();
        let chars = trimmed.chars().count();
        if chars > MAX_NOTES_CHARS {
            return Err(RecordError::NotesTooLong(chars));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the note text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Notes {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Notes::new(&value)
    }
}

impl From<Notes> for String {
    fn from(notes: Notes) -> Self {
        notes.0
    }
}

/// Outcome of one finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    count: u32,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    duration_sec: u64,
    notes: Notes,
}

impl SessionRecord {
    /// Creates a record, deriving the duration from the two timestamps.
    pub fn new(
        count: u32,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        notes: Notes,
    ) -> Result<Self, RecordError> {
        if ended_at < started_at {
            return Err(RecordError::EndBeforeStart {
                started: started_at,
                ended: ended_at,
            });
        }
        let millis = (ended_at - started_at).num_milliseconds().max(0) as u64;

        Ok(Self {
            count,
            started_at,
            ended_at,
            duration_sec: (millis + 500) / 1000,
            notes,
        })
    }

    /// Repetitions completed.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// When counting started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the session finished.
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    /// Whole seconds between start and end, rounded to nearest.
    pub fn duration_sec(&self) -> u64 {
        self.duration_sec
    }

    /// Session notes.
    pub fn notes(&self) -> &str {
        self.notes.as_str()
    }

    /// Duration as `{m}m {s}s`.
    pub fn duration_formatted(&self) -> String {
        super::timer::format_duration(self.duration_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64, millis: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap() + Duration::milliseconds(millis)
    }

    #[test]
    fn test_duration_is_rounded() {
        let record = SessionRecord::new(12, at(0, 0), at(95, 499), Notes::default()).unwrap();
        assert_eq!(record.duration_sec(), 95);

        let record = SessionRecord::new(12, at(0, 0), at(95, 500), Notes::default()).unwrap();
        assert_eq!(record.duration_sec(), 96);
        assert_eq!(record.duration_formatted(), "1m 36s");
    }

    #[test]
    fn test_zero_length_session() {
        let record = SessionRecord::new(0, at(10, 0), at(10, 0), Notes::default()).unwrap();
        assert_eq!(record.duration_sec(), 0);
    }

    #[test]
    fn test_end_before_start_rejected() {
        assert!(matches!(
            SessionRecord::new(1, at(10, 0), at(5, 0), Notes::default()),
            Err(RecordError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_notes_are_trimmed_and_bounded() {
        assert_eq!(Notes::new("  felt strong \n").unwrap().as_str(), "felt strong");
        assert!(Notes::new(&"x".repeat(MAX_NOTES_CHARS)).is_ok());
        assert_eq!(
            Notes::new(&"x".repeat(MAX_NOTES_CHARS + 1)),
            Err(RecordError::NotesTooLong(MAX_NOTES_CHARS + 1))
        );
        // Counted in characters, not bytes.
        assert!(Notes::new(&"é".repeat(MAX_NOTES_CHARS)).is_ok());
    }

    #[test]
    fn test_serializes_camel_case_rfc3339() {
        let record =
            SessionRecord::new(3, at(0, 0), at(61, 0), Notes::new("ok").unwrap()).unwrap();
        let text = toml::to_string(&record).unwrap();

        assert!(text.contains("count = 3"));
        assert!(text.contains("durationSec = 61"));
        assert!(text.contains("startedAt = \"2023-11-14T22:13:20Z\""));
        assert!(text.contains("notes = \"ok\""));

        let parsed: SessionRecord = toml::from_str(&text).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_deserializing_long_notes_fails() {
        let text = format!(
            "count = 1\nstartedAt = \"2023-11-14T22:13:20Z\"\nendedAt = \"2023-11-14T22:13:20Z\"\ndurationSec = 0\nnotes = \"{}\"\n",
            "x".repeat(MAX_NOTES_CHARS + 1)
        );
        assert!(toml::from_str::<SessionRecord>(&text).is_err());
    }
}
