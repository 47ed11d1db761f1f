//! Hand-off of finished sessions to persistence.

use super::SessionRecord;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Errors raised while reporting a session.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write session record: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize session record: {0}")]
    Serialize(String),
}

/// Receives finalized session records.
pub trait SessionReporter {
    /// Persists one finished record.
    fn report(&mut self, record: &SessionRecord) -> Result<(), ReportError>;
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    records: Vec<SessionRecord>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records reported so far, oldest first.
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }
}

impl SessionReporter for MemoryReporter {
    fn report(&mut self, record: &SessionRecord) -> Result<(), ReportError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Appends records to a writer as TOML `[[session]]` tables.
///
/// Successive records form a valid TOML array of tables, so a log file
/// written by this reporter can be read back as a whole.
#[derive(Debug)]
pub struct TomlReporter<W: Write> {
    writer: W,
}

#[derive(Serialize)]
struct SessionLog<'a> {
    session: [&'a SessionRecord; 1],
}

impl<W: Write> TomlReporter<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SessionReporter for TomlReporter<W> {
    fn report(&mut self, record: &SessionRecord) -> Result<(), ReportError> {
        let text = toml::to_string(&SessionLog { session: [record] })
            .map_err(|e| ReportError::Serialize(e.to_string()))?;
        writeln!(self.writer, "{text}")?;
        self.writer.flush()?;
        tracing::debug!(count = record.count(), "Session record written");
        Ok(())
    }
}
