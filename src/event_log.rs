use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::SessionError;

/// Semantic kind of a logged event. Serialized names are part of the log
/// format consumed by downstream analysis and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum EventKind {
    #[strum(serialize = "keyPressed")]
    #[serde(rename = "keyPressed")]
    KeyPressed,
    #[strum(serialize = "wordTyped")]
    #[serde(rename = "wordTyped")]
    WordTyped,
    #[strum(serialize = "sentenceTyped")]
    #[serde(rename = "sentenceTyped")]
    SentenceTyped,
    #[strum(serialize = "testFinished")]
    #[serde(rename = "testFinished")]
    TestFinished,
}

/// One immutable entry in the session's event log.
///
/// Field renames pin the tabular header to `id,event,time(ms),content,mode`,
/// the format of the original study tooling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    #[serde(rename = "id")]
    pub participant_id: String,
    pub event: EventKind,
    #[serde(rename = "time(ms)")]
    pub elapsed_ms: u64,
    pub content: String,
    pub mode: u8,
}

/// Destination for the finished log. Invoked exactly once, at finalize.
pub trait LogSink {
    fn persist(&mut self, records: &[LogRecord]) -> Result<(), SessionError>;
}

/// Writes the log as a CSV file named from technique mode and participant id.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(mode: u8, participant_id: &str) -> Self {
        Self {
            path: PathBuf::from(format!("result_{}_{}.csv", mode, participant_id)),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for CsvSink {
    fn persist(&mut self, records: &[LogRecord]) -> Result<(), SessionError> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Discards the log; used when persistence is disabled.
#[derive(Debug, Default, Clone)]
pub struct NullSink;

impl LogSink for NullSink {
    fn persist(&mut self, _records: &[LogRecord]) -> Result<(), SessionError> {
        Ok(())
    }
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<LogRecord>,
    pub persist_calls: usize,
}

impl LogSink for MemorySink {
    fn persist(&mut self, records: &[LogRecord]) -> Result<(), SessionError> {
        self.records = records.to_vec();
        self.persist_calls += 1;
        Ok(())
    }
}

/// Append-only, strictly ordered event log for one session.
#[derive(Debug)]
pub struct EventLogger {
    participant_id: String,
    mode: u8,
    records: Vec<LogRecord>,
    closed: bool,
}

impl EventLogger {
    pub fn new(participant_id: String, mode: u8) -> Self {
        Self {
            participant_id,
            mode,
            records: Vec::new(),
            closed: false,
        }
    }

    /// Appends a record in arrival order. Never reorders or deduplicates.
    pub fn record(
        &mut self,
        event: EventKind,
        elapsed_ms: u64,
        content: String,
    ) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::LoggerClosed);
        }
        self.records.push(LogRecord {
            participant_id: self.participant_id.clone(),
            event,
            elapsed_ms,
            content,
            mode: self.mode,
        });
        Ok(())
    }

    /// Hands the accumulated log to the sink and closes the logger.
    pub fn finalize(&mut self, sink: &mut dyn LogSink) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::LoggerClosed);
        }
        self.closed = true;
        sink.persist(&self.records)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }
}
