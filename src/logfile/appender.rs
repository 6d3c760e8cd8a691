use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppendError {
    #[error("Failed to append to capture log: {0}")]
    Io(#[from] std::io::Error),
}

/// One line appended to the capture log, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time of the append, `HH:MM:SS`.
    pub timestamp: String,
    /// The captured line, exactly as written after the timestamp.
    pub line: String,
}

/// Append-only writer for the capture log.
///
/// Writes one `<timestamp> <line>` record per call, creating the file on
/// first use. Never reads or truncates: existing bytes are untouched, so
/// prior contents always remain a prefix of the file.
pub struct LogAppender {
    path: PathBuf,
}

impl LogAppender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one captured line, returning the entry that was written.
    pub fn append(&self, line: &str) -> Result<LogEntry, AppendError> {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{} {}", timestamp, line)?;
        Ok(LogEntry {
            timestamp,
            line: line.to_string(),
        })
    }
}
