//! The shared capture log: append-only writer and change watcher.
//!
//! The log file is the only resource shared between the polling pipeline and
//! the watch pipeline. [`LogAppender`] is the sole writer and never reads;
//! [`LogWatcher`] is the sole reader and never writes. There is no locking
//! between them — a snapshot is a best-effort eventually-consistent view,
//! and a notification may fire before a write is fully flushed.

mod appender;
mod watcher;

pub use appender::{AppendError, LogAppender, LogEntry};
pub use watcher::{FileSnapshot, LogWatcher, WatchError};
