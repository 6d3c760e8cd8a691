//! Change watcher for the capture log, built on OS-level file notifications
//! (inotify on Linux, FSEvents on macOS, ReadDirectoryChangesW on Windows).

use chrono::Local;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Failed to initialize file watcher: {0}")]
    Init(#[source] notify::Error),

    #[error("Failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Full contents of the capture log at the moment a change notification fired.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    /// Local wall-clock time of the read, `HH:MM:SS`.
    pub read_at: String,
    /// Entire file contents. Superseded by the next snapshot.
    pub contents: String,
}

/// Watches the capture log and emits a [`FileSnapshot`] per change.
///
/// The OS watch is installed on the log's parent directory (non-recursive)
/// and filtered to the log's file name, so it keeps working when the file
/// does not exist yet and when editors replace it wholesale. Every relevant
/// raw notification triggers one full-file read and one snapshot — there is
/// no deduplication, and the OS may notify more than once per logical write,
/// so consumers must tolerate redundant snapshots.
pub struct LogWatcher {
    // Dropping the watcher disables the OS watch.
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<FileSnapshot>,
}

impl LogWatcher {
    /// Start watching `path`.
    ///
    /// Snapshot reads happen on the notification thread; a failed read
    /// (file deleted mid-watch, transient permission error) logs a warning
    /// and leaves the watch active.
    pub fn start(path: &Path) -> Result<Self, WatchError> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name: OsString = path.file_name().unwrap_or_default().to_os_string();
        let read_path = path.to_path_buf();

        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) if is_write_event(&event, &file_name) => {
                    match std::fs::read_to_string(&read_path) {
                        Ok(contents) => {
                            let snapshot = FileSnapshot {
                                read_at: Local::now().format("%H:%M:%S").to_string(),
                                contents,
                            };
                            // Send fails only when the receiver is gone, i.e.
                            // the watcher itself is being torn down.
                            let _ = tx.send(snapshot);
                        }
                        Err(e) => {
                            tracing::warn!(
                                path = %read_path.display(),
                                error = %e,
                                "Failed to read capture log after change, still watching"
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "File watcher error");
                }
            },
            notify::Config::default(),
        )
        .map_err(WatchError::Init)?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Watch {
                path: dir.clone(),
                source: e,
            })?;

        tracing::debug!(dir = %dir.display(), "Watching capture log directory");

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next snapshot. Returns `None` if the notification
    /// backend has shut down.
    pub async fn next_snapshot(&mut self) -> Option<FileSnapshot> {
        self.rx.recv().await
    }
}

/// A notification is relevant if it carries a create or modify kind and
/// names the watched file. Access events are ignored.
fn is_write_event(event: &Event, file_name: &OsStr) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| p.file_name() == Some(file_name))
}
