//! Orchestrator: wires the polling pipeline into the capture log and the
//! file watcher into the console reporter, then runs both until a stop
//! signal arrives.
//!
//! The two pipelines share nothing in-process — the appender writes the log,
//! the watcher reads it, and the only coupling is the file itself. Our own
//! appends therefore surface as watch notifications like any external write
//! would; that feedback is intended, not a loop to be suppressed.

use crate::config::Config;
use crate::logfile::{FileSnapshot, LogAppender, LogWatcher};
use crate::poller::{spawn_pollers, CapturedLine};
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Capacity of the captured-line channel. Consumers (one file append plus
/// one stdout line) are fast relative to a multi-second polling interval,
/// so this only needs to absorb multi-line extraction bursts.
const LINE_CHANNEL_CAPACITY: usize = 64;

/// Run the application until a stop signal.
///
/// Lifecycle: construction here is the idle state; once the pollers are
/// spawned and the watcher installed, both pipelines run concurrently with
/// no synchronization barrier between them; a SIGINT/SIGTERM (ctrl-c on
/// non-unix) transitions to stopped — poll tasks are torn down and dropping
/// the watcher disables the OS watch. Returns `Ok(())` on a normal stop
/// regardless of how many appends or snapshots occurred.
pub async fn run(config: Config) -> Result<()> {
    if let Some(dir) = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| {
            format!("Failed to create log directory '{}'", dir.display())
        })?;
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("linklog/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let appender = LogAppender::new(&config.log_file);
    let mut watcher =
        LogWatcher::start(&config.log_file).context("Failed to start capture log watcher")?;

    let (line_tx, mut line_rx) = mpsc::channel::<CapturedLine>(LINE_CHANNEL_CAPACITY);
    let interval = Duration::from_secs(config.poll_interval_secs);
    let poll_handles = spawn_pollers(client, &config.endpoints, interval, line_tx);

    println!(
        "Polling {} endpoint(s) every {}s, capturing to {} (Ctrl-C to stop)",
        config.endpoints.len(),
        config.poll_interval_secs,
        config.log_file.display()
    );

    // Signal handlers for graceful shutdown (Unix only)
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = tokio::signal::ctrl_c();

        tokio::select! {
            biased;  // Check shutdown signals before draining work

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received interrupt, shutting down gracefully");
                break;
            }

            // Polling pipeline: extracted lines → capture log
            Some(captured) = line_rx.recv() => {
                handle_captured_line(&appender, &captured);
            }

            // Watch pipeline: change notifications → full-file report
            Some(snapshot) = watcher.next_snapshot() => {
                report_snapshot(&snapshot);
            }
        }
    }

    // Stopped: close the line channel so pollers wind down, and cut the
    // in-flight tick tasks loose.
    drop(line_rx);
    for handle in poll_handles {
        handle.abort();
    }

    Ok(())
}

/// Append one captured line and report the outcome.
///
/// An append failure is surfaced here and logged at error level; the line is
/// lost but the pipelines keep running (see DESIGN.md on the propagation
/// policy).
fn handle_captured_line(appender: &LogAppender, captured: &CapturedLine) {
    tracing::debug!(endpoint = %captured.endpoint, line = %captured.line, "Captured line");
    match appender.append(&captured.line) {
        Ok(entry) => {
            println!(
                "[{}] captured from {}: {}",
                entry.timestamp, captured.endpoint, entry.line
            );
        }
        Err(e) => {
            tracing::error!(
                path = %appender.path().display(),
                endpoint = %captured.endpoint,
                error = %e,
                "Failed to append captured line, dropping it"
            );
        }
    }
}

/// Report one full-file snapshot to stdout.
fn report_snapshot(snapshot: &FileSnapshot) {
    println!(
        "[{}] capture log contents ({} bytes):\n{}",
        snapshot.read_at,
        snapshot.contents.len(),
        snapshot.contents
    );
}
