//! linklog — poll web endpoints for URL-bearing lines and tail the capture log.
//!
//! Two independent pipelines share one append-only log file:
//!
//! - **Polling**: one timer-driven task per configured endpoint fetches the
//!   endpoint body, extracts lines containing `https://www`, and fans them
//!   into a single channel consumed by the orchestrator, which appends each
//!   line to the log.
//! - **Watching**: an OS file-change watcher on the log re-reads the full
//!   file on every modification and reports its contents.
//!
//! The pipelines are coupled only through the file on disk — there is no
//! in-process channel between them, so external writers to the log are
//! observed exactly like our own appends.

pub mod app;
pub mod config;
pub mod logfile;
pub mod poller;
pub mod util;
