//! Endpoint polling pipeline.
//!
//! One timer-driven task per configured endpoint fetches the endpoint body
//! at a fixed cadence, extracts URL-bearing lines, and fans them into a
//! single channel. The module is organized into three submodules:
//!
//! - [`fetcher`] - One HTTP GET with bounded in-tick retry
//! - [`extract`] - Line splitting and URL-marker filtering
//! - [`pipeline`] - Per-endpoint poll tasks merged into one channel
//!
//! Failure isolation is per endpoint per tick: an endpoint whose fetch
//! exhausts its retries skips that tick's output and stays on schedule, and
//! never stops or delays any other endpoint.

mod extract;
mod fetcher;
mod pipeline;

pub use extract::{extract_url_lines, URL_MARKER};
pub use fetcher::{fetch_with_retry, FetchError, MAX_ATTEMPTS};
pub use pipeline::{spawn_pollers, CapturedLine};
