use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::extract::extract_url_lines;
use super::fetcher::fetch_with_retry;

/// One URL-bearing line captured from an endpoint response.
///
/// The endpoint rides along for diagnostics; only the line itself is
/// persisted to the capture log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    /// Endpoint the line was extracted from.
    pub endpoint: Arc<str>,
    /// Line text, starting at the URL marker.
    pub line: String,
}

/// Spawn one polling task per endpoint, all feeding the same channel.
///
/// Each task drives its own [`tokio::time::interval`] at `interval`, so one
/// endpoint's slow or failing fetches never delay another endpoint's ticks.
/// Lines arrive on the channel in completion order with no cross-endpoint
/// ordering. Tasks stop on their own once the receiver side of `tx` is
/// dropped; the returned handles let the caller abort them earlier.
pub fn spawn_pollers(
    client: reqwest::Client,
    endpoints: &[String],
    interval: Duration,
    tx: mpsc::Sender<CapturedLine>,
) -> Vec<JoinHandle<()>> {
    endpoints
        .iter()
        .map(|endpoint| {
            let endpoint: Arc<str> = Arc::from(endpoint.as_str());
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(poll_endpoint(client, endpoint, interval, tx))
        })
        .collect()
}

/// Tick loop for a single endpoint.
///
/// The fetch for each tick runs in its own spawned task, so a fetch that
/// outlasts the interval overlaps the next tick instead of shifting it. A
/// tick whose fetch exhausts its retries produces no output and is logged
/// at warn level; the following tick stays on schedule.
async fn poll_endpoint(
    client: reqwest::Client,
    endpoint: Arc<str>,
    interval: Duration,
    tx: mpsc::Sender<CapturedLine>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tx.closed() => {
                tracing::debug!(endpoint = %endpoint, "Line channel closed, stopping poller");
                break;
            }
            _ = ticker.tick() => {
                let client = client.clone();
                let endpoint = Arc::clone(&endpoint);
                let tx = tx.clone();
                tokio::spawn(async move {
                    match fetch_with_retry(&client, &endpoint).await {
                        Ok(body) => {
                            for line in extract_url_lines(&body) {
                                let captured = CapturedLine {
                                    endpoint: Arc::clone(&endpoint),
                                    line: line.to_string(),
                                };
                                if tx.send(captured).await.is_err() {
                                    // Receiver gone mid-batch; drop the rest
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                endpoint = %endpoint,
                                error = %e,
                                "Poll tick skipped, retries exhausted"
                            );
                        }
                    }
                });
            }
        }
    }
}
