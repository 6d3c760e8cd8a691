//! Integration tests for the capture log: append-only writes feeding the
//! change watcher end to end, and clean teardown with and without activity.

use linklog::logfile::{LogAppender, LogWatcher};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

const EVENT_WAIT: Duration = Duration::from_secs(5);

// ============================================================================
// Append → Snapshot Roundtrip
// ============================================================================

#[tokio::test]
async fn test_append_produces_growing_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.log");
    let appender = LogAppender::new(&path);

    appender.append("https://www.example.com/seed").unwrap();
    let len_before = std::fs::read_to_string(&path).unwrap().len();

    let mut watcher = LogWatcher::start(&path).unwrap();
    appender.append("https://www.example.com/next").unwrap();

    let snapshot = timeout(EVENT_WAIT, watcher.next_snapshot())
        .await
        .expect("expected a snapshot after the append")
        .expect("watcher channel should stay open");

    // A snapshot triggered by an append can never be shorter than the file
    // was before that append
    assert!(snapshot.contents.len() >= len_before);
    assert!(snapshot.contents.contains("https://www.example.com/seed"));
}

#[tokio::test]
async fn test_snapshots_accumulate_all_appends() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.log");
    let appender = LogAppender::new(&path);
    let mut watcher = LogWatcher::start(&path).unwrap();

    appender.append("https://www.one.com").unwrap();
    appender.append("https://www.two.com").unwrap();
    appender.append("https://www.three.com").unwrap();

    // Notification granularity is up to the OS: we may see one snapshot or
    // several redundant ones. Drain until the latest snapshot holds all
    // three lines.
    let mut latest = timeout(EVENT_WAIT, watcher.next_snapshot())
        .await
        .expect("expected at least one snapshot")
        .unwrap();
    while !(latest.contents.contains("https://www.one.com")
        && latest.contents.contains("https://www.two.com")
        && latest.contents.contains("https://www.three.com"))
    {
        latest = timeout(EVENT_WAIT, watcher.next_snapshot())
            .await
            .expect("expected a further snapshot with the remaining lines")
            .unwrap();
    }

    // Appends never reorder or rewrite: the lines appear in append order
    let one = latest.contents.find("https://www.one.com").unwrap();
    let two = latest.contents.find("https://www.two.com").unwrap();
    let three = latest.contents.find("https://www.three.com").unwrap();
    assert!(one < two && two < three);
}

#[tokio::test]
async fn test_external_append_is_reported_alongside_ours() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.log");
    let appender = LogAppender::new(&path);

    appender.append("https://www.ours.com").unwrap();

    let mut watcher = LogWatcher::start(&path).unwrap();

    // Another writer appends to the same file
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "12:00:00 https://www.theirs.com").unwrap();
    drop(file);

    let mut snapshot = timeout(EVENT_WAIT, watcher.next_snapshot())
        .await
        .expect("expected a snapshot for the external append")
        .unwrap();
    while !snapshot.contents.contains("https://www.theirs.com") {
        snapshot = timeout(EVENT_WAIT, watcher.next_snapshot())
            .await
            .expect("expected a snapshot containing the external line")
            .unwrap();
    }
    assert!(snapshot.contents.contains("https://www.ours.com"));
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test]
async fn test_teardown_with_zero_activity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.log");

    let appender = LogAppender::new(&path);
    let watcher = LogWatcher::start(&path).unwrap();

    // No appends, no notifications: dropping both must be clean
    drop(watcher);
    drop(appender);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_teardown_after_activity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urls.log");

    let appender = LogAppender::new(&path);
    let mut watcher = LogWatcher::start(&path).unwrap();

    appender.append("https://www.example.com/a").unwrap();
    let _ = timeout(EVENT_WAIT, watcher.next_snapshot()).await;

    drop(watcher);

    // The log survives teardown untouched
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("https://www.example.com/a"));
}
