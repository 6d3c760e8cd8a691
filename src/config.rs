//! Configuration file parser for linklog.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields`
//! off), though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::validate_endpoint;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// The endpoint list is empty after merging file and CLI values.
    #[error("No endpoints configured")]
    NoEndpoints,

    /// The polling interval is zero.
    #[error("Polling interval must be at least 1 second")]
    ZeroInterval,

    /// An endpoint URL failed validation.
    #[error("Invalid endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        source: crate::util::EndpointUrlError,
    },
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between polls of each endpoint.
    pub poll_interval_secs: u64,

    /// Endpoints to poll for URL-bearing lines. Must be non-empty.
    pub endpoints: Vec<String>,

    /// Path of the append-only capture log.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            endpoints: vec![
                "https://www.example.com".to_string(),
                "https://www.lipsum.com/feed/html".to_string(),
            ],
            log_file: PathBuf::from("captured-urls.log"),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading so a corrupted or runaway file
        // cannot exhaust memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {} // Size is within limits, proceed
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["poll_interval_secs", "endpoints", "log_file"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            endpoints = config.endpoints.len(),
            interval_secs = config.poll_interval_secs,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Validate the merged configuration before wiring any pipelines.
    ///
    /// Checks the interval is non-zero, the endpoint list is non-empty, and
    /// every endpoint parses as an http(s) URL with a host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        for url in &self.endpoints {
            validate_endpoint(url).map_err(|source| ConfigError::InvalidEndpoint {
                url: url.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
