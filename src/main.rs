use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use linklog::app;
use linklog::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "linklog",
    about = "Polls web endpoints for URL-bearing lines and tails the capture log"
)]
struct Args {
    /// Path to the TOML config file
    #[arg(long, value_name = "FILE", default_value = "linklog.toml")]
    config: PathBuf,

    /// Override the polling interval in seconds
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,

    /// Override the capture log path
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Endpoint to poll; repeatable, replaces the configured list
    #[arg(long = "endpoint", value_name = "URL")]
    endpoints: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays a clean status stream
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // CLI overrides take precedence over the config file
    if let Some(secs) = args.interval {
        config.poll_interval_secs = secs;
    }
    if let Some(path) = args.log_file {
        config.log_file = path;
    }
    if !args.endpoints.is_empty() {
        config.endpoints = args.endpoints;
    }

    config.validate().context("Invalid configuration")?;

    app::run(config).await
}
