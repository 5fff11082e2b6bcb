//! sitemirror command-line entry point
//!
//! Loads a JSON mirror configuration, applies command-line overrides and
//! runs one mirror crawl. Ctrl-C stops the crawl after the current page.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sitemirror::config::MirrorConfig;
use sitemirror::crawl_engine::{NoOpProgress, StopHandle, mirror_with_progress};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Mirror a website to local storage through a real browser
#[derive(Parser, Debug)]
#[command(name = "sitemirror")]
#[command(version)]
#[command(about = "Mirror a website to local storage through a real browser", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Write the mirror here instead of the configured output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Depth limit; 0 disables it
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Keep links pointing at the remote site
    #[arg(long)]
    no_convert_links: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = MirrorConfig::from_json_file(&cli.config)
        .and_then(|config| config.with_overrides(cli.output, cli.depth, cli.headed, cli.no_convert_links))
        .context("Failed to load configuration")?;

    let stop = StopHandle::new();
    let signal_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing the current page");
            signal_stop.stop();
        }
    });

    let summary = mirror_with_progress(config, NoOpProgress, stop)
        .await
        .context("Mirror failed")?;
    println!("{summary}");
    Ok(())
}

/// `RUST_LOG` wins; otherwise info with the browser's CDP chatter muted
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,chromiumoxide::handler=off,chromiumoxide::conn=off")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
