//! handcast - hand gesture relay
//!
//! Reads frames, classifies the tracked hand and streams the debounced
//! gesture to every WebSocket subscriber.

use anyhow::{anyhow, Context};
use clap::Parser;
use handcast_lib::core::config::Config;
use handcast_lib::platform::capture::{FrameSource, ImageSequenceSource, SyntheticCamera};
use handcast_lib::platform::pose::{DummyMediaPipe, MediaPipeBridge, ReplayMediaPipe};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "handcast", about = "Hand gesture relay over WebSocket")]
struct Cli {
    /// Settings file (default: $HOME/.handcast/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Override the number of agreeing frames needed to change gesture
    #[arg(long)]
    history_length: Option<usize>,

    /// Read frames from a directory of images instead of the synthetic camera
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Replay recorded hand landmarks (JSON lines) instead of running a model
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Stop the synthetic camera after N frames
    #[arg(long)]
    synthetic_frames: Option<u64>,

    /// Synthetic frame width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Synthetic frame height
    #[arg(long, default_value_t = 480)]
    height: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handcast=info,handcast_lib=info".into()),
        )
        .init();

    info!("handcast v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow!("{}", e))
    .context("failed to load configuration")?;

    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(history_length) = cli.history_length {
        config.history_length = history_length;
    }
    config
        .validate()
        .map_err(|e| anyhow!("{}", e))
        .context("invalid configuration")?;

    let source: Box<dyn FrameSource> = match &cli.frames {
        Some(dir) => Box::new(
            ImageSequenceSource::open(dir)
                .with_context(|| format!("failed to open frames in {}", dir.display()))?,
        ),
        None => Box::new(SyntheticCamera::new(cli.width, cli.height, cli.synthetic_frames)),
    };

    let bridge: Box<dyn MediaPipeBridge> = match &cli.replay {
        Some(path) => Box::new(
            ReplayMediaPipe::open(path)
                .with_context(|| format!("failed to load recording {}", path.display()))?,
        ),
        None => Box::new(DummyMediaPipe::new()),
    };

    handcast_lib::run(config, source, bridge)
        .await
        .context("producer loop panicked")?;

    Ok(())
}
