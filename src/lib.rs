pub mod core;
pub mod models;
pub mod platform;

use crate::core::broadcast_server::{BroadcastConfig, BroadcastServer};
use crate::core::config::Config;
use crate::core::pipeline::{GesturePipeline, PipelineStats};
use crate::platform::capture::FrameSource;
use crate::platform::pose::MediaPipeBridge;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

/// Run the relay until the frame source ends or Ctrl-C is received
///
/// A bind failure is logged and the producer loop still runs, publishing to
/// nobody.
pub async fn run(
    config: Config,
    source: Box<dyn FrameSource>,
    bridge: Box<dyn MediaPipeBridge>,
) -> Result<PipelineStats, tokio::task::JoinError> {
    let server = BroadcastServer::new(BroadcastConfig::from(&config));

    let handle = match server.start(&config.bind_address()).await {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "continuing without subscribers");
            None
        }
    };

    let mut pipeline = GesturePipeline::new(source, bridge, &config);
    let stop = pipeline.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping producer loop");
            stop.store(true, Ordering::Relaxed);
        }
    });

    let publisher = server.clone();
    let stats = tokio::task::spawn_blocking(move || pipeline.run(&publisher)).await?;

    info!(
        frames = stats.frames,
        frames_with_hand = stats.frames_with_hand,
        gesture_changes = stats.gesture_changes,
        read_errors = stats.read_errors,
        inference_ms = stats.inference_ms,
        final_gesture = %stats.final_gesture,
        "producer loop stopped"
    );

    if let Some(handle) = handle {
        handle.shutdown();
    }

    Ok(stats)
}
