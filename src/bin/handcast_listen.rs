//! handcast-listen - terminal subscriber printing each frame's gesture

use anyhow::Context;
use clap::Parser;
use futures_util::StreamExt;
use handcast_lib::models::broadcast::FramePayload;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "handcast-listen", about = "Print gestures streamed by handcast")]
struct Cli {
    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(long, default_value_t = 8765)]
    port: u16,
}

fn status_line(payload: &FramePayload) -> String {
    let status = if payload.hand_detected { "HAND" } else { "NO HAND" };
    format!("STATUS: [{}] GESTURE: [{}]", status, payload.gesture)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handcast_listen=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let url = format!("ws://{}:{}", cli.host, cli.port);
    let (socket, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("could not connect to {} (is handcast running?)", url))?;
    println!("Connected to {}", url);

    let (_, mut read) = socket.split();
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<FramePayload>(text.as_str()) {
                Ok(payload) => println!("{}", status_line(&payload)),
                Err(e) => warn!(error = %e, "undecodable payload"),
            },
            Ok(Message::Close(_)) => break,
            Ok(other) => debug!(?other, "ignoring non-text message"),
            Err(e) => {
                warn!(error = %e, "connection error");
                break;
            }
        }
    }

    println!("Connection closed by server");
    Ok(())
}
