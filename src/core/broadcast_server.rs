//! WebSocket fan-out of frame payloads to any number of subscribers.
//!
//! The producer calls [`BroadcastServer::publish`] from its own thread once
//! per frame. Publishing never touches a socket: the payload is serialized
//! once into a text message whose buffer every queue shares, and offered to
//! each subscriber's bounded queue with `try_send`. A
//! subscriber whose queue is full or closed is dropped from the live set on
//! the spot. Each connection task drains its queue into the socket with a
//! time-bounded write and watches the inbound side for closure.

use crate::core::config::Config;
use crate::models::broadcast::{BroadcastError, BroadcastResult, FramePayload, SubscriberId};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Anything the producer loop can hand finished payloads to
pub trait FramePublisher: Send + Sync {
    /// Whether anyone would receive a publish right now
    fn has_subscribers(&self) -> bool;

    /// Best-effort, non-blocking delivery of one payload
    fn publish(&self, payload: &FramePayload);
}

/// Live subscriber set, keyed by id, holding each connection's outbound queue
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<Message>>>,
}

impl SubscriberRegistry {
    pub(crate) fn add(&self, sender: mpsc::Sender<Message>) -> SubscriberId {
        let id = Uuid::new_v4();
        self.subscribers.lock().insert(id, sender);
        id
    }

    pub(crate) fn remove(&self, id: &SubscriberId) -> bool {
        self.subscribers.lock().remove(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subscribers.lock().is_empty()
    }

    /// Offer a message to every subscriber, dropping the ones that can't take it
    ///
    /// Returns the number of subscribers the message was queued for.
    pub(crate) fn broadcast(&self, message: Message) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|id, sender| match sender.try_send(message.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(subscriber_id = %id, "subscriber backlogged, dropping");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(subscriber_id = %id, "subscriber channel closed, dropping");
                false
            }
        });
        subscribers.len()
    }
}

/// Tuning for per-connection queues and writes
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    pub queue_capacity: usize,
    pub write_timeout: Duration,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 16,
            write_timeout: Duration::from_millis(1000),
        }
    }
}

impl From<&Config> for BroadcastConfig {
    fn from(config: &Config) -> Self {
        Self {
            queue_capacity: config.subscriber_queue_capacity,
            write_timeout: Duration::from_millis(config.write_timeout_ms),
        }
    }
}

/// Handle to a running accept loop
pub struct ServerHandle {
    local_addr: SocketAddr,
    accept_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting new subscribers; existing connections keep running
    pub fn shutdown(self) {
        self.accept_task.abort();
    }
}

/// Subscriber server owning the live connection set
#[derive(Clone)]
pub struct BroadcastServer {
    registry: Arc<SubscriberRegistry>,
    config: BroadcastConfig,
}

impl BroadcastServer {
    pub fn new(config: BroadcastConfig) -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::default()),
            config,
        }
    }

    /// Bind `address` and run the accept loop on the current tokio runtime
    ///
    /// Returns once the listener is bound; the accept loop keeps running in
    /// the background. Bind failures are logged and returned so the caller
    /// can carry on without subscribers.
    pub async fn start(&self, address: &str) -> BroadcastResult<ServerHandle> {
        let listener = TcpListener::bind(address).await.map_err(|source| {
            error!(%address, error = %source, "failed to bind subscriber server");
            BroadcastError::Bind {
                address: address.to_string(),
                source,
            }
        })?;

        let local_addr = listener.local_addr().map_err(|source| BroadcastError::Bind {
            address: address.to_string(),
            source,
        })?;

        info!(%local_addr, "subscriber server listening on ws://{}", local_addr);

        let registry = Arc::clone(&self.registry);
        let config = self.config.clone();
        let accept_task = tokio::spawn(async move {
            accept_loop(listener, registry, config).await;
        });

        Ok(ServerHandle {
            local_addr,
            accept_task,
        })
    }

    /// Serialize once and queue the payload for every live subscriber
    ///
    /// Never waits on a subscriber. Returns the number of subscribers the
    /// payload was queued for; zero subscribers skips serialization.
    pub fn publish(&self, payload: &FramePayload) -> usize {
        if self.registry.is_empty() {
            return 0;
        }

        let message = match serde_json::to_string(payload) {
            Ok(json) => Message::Text(json.into()),
            Err(e) => {
                warn!(error = %BroadcastError::from(e), "dropping frame");
                return 0;
            }
        };

        self.registry.broadcast(message)
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    #[cfg(test)]
    pub(crate) fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }
}

impl Default for BroadcastServer {
    fn default() -> Self {
        Self::new(BroadcastConfig::default())
    }
}

impl FramePublisher for BroadcastServer {
    fn has_subscribers(&self) -> bool {
        !self.registry.is_empty()
    }

    fn publish(&self, payload: &FramePayload) {
        BroadcastServer::publish(self, payload);
    }
}

async fn accept_loop(listener: TcpListener, registry: Arc<SubscriberRegistry>, config: BroadcastConfig) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let registry = Arc::clone(&registry);
                let config = config.clone();
                tokio::spawn(async move {
                    handle_connection(stream, peer, registry, config).await;
                });
            }
            Err(e) => {
                // Typically fd exhaustion or an aborted handshake; keep serving
                warn!(error = %e, "accept error");
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    registry: Arc<SubscriberRegistry>,
    config: BroadcastConfig,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(%peer, error = %e, "failed to disable Nagle");
    }

    let ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!(%peer, error = %e, "websocket handshake failed");
            return;
        }
    };

    let (mut sink, mut inbound) = ws.split();
    let (tx, mut rx) = mpsc::channel::<Message>(config.queue_capacity.max(1));
    let id = registry.add(tx);
    info!(subscriber_id = %id, %peer, subscribers = registry.len(), "subscriber connected");

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                let Some(message) = outbound else {
                    // Publish dropped us (backlogged or closed)
                    break;
                };
                let send = sink.send(message);
                match tokio::time::timeout(config.write_timeout, send).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        debug!(subscriber_id = %id, error = %e, "write failed");
                        break;
                    }
                    Err(_) => {
                        debug!(subscriber_id = %id, "write timed out");
                        break;
                    }
                }
            }
            incoming = inbound.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(subscriber_id = %id, error = %e, "read failed");
                    break;
                }
                // No inbound protocol; pings are answered by the stream itself
                Some(Ok(_)) => {}
            },
        }
    }

    registry.remove(&id);
    let _ = tokio::time::timeout(config.write_timeout, sink.close()).await;
    info!(subscriber_id = %id, %peer, subscribers = registry.len(), "subscriber disconnected");
}
