//! The connection channel: one logical duplex link to the dashboard
//! server, with automatic recovery from unplanned drops.
//!
//! A single task owns the socket. Consumers receive lifecycle and push
//! notifications through an mpsc queue and talk back through a
//! [`ChannelHandle`]. Each successful handshake mints a fresh
//! [`ConnectionEpoch`]; everything the connection produces is tagged
//! with it, so the consumer can discard leftovers from a previous link.

use std::collections::HashMap;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::wire::{self, ClientFrame, ServerFrame};

pub use crate::wire::ServerPush;

/// Identifies one successful handshake. Fresh on every (re)connection.
pub type ConnectionEpoch = Uuid;

/// Notifications delivered to the channel's consumer, in arrival order.
#[derive(Debug)]
pub enum ChannelEvent {
    Connected {
        epoch: ConnectionEpoch,
    },
    /// `will_retry` distinguishes an unplanned drop (the channel keeps
    /// trying on its own) from a requested close (it stops).
    Disconnected {
        will_retry: bool,
    },
    Push {
        epoch: ConnectionEpoch,
        push: ServerPush,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
    #[error("request timed out")]
    Timeout,
    #[error(transparent)]
    Wire(#[from] crate::wire::WireError),
}

enum Outbound {
    Request {
        event: &'static str,
        data: Option<Value>,
        reply: oneshot::Sender<Result<Value, ChannelError>>,
    },
    Emit {
        event: &'static str,
        data: Value,
        sent: oneshot::Sender<()>,
    },
}

/// Outbound side of the channel. Cheap to clone.
#[derive(Clone)]
pub struct ChannelHandle {
    outbound: mpsc::Sender<Outbound>,
    cancel: CancellationToken,
}

impl ChannelHandle {
    /// Request/response exchange. Resolves when the server replies, the
    /// connection drops, or the timeout elapses.
    pub async fn request(
        &self,
        event: &'static str,
        data: Option<Value>,
    ) -> Result<Value, ChannelError> {
        let (reply, rx) = oneshot::channel();
        self.outbound
            .send(Outbound::Request { event, data, reply })
            .await
            .map_err(|_| ChannelError::Closed)?;
        match tokio::time::timeout(request_timeout(), rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ChannelError::Closed),
            Err(_) => Err(ChannelError::Timeout),
        }
    }

    /// Fire-and-forget frame. Resolves once the frame is on the wire;
    /// no server acknowledgment is awaited.
    pub async fn emit(&self, event: &'static str, data: Value) -> Result<(), ChannelError> {
        let (sent, rx) = oneshot::channel();
        self.outbound
            .send(Outbound::Emit { event, data, sent })
            .await
            .map_err(|_| ChannelError::Closed)?;
        match tokio::time::timeout(request_timeout(), rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(ChannelError::Closed),
            Err(_) => Err(ChannelError::Timeout),
        }
    }

    /// Explicit client-side close. The channel reports a non-retrying
    /// disconnect and its task ends.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

pub struct Channel;

impl Channel {
    /// Spawn the connection task against `url`. Lifecycle and push
    /// events arrive on `events`; the returned handle is the only way
    /// to talk back.
    pub fn spawn(url: Url, events: mpsc::Sender<ChannelEvent>) -> ChannelHandle {
        let (outbound_tx, outbound_rx) = mpsc::channel(opsdeck_config::EVENT_QUEUE_SIZE);
        let cancel = CancellationToken::new();
        let handle = ChannelHandle {
            outbound: outbound_tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(run(url, events, outbound_rx, cancel));
        handle
    }
}

fn request_timeout() -> Duration {
    Duration::from_secs(opsdeck_config::REQUEST_TIMEOUT_SECS)
}

/// Delay before reconnection attempt `attempt` (1-based): doubling from
/// the configured floor, clamped to the configured ceiling.
fn reconnect_delay(attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(16);
    let ms = opsdeck_config::RECONNECT_INITIAL_DELAY_MS.saturating_mul(1u64 << shift);
    Duration::from_millis(opsdeck_config::clamp_reconnect_delay_ms(ms))
}

/// How a connection ended.
enum DropKind {
    /// Server sent a Close frame or the client asked to close.
    Requested,
    /// Transport-level failure; the channel will retry.
    Transport,
}

async fn run(
    url: Url,
    events: mpsc::Sender<ChannelEvent>,
    mut outbound: mpsc::Receiver<Outbound>,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;
    loop {
        let socket = tokio::select! {
            _ = cancel.cancelled() => break,
            connected = connect_async(url.as_str()) => match connected {
                Ok((socket, _)) => socket,
                Err(e) => {
                    attempt += 1;
                    let delay = reconnect_delay(attempt);
                    warn!("connect to {url} failed (attempt {attempt}): {e}");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(delay) => continue,
                    }
                }
            },
        };

        attempt = 0;
        let epoch = Uuid::new_v4();
        debug!("connected to {url}, epoch {epoch}");
        if events.send(ChannelEvent::Connected { epoch }).await.is_err() {
            break;
        }

        match serve(socket, epoch, &events, &mut outbound, &cancel).await {
            DropKind::Requested => {
                let _ = events
                    .send(ChannelEvent::Disconnected { will_retry: false })
                    .await;
                break;
            }
            DropKind::Transport => {
                if events
                    .send(ChannelEvent::Disconnected { will_retry: true })
                    .await
                    .is_err()
                {
                    break;
                }
                attempt = 1;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(reconnect_delay(attempt)) => {}
                }
            }
        }
    }
}

/// Drive one established connection until it drops. Pending requests
/// that never got their reply are failed on the way out.
async fn serve(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    epoch: ConnectionEpoch,
    events: &mpsc::Sender<ChannelEvent>,
    outbound: &mut mpsc::Receiver<Outbound>,
    cancel: &CancellationToken,
) -> DropKind {
    let (mut sink, mut stream) = socket.split();
    let mut pending: HashMap<u64, oneshot::Sender<Result<Value, ChannelError>>> = HashMap::new();
    let mut next_id: u64 = 1;

    let drop_kind = loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(WsMessage::Close(None)).await;
                break DropKind::Requested;
            }

            command = outbound.recv() => match command {
                Some(Outbound::Request { event, data, reply }) => {
                    let id = next_id;
                    next_id += 1;
                    let frame = ClientFrame { id: Some(id), event, data };
                    match serde_json::to_string(&frame) {
                        Ok(text) => {
                            if sink.send(WsMessage::Text(text)).await.is_err() {
                                let _ = reply.send(Err(ChannelError::Closed));
                                break DropKind::Transport;
                            }
                            pending.insert(id, reply);
                        }
                        Err(e) => {
                            let _ = reply.send(Err(ChannelError::Wire(e.into())));
                        }
                    }
                }
                Some(Outbound::Emit { event, data, sent }) => {
                    let frame = ClientFrame { id: None, event, data: Some(data) };
                    match serde_json::to_string(&frame) {
                        Ok(text) => {
                            if sink.send(WsMessage::Text(text)).await.is_err() {
                                break DropKind::Transport;
                            }
                            let _ = sent.send(());
                        }
                        Err(e) => warn!("could not encode {event} frame: {e}"),
                    }
                }
                // All handles gone: nobody is listening anymore.
                None => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break DropKind::Requested;
                }
            },

            message = stream.next() => match message {
                Some(Ok(WsMessage::Text(text))) => match wire::decode(&text) {
                    Ok(ServerFrame::Reply { ack, data }) => {
                        match pending.remove(&ack) {
                            Some(reply) => { let _ = reply.send(Ok(data)); }
                            None => debug!("reply for unknown request {ack}"),
                        }
                    }
                    Ok(ServerFrame::Push { event, data }) => match wire::parse_push(&event, data) {
                        Ok(push) => {
                            if events.send(ChannelEvent::Push { epoch, push }).await.is_err() {
                                break DropKind::Requested;
                            }
                        }
                        Err(e) => warn!("ignoring push: {e}"),
                    },
                    Err(e) => warn!("ignoring malformed frame: {e}"),
                },
                Some(Ok(WsMessage::Close(_))) => break DropKind::Requested,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("transport error, epoch {epoch}: {e}");
                    break DropKind::Transport;
                }
                None => break DropKind::Transport,
            },
        }
    };

    for (_, reply) in pending.drain() {
        let _ = reply.send(Err(ChannelError::Closed));
    }
    drop_kind
}
