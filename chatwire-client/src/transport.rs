//! Transport and clock abstractions
//!
//! The connection manager never touches a socket API directly: it speaks to a
//! [`Transport`] that yields a paired frame sink and transport event stream,
//! and waits out reconnect delays on a [`Clock`]. This keeps the manager's
//! lifecycle logic exercisable with scripted open/close/frame/error sequences
//! (see [`scripted`]) and no network endpoint.
//!
//! The production implementation, [`WsTransport`], runs over
//! tokio-tungstenite. It collapses the WebSocket's separate close and error
//! notifications into one event stream:
//!
//! - a received Close frame becomes `Closed` with `was_clean = true` and the
//!   frame's code (1005 when the peer sent none)
//! - a stream error or an end-of-stream without a close handshake becomes an
//!   abnormal closure, so every failure funnels through the manager's single
//!   close-handling path

pub mod scripted;

use async_trait::async_trait;
use chatwire_core::{CloseCode, CloseEvent, Error, Result};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// An observation from the underlying channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame arrived
    Frame(String),
    /// The channel closed
    Closed(CloseEvent),
    /// A socket-level failure; the channel is unusable
    Error(String),
}

/// Write half of an established connection
#[async_trait]
pub trait FrameSink: Send {
    /// Transmit one text frame
    async fn send(&mut self, frame: String) -> Result<()>;
}

/// Read half of an established connection
#[async_trait]
pub trait FrameStream: Send {
    /// Next transport event; `None` once the stream is exhausted
    async fn next_event(&mut self) -> Option<TransportEvent>;
}

/// Capability to establish connections
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Open a connection to `url`
    ///
    /// Resolving successfully is the "open" signal: there is no separate
    /// open event on the stream.
    async fn connect(&self, url: &str) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>)>;
}

/// Capability to wait, injected so tests control time
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    async fn sleep(&self, duration: Duration);
}

/// The runtime clock
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

type WsSink =
    futures::stream::SplitSink<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>, Message>;
type WsStream =
    futures::stream::SplitStream<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>;

/// WebSocket transport over tokio-tungstenite
pub struct WsTransport;

struct WsFrameSink {
    inner: WsSink,
}

#[async_trait]
impl FrameSink for WsFrameSink {
    async fn send(&mut self, frame: String) -> Result<()> {
        self.inner
            .send(Message::Text(frame))
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}

struct WsFrameStream {
    inner: WsStream,
    finished: bool,
}

#[async_trait]
impl FrameStream for WsFrameStream {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        if self.finished {
            return None;
        }
        loop {
            match self.inner.next().await {
                Some(Ok(Message::Text(text))) => return Some(TransportEvent::Frame(text)),
                Some(Ok(Message::Close(frame))) => {
                    self.finished = true;
                    let code = frame
                        .map(|f| CloseCode::from(u16::from(f.code)))
                        .unwrap_or(CloseCode::NO_STATUS);
                    return Some(TransportEvent::Closed(CloseEvent::clean(code)));
                }
                // Pings, pongs and binary frames carry nothing for the chat layer
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(TransportEvent::Error(e.to_string()));
                }
                None => {
                    self.finished = true;
                    return Some(TransportEvent::Closed(CloseEvent::abnormal()));
                }
            }
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self, url: &str) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>)> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let (sink, stream) = ws_stream.split();
        Ok((
            Box::new(WsFrameSink { inner: sink }),
            Box::new(WsFrameStream {
                inner: stream,
                finished: false,
            }),
        ))
    }
}
