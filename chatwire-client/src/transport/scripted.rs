//! Scripted in-memory transport for tests
//!
//! Each call to `connect` consumes the next queued [`ConnectScript`]: either
//! the attempt is refused outright, or it succeeds and the returned stream
//! replays a sequence of [`TransportEvent`]s. Outbound frames are recorded
//! for assertions. This lets lifecycle tests drive the full manager loop
//! (opens, frames, unclean drops, terminal close codes, refused reconnects)
//! without a network endpoint.
//!
//! # Examples
//!
//! ```rust
//! use chatwire_client::{scripted::ScriptedTransport, TransportEvent};
//! use chatwire_core::{CloseCode, CloseEvent};
//!
//! let transport = ScriptedTransport::new();
//! transport.push_session(vec![
//!     TransportEvent::Frame(r#"{"type":"assistant.message","message":"hi"}"#.to_string()),
//!     TransportEvent::Closed(CloseEvent::clean(CloseCode::NORMAL)),
//! ]);
//! transport.push_refused();
//! ```

use crate::transport::{FrameSink, FrameStream, Transport, TransportEvent};
use async_trait::async_trait;
use chatwire_core::{Error, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

enum ConnectScript {
    /// The connection attempt fails
    Refuse,
    /// The attempt succeeds; events are read from this channel
    Accept(mpsc::UnboundedReceiver<TransportEvent>),
}

/// Transport whose connections follow pre-queued scripts
///
/// Scripts are consumed in FIFO order, one per `connect` call. A `connect`
/// with no remaining script fails, which reads as a refused attempt to the
/// manager.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<VecDeque<ConnectScript>>,
    sent: Arc<Mutex<Vec<String>>>,
    connects: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a refused connection attempt
    pub fn push_refused(&self) {
        self.scripts.lock().unwrap().push_back(ConnectScript::Refuse);
    }

    /// Queue an accepted connection that replays `events` and then hangs up
    ///
    /// If the script does not end in a `Closed` event the stream simply
    /// ends once drained, which the manager treats as an abnormal closure.
    pub fn push_session(&self, events: Vec<TransportEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in events {
            // Receiver is held by the script; sends cannot fail here
            let _ = tx.send(event);
        }
        self.scripts
            .lock()
            .unwrap()
            .push_back(ConnectScript::Accept(rx));
    }

    /// Queue an accepted connection the test feeds while it runs
    ///
    /// The connection stays open until the sender emits a `Closed` event or
    /// is dropped.
    pub fn push_live_session(&self) -> mpsc::UnboundedSender<TransportEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.scripts
            .lock()
            .unwrap()
            .push_back(ConnectScript::Accept(rx));
        tx
    }

    /// All frames transmitted through this transport, across connections
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of `connect` calls observed so far
    pub fn connect_attempts(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

struct ScriptedFrameSink {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl FrameSink for ScriptedFrameSink {
    async fn send(&mut self, frame: String) -> Result<()> {
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }
}

struct ScriptedFrameStream {
    rx: mpsc::UnboundedReceiver<TransportEvent>,
}

#[async_trait]
impl FrameStream for ScriptedFrameStream {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        self.rx.recv().await
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, _url: &str) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>)> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.lock().unwrap().pop_front();
        match script {
            Some(ConnectScript::Refuse) | None => {
                Err(Error::Transport("scripted connection refused".to_string()))
            }
            Some(ConnectScript::Accept(rx)) => Ok((
                Box::new(ScriptedFrameSink {
                    sent: Arc::clone(&self.sent),
                }),
                Box::new(ScriptedFrameStream { rx }),
            )),
        }
    }
}
