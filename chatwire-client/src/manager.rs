//! Chat connection manager
//!
//! This module provides [`ChatClient`], which owns the single duplex channel
//! to the chat backend and drives its whole lifecycle: connect, frame pump,
//! close classification, bounded fixed-delay reconnection, and permanent
//! session termination.
//!
//! # Lifecycle
//!
//! 1. **Connect**: `connect()` starts the run loop in a background task
//! 2. **Use**: `send` messages, observe [`ClientEvent`]s, read `state()`
//! 3. **Reconnect**: non-clean closures are retried on a fixed delay until
//!    the budget runs out; the budget refills on every successful open
//! 4. **Terminate**: a terminal close code, a server `close.connection`
//!    message, or retry exhaustion absorbs the manager permanently
//!
//! # Single Close Path
//!
//! Socket-level errors are not a separate branch: the transport reports them
//! on the same event stream, and the pump converts them into an abnormal
//! closure. Every way a connection can die funnels through one close
//! classifier.
//!
//! # Cloning
//!
//! `ChatClient` is cheaply cloneable using `Arc` internally; all clones share
//! the same connection and state.

use crate::config::{ClientConfig, UnknownMessagePolicy};
use crate::dispatcher::{ClientEvent, EventDispatcher, EventKind};
use crate::retry::RetryPolicy;
use crate::state::{ConnectionState, StateCell};
use crate::transport::{Clock, FrameSink, FrameStream, Transport, TransportEvent};
use crate::ui::{ChatUi, SenderKind};
use chatwire_core::{codec, CloseEvent, Decoded, InboundMessage, OutboundEnvelope};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Notice appended to the transcript when the retry budget runs out
pub const RETRY_EXHAUSTED_NOTICE: &str =
    "The connection has been lost. Please return to the top page, or wait a while and try again.";

pub(crate) struct Shared {
    pub(crate) config: ClientConfig,
    pub(crate) state: StateCell,
    pub(crate) dispatcher: EventDispatcher,
    pub(crate) ui: Arc<dyn ChatUi>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) clock: Arc<dyn Clock>,
    /// Write half of the live connection; `None` while not open
    pub(crate) sink: Mutex<Option<Box<dyn FrameSink>>>,
    /// Set exactly once; suppresses reconnection for the manager's lifetime
    pub(crate) terminated: AtomicBool,
    /// Guards against spawning a second run loop
    pub(crate) started: AtomicBool,
    /// Policy handed to the run loop on the first `connect`
    pub(crate) policy: std::sync::Mutex<Option<Box<dyn RetryPolicy>>>,
}

/// Persistent-connection chat client
///
/// Constructed through [`crate::ClientBuilder`]. See the module docs for the
/// lifecycle.
#[derive(Clone)]
pub struct ChatClient {
    pub(crate) shared: Arc<Shared>,
}

impl ChatClient {
    /// Start the connection run loop
    ///
    /// Returns immediately; the open is signaled through
    /// [`ClientEvent::Opened`] and the state. Calling this again while the
    /// loop is running (including while a reconnect delay is pending) is a
    /// logged no-op, so a second socket can never be raced into existence.
    pub fn connect(&self) {
        if self.shared.started.swap(true, Ordering::SeqCst) {
            tracing::warn!("connect called while the client is already running");
            return;
        }
        // The started guard means this take happens at most once
        let policy = self
            .shared
            .policy
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());
        let Some(policy) = policy else {
            tracing::error!("retry policy missing, not starting the run loop");
            return;
        };
        tokio::spawn(run(Arc::clone(&self.shared), policy));
    }

    /// Current connection state
    pub async fn state(&self) -> ConnectionState {
        self.shared.state.get().await
    }

    /// Whether sends are currently valid
    pub async fn is_open(&self) -> bool {
        self.shared.state.get().await.is_open()
    }

    /// The event dispatcher for this client
    pub fn events(&self) -> &EventDispatcher {
        &self.shared.dispatcher
    }

    /// Register an event handler; convenience for [`EventDispatcher::subscribe`]
    pub async fn on_event<F, Fut>(&self, kind: EventKind, key: impl Into<String>, handler: F) -> bool
    where
        F: Fn(ClientEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.shared.dispatcher.subscribe(kind, key, handler).await
    }

    /// Send a message envelope to the backend
    ///
    /// Valid only while the connection is open. Otherwise the message is
    /// dropped with a logged diagnostic: not queued, not retried, and not an
    /// error to the caller. Transmission failures are likewise local; the
    /// broken socket surfaces through the receive side's close path.
    pub async fn send(&self, message: impl Into<String>, sender: impl Into<String>) {
        let shared = &self.shared;
        if !shared.state.get().await.is_open() {
            tracing::warn!("connection is not open, dropping outbound message");
            return;
        }

        let envelope = OutboundEnvelope::new(message, sender);
        let frame = match codec::encode_outbound(&envelope) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode outbound envelope");
                return;
            }
        };

        let mut sink = shared.sink.lock().await;
        match sink.as_mut() {
            Some(sink) => {
                if let Err(e) = sink.send(frame).await {
                    tracing::warn!(error = %e, "failed to transmit message");
                }
            }
            None => tracing::warn!("connection is not open, dropping outbound message"),
        }
    }
}

/// The connection run loop
///
/// One task per client: connect, pump the established connection until it
/// closes, classify the closure, and either stop (clean or terminal) or wait
/// out the retry delay and go again. Because the reconnect delay is an await
/// point inside this single task, at most one socket ever exists per manager.
async fn run(shared: Arc<Shared>, mut policy: Box<dyn RetryPolicy>) {
    let mut attempt: u32 = 0;
    loop {
        shared.state.set(ConnectionState::Connecting).await;
        match shared.transport.connect(&shared.config.url).await {
            Ok((sink, mut stream)) => {
                if attempt > 0 {
                    tracing::info!("connection restored");
                } else {
                    tracing::info!(url = %shared.config.url, "connected");
                }
                // Successful open: the retry budget refills
                attempt = 0;
                policy.reset();

                *shared.sink.lock().await = Some(sink);
                shared.state.set(ConnectionState::Open).await;
                shared.ui.set_input_enabled(true);
                shared.dispatcher.dispatch(ClientEvent::Opened).await;

                let close = pump(&shared, stream.as_mut()).await;
                shared.sink.lock().await.take();

                if shared.terminated.load(Ordering::SeqCst) {
                    // A close.connection message already ran termination
                    return;
                }
                shared.state.set(ConnectionState::Closed).await;

                if close.code.is_terminal() {
                    tracing::info!(code = %close.code, "session terminated by close code");
                    terminate(&shared, None).await;
                    return;
                }
                if close.was_clean {
                    tracing::info!(code = %close.code, "connection closed cleanly");
                    return;
                }
                tracing::warn!(code = %close.code, "connection lost");
            }
            Err(e) => {
                tracing::warn!(error = %e, "connection attempt failed");
            }
        }

        match policy.next_delay(attempt) {
            Some(delay) => {
                attempt += 1;
                shared
                    .state
                    .set(ConnectionState::Reconnecting { attempt })
                    .await;
                tracing::info!(attempt, delay_secs = delay.as_secs_f64(), "reconnecting");
                shared.clock.sleep(delay).await;
            }
            None => {
                tracing::error!("reconnect attempts exhausted, giving up");
                shared.terminated.store(true, Ordering::SeqCst);
                shared.state.set(ConnectionState::Terminated).await;
                shared.ui.set_thinking(false);
                shared.ui.set_input_enabled(false);
                shared.ui.append(RETRY_EXHAUSTED_NOTICE, SenderKind::Assistant);
                shared.dispatcher.dispatch(ClientEvent::RetriesExhausted).await;
                return;
            }
        }
    }
}

/// Process transport events until the connection is gone
///
/// Returns the close event describing why. Transport errors are converted
/// into an abnormal closure here so the caller sees exactly one shape of
/// failure.
async fn pump(shared: &Arc<Shared>, stream: &mut dyn FrameStream) -> CloseEvent {
    loop {
        match stream.next_event().await {
            Some(TransportEvent::Frame(text)) => {
                handle_frame(shared, &text).await;
                if shared.terminated.load(Ordering::SeqCst) {
                    // Session ended mid-stream; stop reading
                    return CloseEvent::clean(chatwire_core::CloseCode::NORMAL);
                }
            }
            Some(TransportEvent::Closed(close)) => return close,
            Some(TransportEvent::Error(e)) => {
                tracing::warn!(error = %e, "transport error, forcing closure");
                return CloseEvent::abnormal();
            }
            None => return CloseEvent::abnormal(),
        }
    }
}

/// Decode, render, and dispatch one inbound frame
///
/// Malformed frames and unknown `type`s are recoverable no-ops; the receive
/// loop never dies from a bad frame.
async fn handle_frame(shared: &Arc<Shared>, text: &str) {
    match codec::decode_inbound(text) {
        Ok(Decoded::Message(message)) => {
            match &message {
                InboundMessage::Assistant { message: text, .. }
                | InboundMessage::Error { message: text, .. } => {
                    // Error and assistant messages render identically
                    shared.ui.set_thinking(false);
                    shared.ui.append(text, SenderKind::Assistant);
                }
                InboundMessage::QuestionList { questions } => {
                    shared.ui.set_thinking(false);
                    shared.ui.replace_transcript(questions);
                }
                InboundMessage::CloseConnection { message, .. } => {
                    terminate(shared, message.clone()).await;
                }
            }
            shared.dispatcher.dispatch(ClientEvent::Message(message)).await;
        }
        Ok(Decoded::Unknown { kind }) => match shared.config.unknown_messages {
            UnknownMessagePolicy::Warn => {
                tracing::warn!(kind = %kind, "dropping message of unknown type")
            }
            UnknownMessagePolicy::Ignore => {}
        },
        Err(e) => {
            tracing::warn!(error = %e, "dropping malformed frame");
        }
    }
}

/// Run session termination exactly once
///
/// Idempotent: repeated termination signals (a `close.connection` message
/// followed by a terminal close code, say) neither re-render the closing text
/// nor re-disable the input.
async fn terminate(shared: &Arc<Shared>, closing: Option<String>) {
    if shared.terminated.swap(true, Ordering::SeqCst) {
        return;
    }
    shared.state.set(ConnectionState::Terminated).await;
    shared.ui.set_thinking(false);
    shared.ui.set_input_enabled(false);
    if let Some(ref text) = closing {
        shared.ui.append(text, SenderKind::Assistant);
    }
    shared
        .dispatcher
        .dispatch(ClientEvent::SessionEnded { message: closing })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::FixedDelay;
    use crate::transport::scripted::ScriptedTransport;
    use crate::transport::TokioClock;
    use chatwire_core::QuestionEntry;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    struct RecordingUi {
        appended: StdMutex<Vec<(String, SenderKind)>>,
        input_changes: StdMutex<Vec<bool>>,
    }

    impl RecordingUi {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                appended: StdMutex::new(Vec::new()),
                input_changes: StdMutex::new(Vec::new()),
            })
        }
    }

    impl ChatUi for RecordingUi {
        fn append(&self, text: &str, sender: SenderKind) {
            self.appended.lock().unwrap().push((text.to_string(), sender));
        }
        fn replace_transcript(&self, _entries: &[QuestionEntry]) {}
        fn set_input_enabled(&self, enabled: bool) {
            self.input_changes.lock().unwrap().push(enabled);
        }
        fn set_thinking(&self, _active: bool) {}
    }

    fn test_shared(ui: Arc<RecordingUi>) -> Arc<Shared> {
        Arc::new(Shared {
            config: ClientConfig::new("ws://test/").retry_interval(Duration::from_millis(1)),
            state: StateCell::new(),
            dispatcher: EventDispatcher::new(),
            ui,
            transport: ScriptedTransport::new(),
            clock: Arc::new(TokioClock),
            sink: Mutex::new(None),
            terminated: AtomicBool::new(false),
            started: AtomicBool::new(false),
            policy: std::sync::Mutex::new(Some(Box::new(
                FixedDelay::new(Duration::from_millis(1)).with_max_attempts(0),
            ))),
        })
    }

    #[tokio::test]
    async fn test_terminate_is_idempotent() {
        let ui = RecordingUi::new();
        let shared = test_shared(Arc::clone(&ui));

        let ended = Arc::new(AtomicUsize::new(0));
        let ended_clone = Arc::clone(&ended);
        shared
            .dispatcher
            .subscribe(EventKind::SessionEnded, "count", move |_event| {
                let ended = Arc::clone(&ended_clone);
                async move {
                    ended.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;

        terminate(&shared, Some("Goodbye".to_string())).await;
        terminate(&shared, Some("Goodbye".to_string())).await;
        terminate(&shared, None).await;

        assert_eq!(
            ui.appended.lock().unwrap().as_slice(),
            &[("Goodbye".to_string(), SenderKind::Assistant)]
        );
        assert_eq!(ui.input_changes.lock().unwrap().as_slice(), &[false]);
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert!(shared.state.get().await.is_terminated());
    }

    #[tokio::test]
    async fn test_terminate_without_closing_text() {
        let ui = RecordingUi::new();
        let shared = test_shared(Arc::clone(&ui));

        terminate(&shared, None).await;

        assert!(ui.appended.lock().unwrap().is_empty());
        assert_eq!(ui.input_changes.lock().unwrap().as_slice(), &[false]);
    }

    #[tokio::test]
    async fn test_malformed_frame_is_recoverable() {
        let ui = RecordingUi::new();
        let shared = test_shared(Arc::clone(&ui));

        handle_frame(&shared, "{not json").await;
        handle_frame(
            &shared,
            r#"{"type":"assistant.message","message":"still alive"}"#,
        )
        .await;

        assert_eq!(
            ui.appended.lock().unwrap().as_slice(),
            &[("still alive".to_string(), SenderKind::Assistant)]
        );
        assert!(!shared.terminated.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_unknown_type_is_dropped_without_dispatch() {
        let ui = RecordingUi::new();
        let shared = test_shared(Arc::clone(&ui));

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        shared
            .dispatcher
            .subscribe(EventKind::Message, "count", move |_event| {
                let seen = Arc::clone(&seen_clone);
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;

        handle_frame(&shared, r#"{"type":"typing.indicator"}"#).await;

        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(ui.appended.lock().unwrap().is_empty());
    }
}
