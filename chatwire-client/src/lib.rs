//! Persistent-connection chat client
//!
//! This crate provides a client that manages a single duplex channel to a
//! chat backend: connection lifecycle, automatic reconnection under failure,
//! the minimal message envelope protocol, and typed event dispatch to
//! consumers.
//!
//! # Core Features
//!
//! - **Connection management**: one live socket per client, driven through a
//!   `Connecting → Open → Closed` lifecycle with a permanently absorbing
//!   terminated state
//! - **Bounded reconnection**: fixed-delay retries with a budget that refills
//!   on every successful open; terminal close codes (4000, 4001) suppress
//!   reconnection forever
//! - **Typed events**: a closed [`ClientEvent`] union instead of stringly
//!   keyed callbacks
//! - **Injectable seams**: transport, clock, retry policy, and UI
//!   collaborator are traits, so the whole lifecycle is testable with
//!   scripted connections and no network endpoint
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chatwire_client::{ClientBuilder, ClientConfig, ClientEvent, Endpoint, EventKind};
//!
//! #[tokio::main]
//! async fn main() {
//!     let endpoint = Endpoint::new("localhost:8000", "lobby");
//!     let client = ClientBuilder::new(ClientConfig::for_endpoint(&endpoint)).build();
//!
//!     client
//!         .on_event(EventKind::Message, "print", |event| async move {
//!             if let ClientEvent::Message(message) = event {
//!                 if let Some(text) = message.text() {
//!                     println!("<- {}", text);
//!                 }
//!             }
//!         })
//!         .await;
//!
//!     client.connect();
//!     client.send("hello", chatwire_core::SENDER_USER).await;
//! }
//! ```
//!
//! # Failure Model
//!
//! No failure crosses this API as an error: sends while closed are dropped
//! with a diagnostic, malformed frames are logged and skipped, socket errors
//! funnel into the reconnect path, and retry exhaustion surfaces as a
//! [`ClientEvent::RetriesExhausted`] plus a disabled UI.

mod builder;
mod config;
mod dispatcher;
mod manager;
mod retry;
mod state;
mod transport;
mod ui;

pub use builder::ClientBuilder;
pub use config::{
    ClientConfig, Endpoint, UnknownMessagePolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL,
};
pub use dispatcher::{ClientEvent, EventDispatcher, EventFn, EventKind};
pub use manager::{ChatClient, RETRY_EXHAUSTED_NOTICE};
pub use retry::{FixedDelay, NoReconnect, RetryPolicy};
pub use state::ConnectionState;
pub use transport::{
    scripted, Clock, FrameSink, FrameStream, TokioClock, Transport, TransportEvent, WsTransport,
};
pub use ui::{ChatUi, NullUi, SenderKind};
