//! chatwire - persistent-connection chat client
//!
//! This is the main convenience crate that re-exports the chatwire
//! sub-crates. Use this crate for a single dependency covering both the wire
//! protocol and the connection-managing client.
//!
//! # Architecture
//!
//! chatwire is organized into modular crates:
//!
//! - **chatwire-core**: envelope types, codec, close codes, error handling
//! - **chatwire-client**: connection manager with bounded reconnection,
//!   typed event dispatch, transport/clock seams, UI collaborator surface
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chatwire::client::{ClientBuilder, ClientConfig, ClientEvent, Endpoint, EventKind};
//!
//! #[tokio::main]
//! async fn main() {
//!     let endpoint = Endpoint::new("localhost:8000", "lobby").secure(false);
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
//! }
//! ```

// Re-export the sub-crates under stable module names
pub use chatwire_client as client;
pub use chatwire_core as core;

// Convenience re-exports of the most commonly used types
pub use chatwire_client::{ChatClient, ClientBuilder, ClientConfig, ClientEvent, Endpoint};
pub use chatwire_core::{InboundMessage, OutboundEnvelope};
