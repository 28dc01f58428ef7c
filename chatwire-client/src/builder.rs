//! Client builder
//!
//! Fluent construction of a [`ChatClient`] from an injected configuration,
//! with optional substitution of the transport, clock, retry policy, and UI
//! collaborator. Nothing here is ambient: the embedding application owns the
//! configuration and the built client.
//!
//! # Examples
//!
//! ```rust,no_run
//! use chatwire_client::{ClientBuilder, ClientConfig, Endpoint};
//!
//! # async fn example() {
//! let config = ClientConfig::for_endpoint(&Endpoint::new("localhost:8000", "lobby"));
//! let client = ClientBuilder::new(config).build();
//!
//! // Register handlers first, then start the connection, as the
//! // embedding page would.
//! client.connect();
//! # }
//! ```

use crate::config::ClientConfig;
use crate::dispatcher::EventDispatcher;
use crate::manager::{ChatClient, Shared};
use crate::retry::{FixedDelay, RetryPolicy};
use crate::state::StateCell;
use crate::transport::{Clock, TokioClock, Transport, WsTransport};
use crate::ui::{ChatUi, NullUi};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Builder for configuring and creating a [`ChatClient`]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
    retry_policy: Option<Box<dyn RetryPolicy>>,
    ui: Option<Arc<dyn ChatUi>>,
}

impl ClientBuilder {
    /// Create a builder for the given configuration
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            clock: None,
            retry_policy: None,
            ui: None,
        }
    }

    /// Substitute the transport (defaults to [`WsTransport`])
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Substitute the clock (defaults to [`TokioClock`])
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Substitute the retry policy
    ///
    /// Defaults to a [`FixedDelay`] built from the configuration's
    /// `retry_interval` and `max_retries`.
    pub fn with_retry_policy(mut self, policy: Box<dyn RetryPolicy>) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Attach the UI collaborator (defaults to [`NullUi`])
    pub fn with_ui(mut self, ui: Arc<dyn ChatUi>) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Build the client without connecting
    ///
    /// Call [`ChatClient::connect`] to start the run loop, typically after
    /// registering event handlers.
    pub fn build(self) -> ChatClient {
        let retry_policy = self.retry_policy.unwrap_or_else(|| {
            Box::new(
                FixedDelay::new(self.config.retry_interval)
                    .with_max_attempts(self.config.max_retries),
            )
        });

        let shared = Arc::new(Shared {
            config: self.config,
            state: StateCell::new(),
            dispatcher: EventDispatcher::new(),
            ui: self.ui.unwrap_or_else(|| Arc::new(NullUi)),
            transport: self.transport.unwrap_or_else(|| Arc::new(WsTransport)),
            clock: self.clock.unwrap_or_else(|| Arc::new(TokioClock)),
            sink: Mutex::new(None),
            terminated: AtomicBool::new(false),
            started: AtomicBool::new(false),
            policy: std::sync::Mutex::new(Some(retry_policy)),
        });

        ChatClient { shared }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConnectionState;
    use crate::transport::scripted::ScriptedTransport;
    use std::time::Duration;

    #[tokio::test]
    async fn test_build_does_not_connect() {
        let transport = ScriptedTransport::new();
        let config = ClientConfig::new("ws://test/");
        let _client = ClientBuilder::new(config)
            .with_transport(transport.clone())
            .build();

        assert_eq!(transport.connect_attempts(), 0);
    }

    #[tokio::test]
    async fn test_second_connect_is_a_noop() {
        let transport = ScriptedTransport::new();
        let _session = transport.push_live_session();
        let config = ClientConfig::new("ws://test/").retry_interval(Duration::from_millis(5));
        let client = ClientBuilder::new(config)
            .with_transport(transport.clone())
            .build();

        client.connect();
        // Must not panic or spawn a second loop
        client.connect();

        tokio::time::timeout(Duration::from_secs(1), async {
            while !client.is_open().await {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("client never opened");

        assert_eq!(transport.connect_attempts(), 1);
        assert_eq!(client.state().await, ConnectionState::Open);
    }
}
