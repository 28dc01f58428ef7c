//! Client configuration and endpoint construction
//!
//! There is no module-scope singleton or ambient configuration: the embedding
//! application builds a [`ClientConfig`] (usually from an [`Endpoint`]) and
//! hands it to the [`crate::ClientBuilder`]. The defaults mirror the
//! reference deployment: three retries, five seconds apart.

use std::time::Duration;

/// Default bound on reconnection attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default fixed delay between reconnection attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// What to do with a well-formed frame whose `type` is unrecognized
///
/// The payload is dropped either way; the policy only controls whether the
/// drop leaves a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownMessagePolicy {
    /// Drop silently
    Ignore,
    /// Drop with a logged warning
    #[default]
    Warn,
}

/// Chat endpoint described by its parts
///
/// The host and room identifiers are opaque values supplied by the embedding
/// environment. The scheme follows the embedding page: secure pages get
/// `wss://`, everything else `ws://`.
///
/// # Examples
///
/// ```rust
/// use chatwire_client::Endpoint;
///
/// let endpoint = Endpoint::new("chat.example.org", "room42").secure(true);
/// assert_eq!(endpoint.url(), "wss://chat.example.org/ws/chat/room42/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub room: String,
    pub secure: bool,
}

impl Endpoint {
    /// Describe an endpoint; insecure scheme by default
    pub fn new(host: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            room: room.into(),
            secure: false,
        }
    }

    /// Select the secure scheme when the hosting page is secure
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// The full connection URL
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}/ws/chat/{}/", scheme, self.host, self.room)
    }
}

/// Configuration for a chat client instance
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Target URL of the chat backend
    pub url: String,
    /// Bound on reconnection attempts per disconnect streak
    pub max_retries: u32,
    /// Fixed delay between reconnection attempts
    pub retry_interval: Duration,
    /// Policy for frames with an unrecognized `type`
    pub unknown_messages: UnknownMessagePolicy,
}

impl ClientConfig {
    /// Configuration with default retry policy for a raw URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            unknown_messages: UnknownMessagePolicy::default(),
        }
    }

    /// Configuration for an endpoint described by its parts
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        Self::new(endpoint.url())
    }

    /// Override the retry budget
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the delay between attempts
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Override the unknown-message policy
    pub fn unknown_messages(mut self, policy: UnknownMessagePolicy) -> Self {
        self.unknown_messages = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_insecure() {
        let endpoint = Endpoint::new("localhost:8000", "lobby");
        assert_eq!(endpoint.url(), "ws://localhost:8000/ws/chat/lobby/");
    }

    #[test]
    fn test_endpoint_url_secure() {
        let endpoint = Endpoint::new("chat.example.org", "room42").secure(true);
        assert_eq!(endpoint.url(), "wss://chat.example.org/ws/chat/room42/");
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("ws://localhost:8000/ws/chat/lobby/");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_interval, Duration::from_secs(5));
        assert_eq!(config.unknown_messages, UnknownMessagePolicy::Warn);
    }

    #[test]
    fn test_config_overrides() {
        let config = ClientConfig::new("ws://x/")
            .max_retries(1)
            .retry_interval(Duration::from_millis(50))
            .unknown_messages(UnknownMessagePolicy::Ignore);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_interval, Duration::from_millis(50));
        assert_eq!(config.unknown_messages, UnknownMessagePolicy::Ignore);
    }

    #[test]
    fn test_config_from_endpoint() {
        let config = ClientConfig::for_endpoint(&Endpoint::new("h", "r"));
        assert_eq!(config.url, "ws://h/ws/chat/r/");
    }
}
