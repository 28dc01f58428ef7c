//! Typed event dispatch
//!
//! Consumers observe the client through a closed event union instead of
//! string-keyed callbacks: every message kind and lifecycle transition is a
//! [`ClientEvent`] variant, so a match over events is checked for
//! exhaustiveness at compile time.
//!
//! # Dispatch Semantics
//!
//! - Handlers are registered per [`EventKind`] under a caller-chosen key;
//!   registering the same key twice for one kind is a no-op, so a handler is
//!   never double-invoked for a single event.
//! - All handlers for an event run to completion before `dispatch` returns.
//! - Relative order between distinct handlers of one event is unspecified.
//! - Dispatching with no registered handlers is a no-op, not an error.
//!
//! # Examples
//!
//! ```rust
//! use chatwire_client::{ClientEvent, EventDispatcher, EventKind};
//!
//! # async fn example() {
//! let dispatcher = EventDispatcher::new();
//! dispatcher
//!     .subscribe(EventKind::Opened, "log", |_event| async {
//!         println!("connected");
//!     })
//!     .await;
//! dispatcher.dispatch(ClientEvent::Opened).await;
//! # }
//! ```

use chatwire_core::InboundMessage;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Events emitted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The channel opened (initial connect or successful reconnect)
    Opened,
    /// A classified inbound message arrived
    Message(InboundMessage),
    /// The session was terminated by the server
    ///
    /// Carries the server-supplied closing text, if any.
    SessionEnded { message: Option<String> },
    /// The retry budget ran out; the client is permanently disconnected
    RetriesExhausted,
}

/// Discriminant of [`ClientEvent`], used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Opened,
    Message,
    SessionEnded,
    RetriesExhausted,
}

impl ClientEvent {
    /// The kind this event dispatches under
    pub fn kind(&self) -> EventKind {
        match self {
            ClientEvent::Opened => EventKind::Opened,
            ClientEvent::Message(_) => EventKind::Message,
            ClientEvent::SessionEnded { .. } => EventKind::SessionEnded,
            ClientEvent::RetriesExhausted => EventKind::RetriesExhausted,
        }
    }
}

/// Type for event handler functions
pub type EventFn =
    Arc<dyn Fn(ClientEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Registry mapping event kinds to keyed handler sets
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Arc<Mutex<HashMap<EventKind, HashMap<String, EventFn>>>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register `handler` for `kind` under `key`
    ///
    /// Returns `false` (and leaves the existing handler untouched) when `key`
    /// is already registered for this kind.
    pub async fn subscribe<F, Fut>(&self, kind: EventKind, key: impl Into<String>, handler: F) -> bool
    where
        F: Fn(ClientEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut handlers = self.handlers.lock().await;
        match handlers.entry(kind).or_default().entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(move |event| Box::pin(handler(event))));
                true
            }
        }
    }

    /// Remove the handler registered for `kind` under `key`
    pub async fn unsubscribe(&self, kind: EventKind, key: &str) -> bool {
        let mut handlers = self.handlers.lock().await;
        handlers
            .get_mut(&kind)
            .map(|set| set.remove(key).is_some())
            .unwrap_or(false)
    }

    /// Invoke every handler registered for the event's kind
    ///
    /// Handlers are awaited one after another; all complete before this
    /// returns. Iteration order over the handler set is unspecified.
    pub async fn dispatch(&self, event: ClientEvent) {
        let to_run: Vec<EventFn> = {
            let handlers = self.handlers.lock().await;
            match handlers.get(&event.kind()) {
                Some(set) => set.values().cloned().collect(),
                None => return,
            }
        };
        // Lock released above so handlers may themselves subscribe
        for handler in to_run {
            handler(event.clone()).await;
        }
    }

    /// Number of handlers registered for `kind`
    pub async fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .lock()
            .await
            .get(&kind)
            .map(|set| set.len())
            .unwrap_or(0)
    }
}
