//! Common test utilities for chatwire-client integration tests
//!
//! Provides a mock WebSocket server for exercising the real transport, a
//! recording UI collaborator, and small polling helpers.

#![allow(dead_code)]

use chatwire_client::{ChatClient, ChatUi, ConnectionState, SenderKind};
use chatwire_core::QuestionEntry;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

/// One step of a mock server's per-connection behavior
#[derive(Debug, Clone)]
pub enum ServerAction {
    /// Send a text frame to the client
    Send(String),
    /// Complete the close handshake with the given code
    CloseWith(u16),
    /// Pause before the next action
    Wait(u64),
}

/// Mock chat backend replaying a fixed script on every accepted connection
pub struct MockChatServer {
    addr: SocketAddr,
    frame_rx: mpsc::UnboundedReceiver<String>,
}

impl MockChatServer {
    pub async fn start(script: Vec<ServerAction>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let script = script.clone();
                let frame_tx = frame_tx.clone();
                tokio::spawn(async move {
                    let Ok(ws) = accept_async(stream).await else {
                        return;
                    };
                    let (mut write, mut read) = ws.split();

                    // Forward client frames for test assertions
                    let reader = tokio::spawn(async move {
                        while let Some(Ok(message)) = read.next().await {
                            if let Message::Text(text) = message {
                                let _ = frame_tx.send(text);
                            }
                        }
                    });

                    for action in script {
                        match action {
                            ServerAction::Send(text) => {
                                let _ = write.send(Message::Text(text)).await;
                            }
                            ServerAction::CloseWith(code) => {
                                let _ = write
                                    .send(Message::Close(Some(CloseFrame {
                                        code: WsCloseCode::from(code),
                                        reason: "".into(),
                                    })))
                                    .await;
                                break;
                            }
                            ServerAction::Wait(ms) => {
                                tokio::time::sleep(Duration::from_millis(ms)).await;
                            }
                        }
                    }

                    // Hold the connection until the client goes away
                    let _ = reader.await;
                });
            }
        });

        Self { addr, frame_rx }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Next text frame received from the client, within five seconds
    pub async fn next_client_frame(&mut self) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(5), self.frame_rx.recv())
            .await
            .ok()
            .flatten()
    }
}

/// UI collaborator that records everything the client drives
#[derive(Default)]
pub struct RecordingUi {
    /// Rendered transcript view: appends push, replaces overwrite
    transcript: Mutex<Vec<String>>,
    /// Raw log of append calls
    appended: Mutex<Vec<(String, SenderKind)>>,
    input_changes: Mutex<Vec<bool>>,
    thinking: Mutex<bool>,
}

impl RecordingUi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn transcript(&self) -> Vec<String> {
        self.transcript.lock().unwrap().clone()
    }

    pub fn appended(&self) -> Vec<(String, SenderKind)> {
        self.appended.lock().unwrap().clone()
    }

    pub fn last_input_enabled(&self) -> Option<bool> {
        self.input_changes.lock().unwrap().last().copied()
    }

    pub fn is_thinking(&self) -> bool {
        *self.thinking.lock().unwrap()
    }

    /// Simulate the embedding UI showing its "generating" indicator
    pub fn show_thinking(&self) {
        *self.thinking.lock().unwrap() = true;
    }
}

impl ChatUi for RecordingUi {
    fn append(&self, text: &str, sender: SenderKind) {
        self.transcript.lock().unwrap().push(text.to_string());
        self.appended
            .lock()
            .unwrap()
            .push((text.to_string(), sender));
    }

    fn replace_transcript(&self, entries: &[QuestionEntry]) {
        *self.transcript.lock().unwrap() =
            entries.iter().map(|entry| entry.message.clone()).collect();
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input_changes.lock().unwrap().push(enabled);
    }

    fn set_thinking(&self, active: bool) {
        *self.thinking.lock().unwrap() = active;
    }
}

/// Poll `cond` until it holds or `timeout_ms` elapses
pub async fn wait_until(cond: impl Fn() -> bool, timeout_ms: u64) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

/// Poll the client until it reaches `want` or `timeout_ms` elapses
pub async fn wait_for_state(client: &ChatClient, want: ConnectionState, timeout_ms: u64) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if client.state().await == want {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    client.state().await == want
}

/// Wire frame helpers matching the backend's message shapes

pub fn assistant_frame(text: &str) -> String {
    serde_json::json!({"type": "assistant.message", "message": text, "sender": "assistant"})
        .to_string()
}

pub fn error_frame(text: &str) -> String {
    serde_json::json!({"type": "error.message", "message": text, "sender": "assistant"}).to_string()
}

pub fn close_frame(text: Option<&str>) -> String {
    match text {
        Some(text) => {
            serde_json::json!({"type": "close.connection", "message": text}).to_string()
        }
        None => serde_json::json!({"type": "close.connection"}).to_string(),
    }
}

pub fn question_list_frame(entries: &[(&str, &str)]) -> String {
    let questions: Vec<serde_json::Value> = entries
        .iter()
        .map(|(message, sender)| serde_json::json!({"message": message, "sender": sender}))
        .collect();
    serde_json::json!({"type": "question.list", "questions": questions}).to_string()
}
