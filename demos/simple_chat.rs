//! Minimal terminal chat session against a running backend.
//!
//! Run with:
//! ```bash
//! cargo run --example simple_chat -- localhost:8000 lobby
//! ```

use chatwire::client::{
    ChatUi, ClientBuilder, ClientConfig, Endpoint, EventKind, SenderKind,
};
use chatwire::core::{QuestionEntry, SENDER_USER};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

struct TerminalUi;

impl ChatUi for TerminalUi {
    fn append(&self, text: &str, sender: SenderKind) {
        let prefix = match sender {
            SenderKind::User => "you",
            SenderKind::Assistant => "assistant",
        };
        for line in text.lines() {
            println!("[{}] {}", prefix, line);
        }
    }

    fn replace_transcript(&self, entries: &[QuestionEntry]) {
        println!("--- transcript replaced ---");
        for entry in entries {
            println!("[{}] {}", entry.sender, entry.message);
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        if !enabled {
            println!("(input disabled)");
        }
    }

    fn set_thinking(&self, active: bool) {
        if active {
            println!("(thinking...)");
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost:8000".to_string());
    let room = args.next().unwrap_or_else(|| "lobby".to_string());

    let ui = Arc::new(TerminalUi);
    let config = ClientConfig::for_endpoint(&Endpoint::new(host, room));
    let client = ClientBuilder::new(config).with_ui(ui.clone()).build();

    client
        .on_event(EventKind::RetriesExhausted, "exit-notice", |_event| async {
            println!("(gave up reconnecting)");
        })
        .await;

    client.connect();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        ui.append(&line, SenderKind::User);
        ui.set_thinking(true);
        client.send(line, SENDER_USER).await;
    }
}
