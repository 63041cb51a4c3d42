//! Terminal front-end for the chat widget.
//!
//! Lines read from stdin are sent as user messages. `/reset` starts a new
//! conversation and `/quit` (or EOF) exits.

use anyhow::{Context, Result};
use chat_widget::backend::{ChatBackend, HttpBackend};
use chat_widget::config::{WidgetConfig, load_dotenv};
use chat_widget::controller::{ChatController, ExchangeTicket, ResetOutcome, SubmitOutcome};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

struct Terminal {
    controller: ChatController,
    backend: HttpBackend,
    greeting_delay: Duration,
    printed: usize,
}

impl Terminal {
    fn new(config: &WidgetConfig) -> Result<Self> {
        let backend = HttpBackend::new(&config.base_url).context("failed to build HTTP client")?;
        Ok(Self {
            controller: ChatController::new(config.fallback.clone()),
            backend,
            greeting_delay: config.greeting_delay,
            printed: 0,
        })
    }

    /// Print transcript entries appended since the last call.
    fn flush(&mut self) {
        let messages = self.controller.transcript().messages();
        for message in messages.iter().skip(self.printed) {
            println!(
                "[{}] {}: {}",
                message.timestamp,
                message.sender.label(),
                message.content
            );
        }
        self.printed = messages.len();
    }

    async fn exchange(&mut self, ticket: ExchangeTicket) {
        println!("bot is typing…");
        let result = self.backend.send_message(ticket.content()).await;
        self.controller.complete_exchange(ticket, result);
        self.flush();
    }

    async fn greet(&mut self) {
        let epoch = self.controller.epoch();
        tokio::time::sleep(self.greeting_delay).await;
        if let Some(ticket) = self.controller.begin_greeting(epoch) {
            self.exchange(ticket).await;
        }
    }

    async fn submit(&mut self, line: &str) {
        match self.controller.submit(line) {
            SubmitOutcome::Started(ticket) => {
                self.flush();
                self.exchange(ticket).await;
            }
            SubmitOutcome::Empty | SubmitOutcome::Busy => {}
        }
    }

    async fn reset(&mut self) {
        let ticket = self.controller.begin_reset();
        self.printed = 0;
        println!("-- conversation cleared --");
        let result = self.backend.reset_conversation().await;
        match self.controller.complete_reset(ticket, result) {
            ResetOutcome::Greet => self.greet().await,
            ResetOutcome::Failed | ResetOutcome::Stale => self.flush(),
        }
    }
}

async fn run(config: WidgetConfig) -> Result<()> {
    tracing::info!(base_url = %config.base_url, "starting chat session");
    let mut terminal = Terminal::new(&config)?;
    terminal.greet().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/reset" => terminal.reset().await,
            text => terminal.submit(text).await,
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    load_dotenv();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = WidgetConfig::from_env()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}
