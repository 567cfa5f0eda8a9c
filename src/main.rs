//! Terminal front end for the chat session
//!
//! Plays the role of the embedding page: reads configuration, renders the
//! conversation to stdout and forwards typed lines as user turns.

use bizchat::{
    ConversationSession, HttpGateway, LoggingGateway, Message, RenderSink, Role, SuggestedSlot,
    TurnOutcome, WidgetConfig,
};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints conversation deltas and remembers the latest offered slots
#[derive(Default)]
struct TerminalRenderer {
    slots: Mutex<Vec<SuggestedSlot>>,
}

impl TerminalRenderer {
    fn slot(&self, index: usize) -> Option<SuggestedSlot> {
        self.slots
            .lock()
            .ok()
            .and_then(|slots| slots.get(index).cloned())
    }
}

impl RenderSink for TerminalRenderer {
    fn on_message_appended(&self, message: &Message) {
        let who = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        println!("[{who}] {}", message.content);
    }

    fn on_suggested_slots(&self, slots: &[SuggestedSlot]) {
        println!("Suggested times (type /slot N to pick one):");
        for (i, slot) in slots.iter().enumerate() {
            println!("  {}. {}", i + 1, slot.label());
        }
        if let Ok(mut current) = self.slots.lock() {
            *current = slots.to_vec();
        }
    }

    fn on_pending_state_changed(&self, is_pending: bool) {
        if is_pending {
            println!("(sending...)");
        }
    }

    fn on_turn_outcome(&self, outcome: TurnOutcome) {
        if outcome.meeting_scheduled {
            println!("(meeting scheduled)");
        } else if outcome.lead_captured {
            println!("(contact details received)");
        }
    }
}

fn prompt(placeholder: &str) {
    print!("{placeholder} > ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizchat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = WidgetConfig::from_env();
    let gateway = HttpGateway::new(&config)?;

    if let Err(e) = gateway.health_check().await {
        tracing::warn!(
            error = %e,
            url = %config.base_url.trim(),
            "Chat backend health check failed"
        );
    }

    let renderer = Arc::new(TerminalRenderer::default());
    let handle = ConversationSession::spawn(
        &config,
        LoggingGateway::new(gateway),
        Arc::clone(&renderer),
    )?;
    tracing::info!(session_id = %handle.session_id(), "Chat session ready");

    println!("{}", config.title);
    prompt(&config.placeholder);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        let accepted = if let Some(arg) = line.strip_prefix("/slot") {
            match arg.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                Some(index) => match renderer.slot(index) {
                    Some(slot) => handle.select_slot(&slot).await,
                    None => {
                        println!("No such slot.");
                        false
                    }
                },
                None => {
                    println!("Usage: /slot N");
                    false
                }
            }
        } else {
            handle.submit_user_turn(line).await
        };

        if accepted {
            handle.wait_idle().await;
        }
        prompt(&config.placeholder);
    }

    Ok(())
}
