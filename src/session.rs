//! Conversation session runtime
//!
//! Owns the session id, the message history and the current
//! `SessionState`. Events are processed one at a time on a single task;
//! the only suspension point is the gateway call, which runs in the
//! background and reports back through the same channel.

mod render;


pub use render::RenderSink;

use crate::config::{ConfigError, WidgetConfig};
use crate::gateway::BackendGateway;
use crate::state_machine::{transition, Effect, Event, SessionState};
use crate::types::{BackendResult, Message, SuggestedSlot};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Messages accepted by the runtime loop
#[derive(Debug)]
enum Command {
    Submit {
        text: String,
        accepted: oneshot::Sender<bool>,
    },
    Settled(BackendResult),
}

/// Single-conversation runtime, generic over transport and presentation
pub struct ConversationSession<G, R>
where
    G: BackendGateway + 'static,
    R: RenderSink + 'static,
{
    session_id: String,
    state: SessionState,
    history: Vec<Message>,
    gateway: Arc<G>,
    renderer: R,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so the loop ends once every handle is gone and nothing is in flight
    command_tx: mpsc::WeakSender<Command>,
    pending_tx: watch::Sender<bool>,
}

impl<G, R> ConversationSession<G, R>
where
    G: BackendGateway + 'static,
    R: RenderSink + 'static,
{
    /// Validate `config` and build the runtime plus a handle to drive it.
    ///
    /// # Errors
    ///
    /// Returns the config error before anything is rendered.
    pub fn new(
        config: &WidgetConfig,
        gateway: G,
        renderer: R,
    ) -> Result<(Self, SessionHandle), ConfigError> {
        config.validate()?;

        let session_id = uuid::Uuid::new_v4().to_string();
        let (command_tx, command_rx) = mpsc::channel(32);
        let (pending_tx, pending_rx) = watch::channel(false);

        let session = Self {
            session_id: session_id.clone(),
            state: SessionState::Idle,
            history: Vec::new(),
            gateway: Arc::new(gateway),
            renderer,
            command_rx,
            command_tx: command_tx.downgrade(),
            pending_tx,
        };
        let handle = SessionHandle {
            session_id: session_id.into(),
            command_tx,
            pending_rx,
        };
        Ok((session, handle))
    }

    /// Build the runtime and run it on a background task
    ///
    /// # Errors
    ///
    /// Same as [`ConversationSession::new`].
    pub fn spawn(
        config: &WidgetConfig,
        gateway: G,
        renderer: R,
    ) -> Result<SessionHandle, ConfigError> {
        let (session, handle) = Self::new(config, gateway, renderer)?;
        tokio::spawn(session.run());
        Ok(handle)
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Starting chat session");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                Command::Submit { text, accepted } => {
                    let ok = self.process_event(Event::UserTurn { text }).await;
                    // Submitter may have gone away
                    let _ = accepted.send(ok);
                }
                Command::Settled(result) => {
                    self.process_event(Event::BackendSettled { result }).await;
                }
            }
        }

        tracing::info!(
            session_id = %self.session_id,
            messages = self.history.len(),
            "Chat session stopped"
        );
    }

    /// Returns whether the initial event was accepted
    async fn process_event(&mut self, event: Event) -> bool {
        let mut events_to_process = vec![event];
        let mut accepted = None;

        while let Some(current_event) = events_to_process.pop() {
            let outcome = transition(self.state, current_event);
            accepted.get_or_insert(outcome.is_ok());

            let result = match outcome {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(
                        session_id = %self.session_id,
                        state = ?self.state,
                        reason = %e,
                        "Ignoring event"
                    );
                    continue;
                }
            };

            self.state = result.new_state;

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        accepted.unwrap_or(false)
    }

    /// Execute an effect and optionally return a generated event
    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::AppendMessage(message) => {
                self.renderer.on_message_appended(&message);
                self.history.push(message);
                None
            }

            Effect::NotifyPending(is_pending) => {
                self.pending_tx.send_replace(is_pending);
                self.renderer.on_pending_state_changed(is_pending);
                None
            }

            Effect::OfferSlots(slots) => {
                self.renderer.on_suggested_slots(&slots);
                None
            }

            Effect::ReportOutcome(outcome) => {
                self.renderer.on_turn_outcome(outcome);
                None
            }

            Effect::RequestBackend { message } => {
                // History sent is everything before the turn being submitted
                let prior = match self.history.split_last() {
                    Some((last, rest)) if *last == message => rest.to_vec(),
                    _ => self.history.clone(),
                };
                let gateway = Arc::clone(&self.gateway);
                let session_id = self.session_id.clone();

                let Some(command_tx) = self.command_tx.upgrade() else {
                    // No handle left to keep the loop alive: settle inline
                    let result = send_guarded(gateway, session_id, message, prior).await;
                    return Some(Event::BackendSettled { result });
                };

                tokio::spawn(async move {
                    tracing::debug!(session_id = %session_id, "Sending chat turn (background)");
                    let result = send_guarded(gateway, session_id, message, prior).await;
                    if command_tx.send(Command::Settled(result)).await.is_err() {
                        tracing::warn!("Session stopped before the chat turn settled");
                    }
                });
                None
            }
        }
    }
}

/// Run one gateway call on its own task; a panic settles as `Failure`
async fn send_guarded<G>(
    gateway: Arc<G>,
    session_id: String,
    message: Message,
    prior: Vec<Message>,
) -> BackendResult
where
    G: BackendGateway + 'static,
{
    tokio::spawn(async move { gateway.send_turn(&session_id, &message, &prior).await })
        .await
        .unwrap_or_else(|e| BackendResult::failure(format!("Gateway task failed: {e}")))
}

/// Cloneable front door to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: Arc<str>,
    command_tx: mpsc::Sender<Command>,
    pending_rx: watch::Receiver<bool>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Submit raw user text.
    ///
    /// Returns `false` when the turn was ignored: blank text, a request
    /// already in flight, or a stopped session. Never fails otherwise.
    pub async fn submit_user_turn(&self, text: impl Into<String>) -> bool {
        let (accepted_tx, accepted_rx) = oneshot::channel();
        let command = Command::Submit {
            text: text.into(),
            accepted: accepted_tx,
        };
        if self.command_tx.send(command).await.is_err() {
            tracing::warn!(session_id = %self.session_id, "Session stopped, dropping turn");
            return false;
        }
        accepted_rx.await.unwrap_or(false)
    }

    /// Reply with a backend-proposed meeting time.
    /// Subject to the same one-request-at-a-time rule as typed turns.
    pub async fn select_slot(&self, slot: &SuggestedSlot) -> bool {
        self.submit_user_turn(slot.reply_text()).await
    }

    pub fn is_pending(&self) -> bool {
        *self.pending_rx.borrow()
    }

    /// Resolve once no request is in flight
    pub async fn wait_idle(&self) {
        let mut rx = self.pending_rx.clone();
        // Err only if the runtime is gone, which also means idle
        let _ = rx.wait_for(|pending| !*pending).await;
    }
}
