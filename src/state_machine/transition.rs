//! Pure state transition function
//!
//! Idle --UserTurn--> Awaiting --BackendSettled--> Idle.
//! Everything else is rejected without touching state.

use super::{Effect, Event, SessionState};
use crate::types::{BackendResult, Message};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Reasons an event is ignored. None of these reach the submitter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("A request is already in flight")]
    RequestPending,
    #[error("Backend reply arrived with no request in flight")]
    UnexpectedReply,
}

/// Pure transition function
///
/// Given the same inputs, it always produces the same outputs, with no I/O.
pub fn transition(
    state: SessionState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Busy: at most one request per session
        (SessionState::Awaiting, Event::UserTurn { .. }) => Err(TransitionError::RequestPending),

        (SessionState::Idle, Event::UserTurn { text }) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyMessage);
            }
            let message = Message::user(text);
            Ok(TransitionResult::new(SessionState::Awaiting)
                .with_effect(Effect::append(message.clone()))
                .with_effect(Effect::NotifyPending(true))
                .with_effect(Effect::request_backend(message)))
        }

        (SessionState::Awaiting, Event::BackendSettled { result }) => {
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effects(settle_effects(result))
                .with_effect(Effect::NotifyPending(false)))
        }

        (SessionState::Idle, Event::BackendSettled { .. }) => {
            Err(TransitionError::UnexpectedReply)
        }
    }
}

fn settle_effects(result: BackendResult) -> Vec<Effect> {
    match result {
        BackendResult::Success {
            new_assistant_messages,
            suggested_slots,
            outcome,
        } => {
            let mut effects: Vec<Effect> = new_assistant_messages
                .into_iter()
                .map(Effect::append)
                .collect();
            if let Some(slots) = suggested_slots.filter(|s| !s.is_empty()) {
                effects.push(Effect::OfferSlots(slots));
            }
            effects.push(Effect::ReportOutcome(outcome));
            effects
        }
        // Failures are absorbed into the conversation
        BackendResult::Failure { .. } => vec![Effect::append(Message::fallback())],
    }
}
