//! Effects produced by state transitions

use crate::types::{Message, SuggestedSlot, TurnOutcome};

/// Effects to be executed, in order, after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Push a message onto the history and notify the renderer
    AppendMessage(Message),

    /// Send the turn to the backend. History sent alongside is everything
    /// before `message`.
    RequestBackend { message: Message },

    /// Pending flag changed
    NotifyPending(bool),

    /// Offer the backend's proposed meeting times
    OfferSlots(Vec<SuggestedSlot>),

    /// Pass lead/meeting flags through to the renderer
    ReportOutcome(TurnOutcome),
}

impl Effect {
    pub fn append(message: Message) -> Self {
        Effect::AppendMessage(message)
    }

    pub fn request_backend(message: Message) -> Self {
        Effect::RequestBackend { message }
    }
}
