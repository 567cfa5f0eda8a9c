//! Presentation collaborator notified by the session runtime

use crate::types::{Message, SuggestedSlot, TurnOutcome};
use std::sync::Arc;

/// Receives conversation deltas, in order, from the runtime task.
///
/// Implementations only observe; history is never handed out mutably.
pub trait RenderSink: Send + Sync {
    /// Called once per message added to history
    fn on_message_appended(&self, message: &Message);

    /// Called when a reply carries a non-empty slot list
    fn on_suggested_slots(&self, slots: &[SuggestedSlot]);

    /// Called on every Idle/Awaiting transition
    fn on_pending_state_changed(&self, is_pending: bool);

    /// Lead/meeting flags from a successful reply
    fn on_turn_outcome(&self, _outcome: TurnOutcome) {}
}

impl<T: RenderSink + ?Sized> RenderSink for Arc<T> {
    fn on_message_appended(&self, message: &Message) {
        (**self).on_message_appended(message);
    }

    fn on_suggested_slots(&self, slots: &[SuggestedSlot]) {
        (**self).on_suggested_slots(slots);
    }

    fn on_pending_state_changed(&self, is_pending: bool) {
        (**self).on_pending_state_changed(is_pending);
    }

    fn on_turn_outcome(&self, outcome: TurnOutcome) {
        (**self).on_turn_outcome(outcome);
    }
}
