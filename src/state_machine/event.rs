//! Events that can occur in a session

use crate::types::BackendResult;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Raw text submitted by the user (or synthesized from a slot pick)
    UserTurn { text: String },

    /// The gateway call for the in-flight turn has settled
    BackendSettled { result: BackendResult },
}

impl Event {
    pub fn user_turn(text: impl Into<String>) -> Self {
        Event::UserTurn { text: text.into() }
    }
}
