//! Session state

use serde::{Deserialize, Serialize};

/// Submission state of a session.
///
/// `Awaiting` holds while exactly one backend request is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for user input
    #[default]
    Idle,
    /// Backend request in flight; new turns are ignored
    Awaiting,
}

impl SessionState {
    pub fn is_pending(self) -> bool {
        matches!(self, SessionState::Awaiting)
    }
}
