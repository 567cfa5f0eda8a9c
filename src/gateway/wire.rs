//! Chat endpoint wire format

use crate::types::{BackendResult, Message, Role, SuggestedSlot, TurnOutcome};
use serde::{Deserialize, Serialize};

/// `{role, content}` pair as sent in requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub widget: String,
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self {
            widget: "web".to_string(),
        }
    }
}

/// POST body for `/api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: WireMessage,
    pub history: Vec<WireMessage>,
    pub metadata: RequestMetadata,
}

impl ChatRequest {
    pub fn new(session_id: &str, latest: &Message, history: &[Message]) -> Self {
        Self {
            session_id: session_id.to_string(),
            message: WireMessage {
                role: Role::User,
                content: latest.content.clone(),
            },
            history: history.iter().map(WireMessage::from).collect(),
            metadata: RequestMetadata::default(),
        }
    }
}

/// Response body from `/api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub lead_captured: bool,
    #[serde(default)]
    pub meeting_scheduled: bool,
    #[serde(default)]
    pub suggested_slots: Option<Vec<String>>,
}

impl ChatResponse {
    /// Map into a session result.
    ///
    /// Only the last assistant message is surfaced; earlier assistant
    /// entries and any user/system echoes are dropped.
    pub fn into_result(self) -> BackendResult {
        let latest = self
            .messages
            .into_iter()
            .rev()
            .find(|m| m.role == Role::Assistant);

        BackendResult::Success {
            new_assistant_messages: latest.into_iter().collect(),
            suggested_slots: self
                .suggested_slots
                .map(|slots| slots.into_iter().map(SuggestedSlot::new).collect()),
            outcome: TurnOutcome {
                lead_captured: self.lead_captured,
                meeting_scheduled: self.meeting_scheduled,
            },
        }
    }
}
