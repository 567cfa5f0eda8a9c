//! Conversation data model shared by the state machine, gateway and renderers

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Reply appended in place of the backend's answer when a turn fails.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, something went wrong. Please try again or reach us at contact@yourdomain.com.";

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single entry in the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Origin timestamp reported by the backend (assistant messages only).
    /// Informational; history order is insertion order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// The canned apology used when the backend cannot be reached
    pub fn fallback() -> Self {
        Self::assistant(FALLBACK_REPLY)
    }
}

/// A meeting time proposed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestedSlot {
    pub value: String,
}

impl SuggestedSlot {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Human-readable label, e.g. `Mon, Jan 1, 2024 10:00 AM`.
    ///
    /// Values that are not RFC 3339 timestamps are shown as-is.
    pub fn label(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.value) {
            Ok(at) => at.format("%a, %b %-d, %Y %-I:%M %p").to_string(),
            Err(_) => self.value.clone(),
        }
    }

    /// Text of the user turn sent when this slot is picked
    pub fn reply_text(&self) -> String {
        format!("Let's go with {}", self.value)
    }
}

/// Lead/meeting flags reported with a successful reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    pub lead_captured: bool,
    pub meeting_scheduled: bool,
}

/// Outcome of one backend round trip, as seen by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendResult {
    Success {
        new_assistant_messages: Vec<Message>,
        suggested_slots: Option<Vec<SuggestedSlot>>,
        outcome: TurnOutcome,
    },
    Failure {
        reason: String,
    },
}

impl BackendResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        BackendResult::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BackendResult::Success { .. })
    }
}
