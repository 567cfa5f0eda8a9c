//! Backend gateway
//!
//! Translates between the session and the remote chat service. One attempt
//! per turn: every transport problem becomes `BackendResult::Failure`.

mod error;
mod http;
mod wire;

pub use error::{GatewayBuildError, GatewayError, GatewayErrorKind};
pub use http::{HttpGateway, REQUEST_TIMEOUT};
pub use wire::{ChatRequest, ChatResponse, RequestMetadata, WireMessage};

use crate::types::{BackendResult, Message};
use async_trait::async_trait;
use std::sync::Arc;

/// Transport seam used by the session runtime
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Send one user turn. `history` holds the turns before `latest`.
    async fn send_turn(
        &self,
        session_id: &str,
        latest: &Message,
        history: &[Message],
    ) -> BackendResult;
}

#[async_trait]
impl<T: BackendGateway + ?Sized> BackendGateway for Arc<T> {
    async fn send_turn(
        &self,
        session_id: &str,
        latest: &Message,
        history: &[Message],
    ) -> BackendResult {
        (**self).send_turn(session_id, latest, history).await
    }
}

/// Logging wrapper for gateways
pub struct LoggingGateway<G> {
    inner: G,
}

impl<G: BackendGateway> LoggingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<G: BackendGateway> BackendGateway for LoggingGateway<G> {
    async fn send_turn(
        &self,
        session_id: &str,
        latest: &Message,
        history: &[Message],
    ) -> BackendResult {
        let start = std::time::Instant::now();
        let result = self.inner.send_turn(session_id, latest, history).await;
        let duration = start.elapsed();

        match &result {
            BackendResult::Success {
                new_assistant_messages,
                suggested_slots,
                outcome,
            } => {
                tracing::info!(
                    session_id = %session_id,
                    duration_ms = %duration.as_millis(),
                    history_len = history.len(),
                    replies = new_assistant_messages.len(),
                    slots = suggested_slots.as_ref().map_or(0, Vec::len),
                    lead_captured = outcome.lead_captured,
                    meeting_scheduled = outcome.meeting_scheduled,
                    "Chat turn completed"
                );
            }
            BackendResult::Failure { reason } => {
                tracing::error!(
                    session_id = %session_id,
                    duration_ms = %duration.as_millis(),
                    reason = %reason,
                    "Chat send failed"
                );
            }
        }

        result
    }
}
