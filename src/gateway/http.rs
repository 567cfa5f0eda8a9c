//! HTTP/JSON gateway to the chat backend

use super::wire::{ChatRequest, ChatResponse};
use super::{BackendGateway, GatewayBuildError, GatewayError};
use crate::config::WidgetConfig;
use crate::types::{BackendResult, Message};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

/// Fixed per-request timeout. There are no retries.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(15_000);

/// reqwest-backed gateway posting to `<base_url>/api/chat`
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    chat_url: Url,
    health_url: Url,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Fails if the config has no usable base URL or the HTTP client
    /// cannot be built.
    pub fn new(config: &WidgetConfig) -> Result<Self, GatewayBuildError> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(
        config: &WidgetConfig,
        timeout: Duration,
    ) -> Result<Self, GatewayBuildError> {
        let chat_url = config.chat_endpoint()?;
        let health_url = config.health_endpoint()?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            chat_url,
            health_url,
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// Single POST of one turn
    ///
    /// # Errors
    ///
    /// Timeouts, connection problems, non-2xx statuses and bodies that are
    /// not a valid chat response.
    pub async fn post_turn(&self, request: &ChatRequest) -> Result<ChatResponse, GatewayError> {
        let response = self
            .client
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::status(
                status.as_u16(),
                format!("HTTP {status}: {body}"),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::decode(format!("Failed to parse response: {e}")))
    }

    /// Probe `GET <base_url>/api/health`
    ///
    /// # Errors
    ///
    /// Any transport failure, or a body other than `{"status": "ok"}`.
    pub async fn health_check(&self) -> Result<(), GatewayError> {
        #[derive(Deserialize)]
        struct Health {
            status: String,
        }

        let response = self.client.get(self.health_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::status(
                status.as_u16(),
                format!("Health check returned HTTP {status}"),
            ));
        }

        let health: Health = response.json().await?;
        if health.status == "ok" {
            Ok(())
        } else {
            Err(GatewayError::decode(format!(
                "Unexpected health status: {}",
                health.status
            )))
        }
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn send_turn(
        &self,
        session_id: &str,
        latest: &Message,
        history: &[Message],
    ) -> BackendResult {
        let request = ChatRequest::new(session_id, latest, history);
        match self.post_turn(&request).await {
            Ok(response) => response.into_result(),
            Err(e) => {
                tracing::debug!(kind = ?e.kind, error = %e, "Chat request failed");
                BackendResult::failure(e.message)
            }
        }
    }
}
