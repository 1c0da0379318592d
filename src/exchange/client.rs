//! HTTP backend for the chat endpoint.
//!
//! One `POST /api/chat` per submitted message. No retries, no timeout, no
//! cancellation: the request runs until the transport gives up.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::types::{BackendStatus, ChatRequest, ChatResponse, ExchangeError};
use super::ChatBackend;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

/// Fails with `ExchangeError::Status` for any non-2xx response.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ExchangeError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("Chat backend error: {} - {}", status, body);
    Err(ExchangeError::Status { status, body })
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, message: &str) -> Result<String, ExchangeError> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        info!(
            "Sending chat request: endpoint={}/api/chat, len={}",
            self.base_url,
            message.len()
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        debug!("Chat response status: {}", response.status());
        let response = check_status(response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::Parse(e.to_string()))?;

        info!("Chat reply received: len={}", body.response.len());
        Ok(body.response)
    }

    async fn status(&self) -> Result<BackendStatus, ExchangeError> {
        let response = self
            .client
            .get(format!("{}/api/status", self.base_url))
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ExchangeError::Parse(e.to_string()))
    }
}
