//! # Remote Exchange
//!
//! One request, one reply. The [`ChatBackend`] trait is the seam: the TUI
//! talks to an `Arc<dyn ChatBackend>`, tests swap in a stub or point an
//! [`HttpBackend`] at a mock server.
//!
//! ```text
//! send(text) ──► Ok(reply)            ──► Reply { content: reply, is_error: false }
//!            └─► Err(Network|Status|Parse) ──► Reply::fallback()   (cause logged only)
//! ```

pub mod client;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

pub use client::{DEFAULT_BASE_URL, HttpBackend};
pub use types::{BackendStatus, ChatRequest, ChatResponse, ExchangeError, FALLBACK_REPLY, Reply};

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one message and returns the backend's reply text.
    async fn send(&self, message: &str) -> Result<String, ExchangeError>;

    /// Reports whether the backend is up.
    async fn status(&self) -> Result<BackendStatus, ExchangeError>;
}

/// Wraps a backend and collapses every failure into the fallback reply.
#[derive(Clone)]
pub struct ExchangeClient {
    backend: Arc<dyn ChatBackend>,
}

impl ExchangeClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    pub async fn exchange(&self, message: &str) -> Reply {
        match self.backend.send(message).await {
            Ok(content) => Reply::ok(content),
            Err(e) => {
                warn!("Error sending message: {}", e);
                Reply::fallback()
            }
        }
    }

    /// Status check; `None` when the backend can't be reached.
    pub async fn status(&self) -> Option<BackendStatus> {
        match self.backend.status().await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("Status check failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubBackend;

    #[test]
    fn test_exchange_success_passes_reply_through() {
        let client = ExchangeClient::new(Arc::new(StubBackend::replying("hi there")));
        let reply = tokio_test::block_on(client.exchange("hello"));
        assert_eq!(reply, Reply::ok("hi there"));
    }

    #[test]
    fn test_exchange_failure_collapses_to_fallback() {
        let client = ExchangeClient::new(Arc::new(StubBackend::failing()));
        let reply = tokio_test::block_on(client.exchange("hello"));
        assert!(reply.is_error);
        assert_eq!(reply.content, FALLBACK_REPLY);
    }

    #[test]
    fn test_status_failure_is_none() {
        let client = ExchangeClient::new(Arc::new(StubBackend::failing()));
        assert!(tokio_test::block_on(client.status()).is_none());
    }
}
