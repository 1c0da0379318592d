//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::composer::Composer;
use crate::core::history::{DEFAULT_REPLAY_LIMIT, HistoryCache, MemoryStore};
use crate::core::state::App;
use crate::exchange::{BackendStatus, ChatBackend, ExchangeError};

/// A backend that answers from a fixed script instead of the network.
pub struct StubBackend {
    reply: Option<String>,
}

impl StubBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl ChatBackend for StubBackend {
    async fn send(&self, _message: &str) -> Result<String, ExchangeError> {
        self.reply
            .clone()
            .ok_or_else(|| ExchangeError::Network("connection refused".to_string()))
    }

    async fn status(&self) -> Result<BackendStatus, ExchangeError> {
        match self.reply {
            Some(_) => Ok(BackendStatus {
                status: "online".to_string(),
                message: String::new(),
            }),
            None => Err(ExchangeError::Network("connection refused".to_string())),
        }
    }
}

/// Creates a test App with a stub backend and throwaway history.
pub fn test_app() -> App {
    test_app_with_store(MemoryStore::new(), true)
}

pub fn test_app_with_store(store: MemoryStore, persist: bool) -> App {
    App::new(
        Arc::new(StubBackend::replying("stub reply")),
        Composer::default(),
        HistoryCache::new(Box::new(store), persist, DEFAULT_REPLAY_LIMIT),
    )
}
