use std::fmt;

use serde::{Deserialize, Serialize};

/// The apology shown in place of a reply whenever an exchange fails.
pub const FALLBACK_REPLY: &str = "I'm sorry, something went wrong. Please try again! 💕";

/// Request body for `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body for `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    /// Server-side send time. Informational only.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response body for `GET /api/status`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BackendStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl BackendStatus {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

/// The outcome of one exchange as the conversation sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    pub is_error: bool,
}

impl Reply {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            content: FALLBACK_REPLY.to_string(),
            is_error: true,
        }
    }
}

/// Errors that can occur during an exchange.
/// All of them collapse into [`Reply::fallback`] before reaching the user.
#[derive(Debug)]
pub enum ExchangeError {
    /// Transport failure (DNS, connection refused, reset).
    Network(String),
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
    /// The body wasn't the JSON we expected.
    Parse(String),
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::Network(msg) => write!(f, "network error: {msg}"),
            ExchangeError::Status { status, body } => {
                write!(f, "backend error (HTTP {status}): {body}")
            }
            ExchangeError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ExchangeError {}
