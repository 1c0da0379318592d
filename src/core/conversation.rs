//! # Conversation
//!
//! The append-only log of rendered turns and the text formatting applied to
//! every message before it reaches the screen.
//!
//! ```text
//! Conversation
//! └── messages: Vec<Message>   // call order == display order
//!
//! append(message) ──► RenderEvent::MessageAppended ──► effects layer
//! ```
//!
//! There is no edit or delete. Clearing history replaces the whole
//! `Conversation` with a fresh one, the same way a page reload would.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Literal emoticon substitutions, applied in this order.
const EMOTICONS: &[(&str, &str)] = &[(":)", "😊"), (":(", "😢"), ("<3", "💖")];

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// A single conversation turn. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::at(content, Sender::User, Local::now())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::at(content, Sender::Assistant, Local::now())
    }

    /// An assistant turn flagged as a failed exchange.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(content)
        }
    }

    pub fn at(content: impl Into<String>, sender: Sender, timestamp: DateTime<Local>) -> Self {
        Self {
            content: content.into(),
            sender,
            timestamp,
            is_error: false,
        }
    }

    /// Display lines after emoticon substitution and line breaking.
    pub fn display_lines(&self) -> Vec<String> {
        format_content(&self.content)
    }

    pub fn display_time(&self) -> String {
        format_time(&self.timestamp)
    }
}

/// Emitted once per `append`, consumed by the effects layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    MessageAppended {
        index: usize,
        sender: Sender,
        is_error: bool,
    },
}

#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) -> RenderEvent {
        let event = RenderEvent::MessageAppended {
            index: self.messages.len(),
            sender: message.sender,
            is_error: message.is_error,
        };
        self.messages.push(message);
        event
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Formats a timestamp as a short 12-hour clock time, e.g. `3:07 PM`.
pub fn format_time(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%-I:%M %p").to_string()
}

/// Applies the literal emoticon substitutions and splits on newlines.
///
/// Content is plain text: nothing is parsed as markup. Control characters
/// other than newline and tab are dropped so a reply can't smuggle terminal
/// escape sequences onto the screen.
pub fn format_content(content: &str) -> Vec<String> {
    let mut text: String = content
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    for (emoticon, emoji) in EMOTICONS {
        text = text.replace(emoticon, emoji);
    }
    text.split('\n').map(str::to_string).collect()
}
