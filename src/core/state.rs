//! # Application State
//!
//! Core business state for heartchat. This module contains domain logic
//! only, no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── exchange: ExchangeClient        // backend behind a trait object
//! ├── conversation: Conversation      // rendered turns, append-only
//! ├── composer: Composer              // draft + cursor + cap
//! ├── history: HistoryCache           // persisted (user, reply) pairs
//! ├── is_typing: bool                 // an exchange is in flight
//! ├── exchange_generation: u64        // stale replies are dropped
//! ├── backend_online: Option<bool>    // None until the status check lands
//! ├── status_message: String          // status bar text
//! └── pending_events: Vec<RenderEvent>// drained by the effects layer
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::core::composer::Composer;
use crate::core::config::ResolvedConfig;
use crate::core::conversation::{Conversation, Message, RenderEvent};
use crate::core::history::{HistoryCache, HistoryStore, JsonFileStore};
use crate::exchange::{ChatBackend, ExchangeClient};

pub const WELCOME_STATUS: &str = "Say hi 💕";

pub struct App {
    pub exchange: ExchangeClient,
    pub conversation: Conversation,
    pub composer: Composer,
    pub history: HistoryCache,
    pub is_typing: bool,
    /// Bumped when history is cleared; replies from older exchanges are dropped.
    pub exchange_generation: u64,
    pub backend_online: Option<bool>,
    pub status_message: String,
    /// Render events not yet seen by the effects layer.
    pub pending_events: Vec<RenderEvent>,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, composer: Composer, history: HistoryCache) -> Self {
        Self {
            exchange: ExchangeClient::new(backend),
            conversation: Conversation::new(),
            composer,
            history,
            is_typing: false,
            exchange_generation: 0,
            backend_online: None,
            status_message: String::from(WELCOME_STATUS),
            pending_events: Vec::new(),
        }
    }

    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ResolvedConfig) -> Self {
        let store: Box<dyn HistoryStore> = Box::new(JsonFileStore::new(&config.history_path));
        Self::new(
            backend,
            Composer::new(config.max_draft_chars),
            HistoryCache::new(store, config.persist_history, config.replay_limit),
        )
    }

    /// True iff the draft has content and no exchange is in flight.
    pub fn can_submit(&self) -> bool {
        self.composer.can_submit(self.is_typing)
    }

    /// Appends to the conversation and queues the render event.
    pub fn append(&mut self, message: Message) {
        let event = self.conversation.append(message);
        self.pending_events.push(event);
    }

    pub fn take_render_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, super::WELCOME_STATUS);
        assert!(!app.is_typing);
        assert!(app.conversation.is_empty());
        assert!(app.backend_online.is_none());
        assert!(!app.can_submit());
    }

    #[test]
    fn test_append_queues_render_event() {
        let mut app = test_app();
        app.append(crate::core::conversation::Message::user("hi"));
        assert_eq!(app.take_render_events().len(), 1);
        assert!(app.take_render_events().is_empty());
    }
}
