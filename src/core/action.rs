//! # Actions
//!
//! Everything that can happen in heartchat becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The backend answers? That's `Action::ExchangeResolved { .. }`.
//!
//! The `update()` function applies an action to the state and returns the
//! `Effect` the adapter should perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: build an `App`, feed it actions, assert.

use log::{debug, info};

use crate::core::conversation::{Conversation, Message};
use crate::core::state::App;
use crate::exchange::{BackendStatus, Reply};

pub const TYPING_STATUS: &str = "typing…";
pub const THEME_NOTICE: &str = "Theme customization coming soon! 💖";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send the current draft.
    Submit,
    /// The in-flight exchange finished (successfully or with the fallback).
    /// `generation` is the value of `App::exchange_generation` at submit.
    ExchangeResolved {
        generation: u64,
        prompt: String,
        reply: Reply,
    },
    /// Startup status check result; `None` means unreachable.
    StatusChecked(Option<BackendStatus>),
    /// Read persisted history and replay the recent part of it.
    LoadHistory,
    /// Insert a literal token at the draft cursor.
    InsertSuggestion(String),
    /// Destructive: wipe in-memory and persisted history. Already confirmed.
    ClearHistory,
    /// Theme option from the settings menu.
    ThemeRequested,
    Celebrate,
    Quit,
}

/// Side effect requested by a state transition, performed by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Run one exchange for this text, tagged with the current generation.
    SpawnExchange { prompt: String, generation: u64 },
    /// A real reply arrived: float some hearts.
    ReplyHearts,
    /// The conversation was replaced; presentation state must be reset.
    ResetView,
    Celebrate,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit => {
            let Some(text) = app.composer.submit(app.is_typing) else {
                debug!("Submit ignored (empty draft or exchange in flight)");
                return Effect::None;
            };
            app.append(Message::user(text.clone()));
            app.is_typing = true;
            app.status_message = TYPING_STATUS.to_string();
            Effect::SpawnExchange {
                prompt: text,
                generation: app.exchange_generation,
            }
        }
        Action::ExchangeResolved {
            generation,
            prompt,
            reply,
        } => {
            app.is_typing = false;
            app.status_message.clear();
            if generation != app.exchange_generation {
                info!("Dropping reply to an exchange started before history was cleared");
                return Effect::None;
            }
            if reply.is_error {
                app.append(Message::error(reply.content));
                return Effect::None;
            }
            app.history.record(&prompt, &reply.content);
            app.append(Message::assistant(reply.content));
            Effect::ReplyHearts
        }
        Action::StatusChecked(status) => {
            app.backend_online = Some(status.as_ref().is_some_and(BackendStatus::is_online));
            if let Some(status) = status
                && !status.message.is_empty()
                && app.conversation.is_empty()
            {
                app.status_message = status.message;
            }
            Effect::None
        }
        Action::LoadHistory => {
            let mut replayed = Conversation::new();
            let count = app.history.load_and_replay(&mut replayed);
            for message in replayed.messages() {
                app.append(message.clone());
            }
            info!("History replay appended {} messages", count);
            Effect::None
        }
        Action::InsertSuggestion(token) => {
            app.composer.insert_suggestion(&token);
            Effect::None
        }
        Action::ClearHistory => {
            app.history.clear();
            app.exchange_generation += 1;
            app.conversation = Conversation::new();
            app.pending_events.clear();
            app.status_message = String::from("History cleared");
            Effect::ResetView
        }
        Action::ThemeRequested => {
            app.status_message = THEME_NOTICE.to_string();
            Effect::None
        }
        Action::Celebrate => Effect::Celebrate,
        Action::Quit => Effect::Quit,
    }
}
