//! # TUI Components
//!
//! Every piece of the chat screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from the data they draw:
//! - `TitleBar`: app name, backend availability, status, gradient
//! - `MessageBubble`: one conversation turn
//! - `TypingIndicator`: bouncing dots while an exchange is in flight
//! - `EffectsOverlay`: hearts, sparkles, confetti
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; the per-frame component borrows it:
//! - `InputBox` / `InputBoxState`: the composer and its scroll offset
//! - `MessageList` / `MessageListState`: scrolling and layout caching
//! - `SettingsOverlay` / `SettingsState`: the Ctrl+O menu
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as struct fields, not by reaching into
//! `App`. That keeps dependencies explicit and lets tests render a component
//! on a `TestBackend` with hand-built props.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── typing_indicator.rs
//! ├── settings.rs
//! ├── effects_overlay.rs
//! └── input_box/          (composer view, cursor mapping, wrapping)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod effects_overlay;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod settings;
pub mod typing_indicator;

pub use effects_overlay::EffectsOverlay;
pub use input_box::{InputBoxState, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use settings::{SettingsEvent, SettingsOverlay, SettingsState};
pub use typing_indicator::TypingIndicator;
