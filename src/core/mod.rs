//! # Core Application Logic
//!
//! This module contains heartchat's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. No network.     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  exchange  │      │  effects   │
//!     │  Adapter   │      │ (backend)  │      │ (cosmetic) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`composer`]: Draft editing, length cap, submit gating
//! - [`conversation`]: Append-only message log and text formatting
//! - [`history`]: Persisted history and its storage boundary
//! - [`config`]: Layered configuration

pub mod action;
pub mod composer;
pub mod config;
pub mod conversation;
pub mod history;
pub mod state;
