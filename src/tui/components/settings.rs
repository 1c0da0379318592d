//! # Settings Overlay
//!
//! A small modal menu opened with Ctrl+O.
//!
//! ```text
//! Menu ──'1'──► ConfirmClear ──'y'──► ClearHistory
//!  │                 └──'n'/Esc──► closed
//!  ├──'2'──► ThemeRequested
//!  └──Esc───► closed
//! ```
//!
//! Clearing history is destructive, so it always goes through the
//! confirmation step.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsStage {
    Menu,
    ConfirmClear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    /// Confirmed: wipe the conversation and stored history
    ClearHistory,
    ThemeRequested,
    Dismissed,
}

/// Open/closed state of the overlay, kept in TuiState.
#[derive(Debug, Default)]
pub struct SettingsState {
    stage: Option<SettingsStage>,
}

impl SettingsState {
    pub fn open(&mut self) {
        self.stage = Some(SettingsStage::Menu);
    }

    pub fn close(&mut self) {
        self.stage = None;
    }

    pub fn is_open(&self) -> bool {
        self.stage.is_some()
    }

    pub fn stage(&self) -> Option<SettingsStage> {
        self.stage
    }
}

impl EventHandler for SettingsState {
    type Event = SettingsEvent;

    /// While open, swallows every event; only the menu keys do anything.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let stage = self.stage?;
        let (next, emitted) = match (stage, event) {
            (_, TuiEvent::Quit) => (None, Some(SettingsEvent::Dismissed)),
            (SettingsStage::Menu, TuiEvent::InputChar('1')) => (Some(SettingsStage::ConfirmClear), None),
            (SettingsStage::Menu, TuiEvent::InputChar('2')) => (None, Some(SettingsEvent::ThemeRequested)),
            (SettingsStage::ConfirmClear, TuiEvent::InputChar('y' | 'Y')) => {
                (None, Some(SettingsEvent::ClearHistory))
            }
            (SettingsStage::ConfirmClear, TuiEvent::InputChar('n' | 'N')) => {
                (None, Some(SettingsEvent::Dismissed))
            }
            _ => (Some(stage), None),
        };
        self.stage = next;
        emitted
    }
}

/// Centered popup. Draws nothing when closed.
pub struct SettingsOverlay<'a> {
    pub state: &'a SettingsState,
}

impl SettingsOverlay<'_> {
    fn lines(stage: SettingsStage) -> Vec<Line<'static>> {
        let key = Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD);
        let hint = Style::default().fg(Color::DarkGray);
        match stage {
            SettingsStage::Menu => vec![
                Line::from("1  Clear chat history").style(key),
                Line::from("2  Theme").style(key),
                Line::from(""),
                Line::from("Esc to close").style(hint),
            ],
            SettingsStage::ConfirmClear => vec![
                Line::from("Clear all chat history?"),
                Line::from("This can't be undone.").style(hint),
                Line::from(""),
                Line::from("y  yes, clear it").style(key),
                Line::from("n  keep it").style(key),
            ],
        }
    }
}

impl Component for SettingsOverlay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(stage) = self.state.stage() else {
            return;
        };
        let lines = Self::lines(stage);

        let [popup] = Layout::horizontal([Constraint::Length(36)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Length(lines.len() as u16 + 2)])
            .flex(Flex::Center)
            .areas(popup);

        let block = Block::bordered()
            .title(" Settings ")
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .padding(Padding::horizontal(1));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}
