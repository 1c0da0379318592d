//! # InputBox Component
//!
//! Draws the composer: the draft, a live character counter, and the send
//! control.
//!
//! ## Responsibilities
//!
//! - Apply editing events to the composer (typing, paste, cursor movement)
//! - Report submission and emoji requests upward
//! - Colour the counter by how close the draft is to the cap
//! - Dim the send control while it can't be used
//!
//! ## State Management
//!
//! The draft and cursor live in the core `Composer`, passed in as a prop.
//! Only the internal scroll offset is presentation state (`InputBoxState`).

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::composer::{CharCountLevel, Composer};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorView;
use text_wrap::{MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, wrap_line_count, wrap_lines};

pub const SEND_HINT: &str = " ↵ send ";

/// High-level events emitted while editing
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed; the reducer decides whether it's allowed
    Submit,
    /// Ctrl+E: insert a random emoji at the cursor
    InsertEmoji,
    ContentChanged,
}

/// Presentation state that outlives a frame.
#[derive(Debug, Default)]
pub struct InputBoxState {
    view: CursorView,
}

/// Height the input box needs for the current draft, clamped to the viewport.
pub fn calculate_height(composer: &Composer, content_width: u16) -> u16 {
    let lines = wrap_line_count(composer.draft(), inner_width(content_width));
    lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
}

/// Screen cells covered by the send control, for hover sparkles.
pub fn send_control_area(area: Rect) -> Rect {
    let width = (SEND_HINT.chars().count() as u16).min(area.width);
    Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(1),
        width,
        height: 1,
    }
}

fn counter_color(level: CharCountLevel) -> Color {
    match level {
        CharCountLevel::Normal => Color::DarkGray,
        CharCountLevel::Warning => Color::Yellow,
        CharCountLevel::Danger => Color::Red,
    }
}

/// # Props
///
/// - `composer`: draft and cursor
/// - `can_send`: whether the send control is enabled
pub struct InputBox<'a> {
    pub composer: &'a Composer,
    pub state: &'a mut InputBoxState,
    pub can_send: bool,
}

impl Component for InputBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let draft = self.composer.draft();
        let cursor = self.composer.cursor();
        self.state.view.update_scroll_offset(draft, cursor, area.width);

        let visible: Vec<Line> = wrap_lines(draft, inner_width(area.width))
            .into_iter()
            .skip(self.state.view.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(Line::from)
            .collect();

        let counter = Line::from(format!(
            " {}/{} ",
            self.composer.char_count(),
            self.composer.max_chars()
        ))
        .style(Style::default().fg(counter_color(self.composer.count_level())))
        .alignment(Alignment::Right);

        let send_style = if self.can_send {
            Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let send = Line::from(SEND_HINT).style(send_style).alignment(Alignment::Right);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .padding(Padding::horizontal(1))
            .title(" Message ")
            .title_top(counter)
            .title_bottom(send);

        let paragraph = Paragraph::new(visible)
            .block(block)
            .style(Style::default().fg(Color::White));
        frame.render_widget(paragraph, area);

        let (x, y) = self.state.view.screen_pos(draft, cursor, area);
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for Composer {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = match event {
            TuiEvent::InputChar(c) => self.insert_char(*c),
            TuiEvent::Paste(text) => self.insert_str(text),
            TuiEvent::Backspace => self.backspace(),
            TuiEvent::Delete => self.delete(),
            TuiEvent::CursorLeft => self.move_left(),
            TuiEvent::CursorRight => self.move_right(),
            TuiEvent::CursorHome => self.move_home(),
            TuiEvent::CursorEnd => self.move_end(),
            TuiEvent::Submit => return Some(InputEvent::Submit),
            TuiEvent::InsertEmoji => return Some(InputEvent::InsertEmoji),
            _ => return None,
        };
        changed.then_some(InputEvent::ContentChanged)
    }
}
