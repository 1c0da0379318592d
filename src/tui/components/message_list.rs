//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Lay out chat bubbles (user right, assistant left)
//! - Cache bubble heights so scrolling doesn't re-wrap every message
//! - Keep the newest message in view, after a short settle delay
//! - Draw the empty-state greeting
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Conversation` (props).
//! Since `Component::render` takes `&mut self`, the layout cache and scroll
//! state are updated during the render pass.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::{Conversation, Message};
use crate::effects::Effects;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;

/// Delay between a message landing and the view snapping to it.
pub const SCROLL_SETTLE: Duration = Duration::from_millis(100);

/// Blank rows between bubbles.
const GAP: u16 = 1;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, follow the newest message
    pub stick_to_bottom: bool,
    /// Pending snap-to-bottom, applied once this instant passes
    pub scroll_due: Option<Instant>,
    /// Bubble under the mouse pointer
    pub hovered_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            scroll_due: None,
            hovered_index: None,
            viewport_height: 0,
        }
    }

    /// Forget everything about the previous conversation.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Ask for a snap to the newest message once `SCROLL_SETTLE` has passed.
    pub fn request_scroll(&mut self, now: Instant) {
        self.scroll_due = Some(now + SCROLL_SETTLE);
    }

    /// Applies a due scroll request. Returns true if one fired.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.scroll_due {
            Some(due) if due <= now => {
                self.scroll_due = None;
                self.stick_to_bottom = true;
                true
            }
            _ => false,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Index of the bubble at a row relative to the top of the viewport.
    pub fn index_at(&self, viewport_row: u16) -> Option<usize> {
        let y = self.scroll_state.offset().y.saturating_add(viewport_row);
        let idx = self.layout.prefix_heights.partition_point(|&end| end <= y);
        (idx < self.layout.heights.len()).then_some(idx)
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub conversation: &'a Conversation,
    pub effects: &'a Effects,
    pub now: Instant,
}

impl MessageList<'_> {
    fn render_greeting(frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from("💕 heartchat 💕").style(
                Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::from("Type a message and press Enter").style(Style::default().fg(Color::Gray)),
            Line::from("Ctrl+E emoji · Ctrl+O settings · Ctrl+G celebrate")
                .style(Style::default().fg(Color::DarkGray)),
        ];
        let top = area.height.saturating_sub(lines.len() as u16) / 2;
        let greeting_area = Rect {
            y: area.y + top,
            height: area.height.saturating_sub(top),
            ..area
        };
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            greeting_area,
        );
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;
        if self.conversation.is_empty() {
            self.state.layout = LayoutCache::new();
            Self::render_greeting(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let bubble_width = MessageBubble::bubble_width(content_width);
        let messages = self.conversation.messages();
        self.state.layout.sync(messages, bubble_width);

        if self.state.settle(self.now) {
            log::debug!("Scrolling to newest message");
        }
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let total_height = self.state.layout.total_height();
        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };
        for i in visible_range {
            let message = &messages[i];
            let slot = self.state.layout.heights[i];
            let row = Rect::new(0, y, content_width, slot.saturating_sub(GAP));
            let bubble = MessageBubble::new(
                message,
                self.state.hovered_index == Some(i),
                self.effects.slide_in(i, self.now),
            );
            scroll_view.render_widget(bubble, MessageBubble::bubble_rect(message.sender, row));
            y += slot;
        }

        // A pending request holds the view still until it settles
        if self.state.stick_to_bottom && self.state.scroll_due.is_none() {
            self.state.scroll_state.scroll_to_bottom();
        }
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Implemented on the state: scrolling outlives the per-frame `MessageList`.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                self.scroll_due = None;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                self.scroll_due = None;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

/// Cached bubble heights (each including the gap below it).
///
/// Messages never change after they're appended, so a height stays valid
/// until the width changes or the conversation is replaced.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    bubble_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            bubble_width: 0,
        }
    }

    /// How many cached heights still apply.
    pub fn reusable_count(&self, message_count: usize, bubble_width: u16) -> usize {
        if self.bubble_width != bubble_width || message_count < self.heights.len() {
            return 0;
        }
        self.heights.len()
    }

    /// Measure any messages not yet cached.
    pub fn sync(&mut self, messages: &[Message], bubble_width: u16) {
        let reusable = self.reusable_count(messages.len(), bubble_width);
        self.heights.truncate(reusable);
        for message in messages.iter().skip(self.heights.len()) {
            self.heights
                .push(MessageBubble::calculate_height(message, bubble_width) + GAP);
        }
        self.bubble_width = bubble_width;
        self.rebuild_prefix_heights();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
