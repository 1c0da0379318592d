use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::conversation::{Message, Sender};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Share of the list width a bubble may use.
const BUBBLE_WIDTH_PERCENT: u32 = 80;

pub const USER_LABEL: &str = "you";
pub const ASSISTANT_LABEL: &str = "💕";

/// A single chat bubble.
///
/// Transient: built fresh each frame from a core [`Message`]. The parent
/// `MessageList` owns hover and slide-in state and passes them in.
///
/// User bubbles sit on the right, assistant bubbles on the left. Failed
/// exchanges get a red border and a `!` marker.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    pub is_hovered: bool,
    /// Slide-in progress (0.0 just appended), `None` once settled.
    pub slide_in: Option<f32>,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, is_hovered: bool, slide_in: Option<f32>) -> Self {
        Self {
            message,
            is_hovered,
            slide_in,
        }
    }

    /// Width of a bubble inside a list `list_width` columns wide.
    pub fn bubble_width(list_width: u16) -> u16 {
        let share = (u32::from(list_width) * BUBBLE_WIDTH_PERCENT / 100) as u16;
        share.max(HORIZONTAL_OVERHEAD + 1).min(list_width)
    }

    /// Where the bubble goes inside a row of the list.
    pub fn bubble_rect(sender: Sender, row: Rect) -> Rect {
        let width = Self::bubble_width(row.width);
        let x = match sender {
            Sender::User => row.x + row.width - width,
            Sender::Assistant => row.x,
        };
        Rect { x, width, ..row }
    }

    /// Rendered height of `message` in a bubble `width` columns wide.
    ///
    /// Uses the same textwrap options as the `Paragraph` so scroll offsets
    /// can be computed without rendering.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines: usize = message
            .display_lines()
            .iter()
            .map(|line| textwrap::wrap(line, &options).len().max(1))
            .sum();
        (lines as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn base_style(&self) -> Style {
        if self.message.is_error {
            return Style::default().fg(Color::Red);
        }
        match self.message.sender {
            Sender::User => Style::default().fg(Color::LightCyan),
            Sender::Assistant => Style::default().fg(Color::LightMagenta),
        }
    }

    fn label(&self) -> String {
        match (self.message.sender, self.message.is_error) {
            (Sender::User, _) => USER_LABEL.to_string(),
            (Sender::Assistant, false) => ASSISTANT_LABEL.to_string(),
            (Sender::Assistant, true) => format!("{} !", ASSISTANT_LABEL),
        }
    }
}

impl Widget for MessageBubble<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = self.base_style();

        // Hover lifts the border; sliding in dims everything
        let mut border_style = if self.is_hovered {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        };
        let mut text_style = Style::default().fg(Color::White);
        if self.slide_in.is_some() {
            border_style = border_style.add_modifier(Modifier::DIM);
            text_style = text_style.add_modifier(Modifier::DIM);
        }

        let time = Line::from(format!(" {} ", self.message.display_time()))
            .style(Style::default().fg(Color::DarkGray));
        let block = Block::bordered()
            .title(format!(" {} ", self.label()))
            .title_bottom(time.right_aligned())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .message
            .display_lines()
            .into_iter()
            .map(Line::from)
            .collect();
        Paragraph::new(lines)
            .style(text_style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl Component for MessageBubble<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
