//! # TitleBar Component
//!
//! One-line header: app name, backend availability, and the status message,
//! over the drifting background gradient.
//!
//! ## Stateless Component
//!
//! All data arrives as props. Where it comes from:
//! - `backend_online`: core App state, set by the startup status check
//! - `status_message`: core App state ("typing…", notices)
//! - `gradient`: effects layer, `None` when effects are off
//!
//! ## Conditional Formatting
//!
//! 1. **Status message**: `"💕 heartchat │ ● online │ typing…"`
//! 2. **Default**: `"💕 heartchat │ ● online"`
//!
//! Availability reads `connecting…` until the status check lands.

use crate::effects::gradient::Gradient;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar<'a> {
    pub backend_online: Option<bool>,
    pub status_message: &'a str,
    pub gradient: Option<Gradient>,
}

impl TitleBar<'_> {
    fn availability(&self) -> (&'static str, Color) {
        match self.backend_online {
            None => ("○ connecting…", Color::Gray),
            Some(true) => ("● online", Color::Green),
            Some(false) => ("● offline", Color::Red),
        }
    }

    /// Background colour of column `col` out of `width`.
    fn background_at(&self, col: u16, width: u16) -> Color {
        let Some(gradient) = self.gradient else {
            return Color::Magenta;
        };
        let t = if width <= 1 {
            0.0
        } else {
            col as f32 / (width - 1) as f32
        };
        let (r0, g0, b0) = gradient.start.to_rgb();
        let (r1, g1, b1) = gradient.end.to_rgb();
        Color::Rgb(lerp(r0, r1, t), lerp(g0, g1, t), lerp(b0, b1, t))
    }
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let buf = frame.buffer_mut();
        for col in 0..area.width {
            if let Some(cell) = buf.cell_mut((area.x + col, area.y)) {
                cell.set_bg(self.background_at(col, area.width));
            }
        }

        let (availability, availability_color) = self.availability();
        let text = Style::default().fg(Color::Black).add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled(" 💕 heartchat ", text),
            Span::styled("│ ", text),
            Span::styled(availability, Style::default().fg(availability_color)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(" │ ", text));
            spans.push(Span::styled(self.status_message, Style::default().fg(Color::Black)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
