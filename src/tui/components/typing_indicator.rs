use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;
use crate::tui::components::message::ASSISTANT_LABEL;

/// Frames per dot step.
const FRAMES_PER_STEP: usize = 4;
const DOTS: usize = 3;

/// Bouncing dots shown while an exchange is in flight.
///
/// Renders nothing when `visible` is false so the row stays reserved and
/// the layout doesn't jump.
pub struct TypingIndicator {
    pub visible: bool,
    pub frame: usize,
}

impl TypingIndicator {
    /// Which dot is raised on this frame.
    fn active_dot(&self) -> usize {
        (self.frame / FRAMES_PER_STEP) % DOTS
    }
}

impl Component for TypingIndicator {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }
        let active = self.active_dot();
        let mut spans = vec![Span::styled(
            format!(" {} ", ASSISTANT_LABEL),
            Style::default().fg(Color::LightMagenta),
        )];
        for i in 0..DOTS {
            let (glyph, style) = if i == active {
                ("●", Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD))
            } else {
                ("•", Style::default().fg(Color::DarkGray))
            };
            spans.push(Span::styled(glyph, style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(visible: bool) -> String {
        let backend = TestBackend::new(20, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut indicator = TypingIndicator { visible, frame: 0 };
        terminal.draw(|f| indicator.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_hidden_renders_nothing() {
        assert_eq!(draw(false).trim(), "");
    }

    #[test]
    fn test_visible_renders_dots() {
        let text = draw(true);
        assert_eq!(text.matches('●').count(), 1);
        assert_eq!(text.matches('•').count(), 2);
    }

    #[test]
    fn test_dots_cycle() {
        let at = |frame| TypingIndicator { visible: true, frame }.active_dot();
        assert_eq!(at(0), 0);
        assert_eq!(at(FRAMES_PER_STEP), 1);
        assert_eq!(at(FRAMES_PER_STEP * 2), 2);
        assert_eq!(at(FRAMES_PER_STEP * 3), 0);
    }
}
