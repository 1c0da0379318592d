use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::effects::Effects;
use crate::effects::particles::Region;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::input_box::{self, InputBox};
use crate::tui::components::{
    EffectsOverlay, MessageList, SettingsOverlay, TitleBar, TypingIndicator,
};

/// Where each part of the screen goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub messages: Rect,
    pub typing: Rect,
    pub input: Rect,
}

pub fn screen_layout(area: Rect, input_height: u16) -> ScreenLayout {
    use Constraint::{Length, Min};
    let [title, messages, typing, input] =
        Layout::vertical([Length(1), Min(0), Length(1), Length(input_height)]).areas(area);
    ScreenLayout {
        title,
        messages,
        typing,
        input,
    }
}

/// Layout for the current draft at this frame size.
pub fn layout_for(app: &App, area: Rect) -> ScreenLayout {
    screen_layout(area, input_box::calculate_height(&app.composer, area.width))
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, effects: &Effects, now: Instant) {
    let screen = layout_for(app, frame.area());

    TitleBar {
        backend_online: app.backend_online,
        status_message: &app.status_message,
        gradient: effects.is_running().then(|| effects.gradient()),
    }
    .render(frame, screen.title);

    MessageList {
        state: &mut tui.message_list,
        conversation: &app.conversation,
        effects,
        now,
    }
    .render(frame, screen.messages);

    TypingIndicator {
        visible: app.is_typing,
        frame: tui.frame_count,
    }
    .render(frame, screen.typing);

    InputBox {
        composer: &app.composer,
        state: &mut tui.input_box,
        can_send: app.can_submit(),
    }
    .render(frame, screen.input);

    // Particles float over the chat but never over the settings menu
    EffectsOverlay { effects, now }.render(frame, frame.area());
    SettingsOverlay {
        state: &tui.settings,
    }
    .render(frame, screen.messages);
}

/// Which message bubble sits at a screen row, if any.
pub fn hit_test_message(row: u16, messages_area: Rect, tui: &TuiState) -> Option<usize> {
    if row < messages_area.y || row >= messages_area.y + messages_area.height {
        return None;
    }
    tui.message_list.index_at(row - messages_area.y)
}

/// Whether a screen cell is inside a rectangle.
pub fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// `rect` as fractions of `area`, for aiming effects at a control.
pub fn to_region(rect: Rect, area: Rect) -> Region {
    let w = area.width.max(1) as f32;
    let h = area.height.max(1) as f32;
    Region {
        x: rect.x.saturating_sub(area.x) as f32 / w,
        y: rect.y.saturating_sub(area.y) as f32 / h,
        width: rect.width as f32 / w,
        height: rect.height as f32 / h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Message;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let effects = Effects::seeded(false, 0);
        terminal
            .draw(|f| draw_ui(f, app, tui, &effects, Instant::now()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_stacks_top_to_bottom() {
        let screen = screen_layout(Rect::new(0, 0, 80, 24), 3);
        assert_eq!(screen.title, Rect::new(0, 0, 80, 1));
        assert_eq!(screen.messages, Rect::new(0, 1, 80, 19));
        assert_eq!(screen.typing, Rect::new(0, 20, 80, 1));
        assert_eq!(screen.input, Rect::new(0, 21, 80, 3));
    }

    #[test]
    fn test_draw_empty_screen() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("heartchat"));
        assert!(text.contains("Message"));
        assert!(text.contains("0/1000"));
    }

    #[test]
    fn test_draw_conversation() {
        let mut app = test_app();
        app.append(Message::user("hello there"));
        app.append(Message::assistant("hi <3"));
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("hello there"));
        assert!(text.contains("💖"));
    }

    #[test]
    fn test_hit_test_outside_messages() {
        let tui = TuiState::new();
        let area = Rect::new(0, 1, 60, 10);
        assert_eq!(hit_test_message(0, area, &tui), None);
        assert_eq!(hit_test_message(11, area, &tui), None);
    }

    #[test]
    fn test_region_is_normalized() {
        let region = to_region(Rect::new(50, 18, 10, 2), Rect::new(0, 0, 100, 20));
        assert_eq!(region.x, 0.5);
        assert_eq!(region.y, 0.9);
        assert_eq!(region.width, 0.1);
        assert_eq!(region.height, 0.1);
    }

    #[test]
    fn test_contains() {
        let rect = Rect::new(10, 5, 4, 2);
        assert!(contains(rect, 10, 5));
        assert!(contains(rect, 13, 6));
        assert!(!contains(rect, 14, 6));
        assert!(!contains(rect, 10, 7));
    }
}
