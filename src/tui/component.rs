use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the chat screen that knows how to draw itself.
///
/// Data arrives as props (struct fields), persistent presentation state
/// through `&mut` state fields. `render` takes `&mut self` so a component
/// can refresh its caches (bubble heights, scroll offsets) while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Something that turns raw terminal events into higher-level ones.
pub trait EventHandler {
    /// What this handler reports back to the event loop.
    type Event;

    /// Returns `None` when the event was ignored or fully handled locally.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
