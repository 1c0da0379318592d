//! Where the composer's cursor lands on screen.
//!
//! The composer owns the draft and the cursor byte offset. This module only
//! tracks the internal scroll offset of the input box and maps the cursor
//! into wrapped screen coordinates.

use super::text_wrap::{
    CONTENT_COL_OFFSET, CONTENT_ROW_OFFSET, MAX_VISIBLE_LINES, display_width, inner_width,
    wrap_line_count, wrap_lines, wrap_options,
};
use ratatui::layout::Rect;

#[derive(Debug, Default)]
pub(super) struct CursorView {
    /// Line offset for internal scrolling (0 when content fits in viewport)
    pub scroll_offset: u16,
}

impl CursorView {
    /// Which wrapped line (0-based) the cursor is on.
    pub fn calculate_line(draft: &str, cursor: usize, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        if width == 0 {
            return 0;
        }
        let before = &draft[..cursor.min(draft.len())];
        wrap_lines(before, width).len().saturating_sub(1) as u16
    }

    /// Keep the cursor line inside the visible window.
    pub fn update_scroll_offset(&mut self, draft: &str, cursor: usize, content_width: u16) {
        let total_lines = wrap_line_count(draft, inner_width(content_width));
        if total_lines <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let cursor_line = Self::calculate_line(draft, cursor, content_width);
        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
        } else if cursor_line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = cursor_line.saturating_sub(MAX_VISIBLE_LINES - 1);
        }
    }

    /// Screen (column, row) of the cursor inside `area`.
    pub fn screen_pos(&self, draft: &str, cursor: usize, area: Rect) -> (u16, u16) {
        let origin = (area.x + CONTENT_COL_OFFSET, area.y + CONTENT_ROW_OFFSET);
        let width = inner_width(area.width);
        if width == 0 {
            return origin;
        }

        let before = &draft[..cursor.min(draft.len())];
        let cursor_line = Self::calculate_line(draft, cursor, area.width);

        // textwrap trims whitespace at wrap points, so measure the logical line
        // up to the cursor and subtract the segments wrapped above it.
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical = &before[line_start..];
        let segments = textwrap::wrap(logical, wrap_options(width));
        let above: u16 = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|seg| display_width(seg))
            .sum();
        let col = display_width(logical).saturating_sub(above).min(width);

        let row = cursor_line.saturating_sub(self.scroll_offset);
        (origin.0 + col, origin.1 + row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 10, 24, 7)
    }

    #[test]
    fn test_cursor_at_start() {
        let view = CursorView::default();
        assert_eq!(view.screen_pos("", 0, area()), (2, 11));
    }

    #[test]
    fn test_cursor_after_text() {
        let view = CursorView::default();
        assert_eq!(view.screen_pos("hello", 5, area()), (7, 11));
    }

    #[test]
    fn test_cursor_after_newline() {
        let view = CursorView::default();
        assert_eq!(view.screen_pos("hi\n", 3, area()), (2, 12));
    }

    #[test]
    fn test_cursor_counts_emoji_width() {
        let view = CursorView::default();
        let draft = "a💖";
        assert_eq!(view.screen_pos(draft, draft.len(), area()), (5, 11));
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut view = CursorView::default();
        let draft = "1\n2\n3\n4\n5\n6\n7";
        view.update_scroll_offset(draft, draft.len(), 24);
        assert_eq!(view.scroll_offset, 2);
        view.update_scroll_offset(draft, 0, 24);
        assert_eq!(view.scroll_offset, 0);
    }
}
