//! Pure text wrapping utilities and dimensional constants for the InputBox.
//!
//! These are stateless helpers with no dependency on the composer.

use unicode_width::UnicodeWidthStr;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Column offset from area edge to content (border + padding)
pub(super) const CONTENT_COL_OFFSET: u16 = 2;
/// Row offset from area edge to content (top border)
pub(super) const CONTENT_ROW_OFFSET: u16 = 1;

/// Build textwrap options configured for the input box inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Calculate the inner content width after subtracting border/padding overhead.
/// Returns 0 if the area is too narrow.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrap `text` into display lines, keeping a trailing empty line for a
/// trailing newline so the cursor has somewhere to sit.
pub(super) fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = textwrap::wrap(text, wrap_options(width))
        .into_iter()
        .map(|l| l.into_owned())
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        lines.push(String::new());
    }
    lines
}

pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    wrap_lines(text, width).len() as u16
}

/// Display width of the text, counting wide glyphs (emoji) as two columns.
pub(super) fn display_width(text: &str) -> u16 {
    UnicodeWidthStr::width(text) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_one_line() {
        assert_eq!(wrap_line_count("", 20), 1);
        assert_eq!(wrap_line_count("hello", 0), 1);
    }

    #[test]
    fn test_wrap_at_width() {
        assert_eq!(wrap_line_count("hello world", 5), 2);
        assert_eq!(wrap_line_count("abcdefghij", 4), 3);
    }

    #[test]
    fn test_trailing_newline_adds_line() {
        assert_eq!(wrap_line_count("hello\n", 20), 2);
    }

    #[test]
    fn test_emoji_are_double_width() {
        assert_eq!(display_width("hi💖"), 4);
    }
}
