//! # Composer
//!
//! Owns the draft: the text being typed, its cursor, and the length cap.
//!
//! The composer knows nothing about the network. Whether an exchange is in
//! flight is passed in by the caller, so `can_submit` stays a pure check:
//!
//! ```text
//! can_submit(in_flight) == !draft.trim().is_empty() && !in_flight
//! ```
//!
//! Every edit goes through the cap. Text that would push the draft past
//! `max_chars` characters is truncated (bulk input) or refused (single
//! insertions), so the draft can never exceed it.

use rand::Rng;
use rand::seq::SliceRandom;

/// Default cap on draft length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Above this many characters the counter turns to a warning.
const WARNING_THRESHOLD: usize = 800;
/// Above this many characters the counter turns to danger.
const DANGER_THRESHOLD: usize = 900;

/// Emoji offered by the insert-suggestion control.
pub const SUGGESTIONS: &[&str] = &["😊", "😍", "🥰", "💖", "💕", "🌸", "✨", "🌟", "💫", "🦋"];

/// How close the draft is to the cap, for colouring the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCountLevel {
    Normal,
    Warning,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Composer {
    draft: String,
    /// Cursor position as byte offset in draft (0..=draft.len())
    cursor: usize,
    max_chars: usize,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl Composer {
    pub fn new(max_chars: usize) -> Self {
        Self {
            draft: String::new(),
            cursor: 0,
            max_chars,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn char_count(&self) -> usize {
        self.draft.chars().count()
    }

    pub fn count_level(&self) -> CharCountLevel {
        match self.char_count() {
            n if n > DANGER_THRESHOLD => CharCountLevel::Danger,
            n if n > WARNING_THRESHOLD => CharCountLevel::Warning,
            _ => CharCountLevel::Normal,
        }
    }

    /// Replaces the draft, truncating to the cap. The cursor moves to the end.
    pub fn update_draft(&mut self, text: &str) {
        self.draft = truncate_chars(text, self.max_chars).to_string();
        self.cursor = self.draft.len();
    }

    pub fn can_submit(&self, in_flight: bool) -> bool {
        !in_flight && !self.draft.trim().is_empty()
    }

    /// Takes the trimmed draft for sending and clears the composer.
    /// Returns `None` (and changes nothing) when submission isn't allowed.
    pub fn submit(&mut self, in_flight: bool) -> Option<String> {
        if !self.can_submit(in_flight) {
            return None;
        }
        let text = std::mem::take(&mut self.draft).trim().to_string();
        self.cursor = 0;
        Some(text)
    }

    /// Inserts a literal token at the cursor and moves the cursor past it.
    /// Returns false if the token would exceed the cap.
    pub fn insert_suggestion(&mut self, token: &str) -> bool {
        if self.char_count() + token.chars().count() > self.max_chars {
            return false;
        }
        self.draft.insert_str(self.cursor, token);
        self.cursor += token.len();
        true
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        if self.char_count() >= self.max_chars {
            return false;
        }
        self.draft.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    /// Inserts pasted text at the cursor, keeping as much as fits.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let room = self.max_chars.saturating_sub(self.char_count());
        let fitted = truncate_chars(text, room);
        if fitted.is_empty() {
            return false;
        }
        self.draft.insert_str(self.cursor, fitted);
        self.cursor += fitted.len();
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = prev_char_boundary(&self.draft, self.cursor);
        self.draft.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.draft.len() {
            return false;
        }
        let next = next_char_boundary(&self.draft, self.cursor);
        self.draft.drain(self.cursor..next);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = prev_char_boundary(&self.draft, self.cursor);
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.draft.len() {
            return false;
        }
        self.cursor = next_char_boundary(&self.draft, self.cursor);
        true
    }

    /// Moves to the start of the current logical line.
    pub fn move_home(&mut self) -> bool {
        let line_start = self.draft[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let moved = self.cursor != line_start;
        self.cursor = line_start;
        moved
    }

    /// Moves to the end of the current logical line.
    pub fn move_end(&mut self) -> bool {
        let line_end = self.draft[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.draft.len());
        let moved = self.cursor != line_end;
        self.cursor = line_end;
        moved
    }
}

/// Picks a random emoji from [`SUGGESTIONS`].
pub fn random_suggestion<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SUGGESTIONS.choose(rng).copied().unwrap_or("💖")
}

/// Longest prefix of `text` holding at most `max` characters.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Byte offset of the previous character boundary before `pos`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the next character boundary after `pos`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
