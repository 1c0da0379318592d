//! Transient decorative glyphs.
//!
//! Positions are fractions of the drawing area (0.0 = left/top,
//! 1.0 = right/bottom) so the effects layer never needs terminal sizes.

use std::time::{Duration, Instant};

pub const AMBIENT_HEARTS: &[&str] = &["💕", "💖", "🌸", "✨"];
pub const REPLY_HEARTS: &[&str] = &["💖", "💕", "💗", "💓", "💝", "🌸", "✨"];
pub const SPARKLES: &[&str] = &["✨", "💫", "⭐", "🌟"];
pub const CELEBRATION: &[&str] = &["🎉", "🎊", "💖", "✨", "🌟", "💕", "🦋"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Drifts up from the bottom edge.
    AmbientHeart,
    /// Drifts up after a reply lands.
    ReplyHeart,
    /// Stays put over the send control, then vanishes.
    Sparkle,
    /// Falls from the top edge.
    Celebration,
}

/// A normalized rectangle, used to aim sparkles at a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub const FULL: Region = Region {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub glyph: &'static str,
    /// Horizontal position, fraction of the area width.
    pub x: f32,
    /// Starting vertical position, fraction of the area height.
    pub y: f32,
    pub born: Instant,
    /// Removed once this much time has passed.
    pub lifetime: Duration,
    /// Time to cross the area. Only moving kinds use it.
    pub travel: Duration,
    /// Drawn dimmed.
    pub faint: bool,
}

impl Particle {
    /// Fraction of the lifetime elapsed, clamped to 0..=1.
    pub fn age(&self, now: Instant) -> f32 {
        fraction(now.saturating_duration_since(self.born), self.lifetime)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.born) >= self.lifetime
    }

    /// Current position as (x, y) fractions of the area.
    pub fn position(&self, now: Instant) -> (f32, f32) {
        let moved = fraction(now.saturating_duration_since(self.born), self.travel);
        let y = match self.kind {
            ParticleKind::AmbientHeart | ParticleKind::ReplyHeart => self.y - moved * self.y,
            ParticleKind::Celebration => self.y + moved * (1.0 - self.y),
            ParticleKind::Sparkle => self.y,
        };
        (self.x, y.clamp(0.0, 1.0))
    }
}

fn fraction(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}
