use std::time::Instant;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::effects::Effects;
use crate::effects::particles::Particle;
use crate::tui::component::Component;

/// Draws live particles on top of everything else.
///
/// Particle positions are fractions of the area; glyphs are two columns
/// wide, so the last usable column is `width - 2`.
pub struct EffectsOverlay<'a> {
    pub effects: &'a Effects,
    pub now: Instant,
}

/// Terminal cell for a particle, or `None` if the area is too small.
pub fn particle_cell(particle: &Particle, now: Instant, area: Rect) -> Option<(u16, u16)> {
    if area.width < 2 || area.height == 0 {
        return None;
    }
    let (fx, fy) = particle.position(now);
    let max_x = area.width - 2;
    let max_y = area.height - 1;
    let x = area.x + (fx * max_x as f32).round().min(max_x as f32) as u16;
    let y = area.y + (fy * max_y as f32).round().min(max_y as f32) as u16;
    Some((x, y))
}

fn draw(buf: &mut Buffer, particle: &Particle, now: Instant, area: Rect) {
    let Some((x, y)) = particle_cell(particle, now, area) else {
        return;
    };
    let style = if particle.faint || particle.age(now) > 0.8 {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };
    buf.set_string(x, y, particle.glyph, style);
}

impl Component for EffectsOverlay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let buf = frame.buffer_mut();
        for particle in self.effects.particles() {
            draw(buf, particle, self.now, area);
        }
    }
}
