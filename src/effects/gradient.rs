//! Slowly drifting two-stop background gradient.
//!
//! The hue phase advances by [`HUE_STEP`] every tick and wraps at 360. The
//! two stops wobble around violet (260°) and orchid (290°).

/// Phase advance per gradient tick.
pub const HUE_STEP: f32 = 0.5;

/// A colour in HSL: hue in degrees, saturation and lightness in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn to_rgb(self) -> (u8, u8, u8) {
        hsl_to_rgb(self.h, self.s, self.l)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub start: Hsl,
    pub end: Hsl,
}

pub fn advance(hue: f32) -> f32 {
    (hue + HUE_STEP) % 360.0
}

pub fn gradient_at(hue: f32) -> Gradient {
    Gradient {
        start: Hsl {
            h: 260.0 + (hue * 0.01).sin() * 20.0,
            s: 0.70,
            l: 0.65,
        },
        end: Hsl {
            h: 290.0 + (hue * 0.01).cos() * 15.0,
            s: 0.60,
            l: 0.70,
        },
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        assert_eq!(advance(0.0), 0.5);
        assert_eq!(advance(359.5), 0.0);
    }

    #[test]
    fn test_gradient_at_zero() {
        let g = gradient_at(0.0);
        assert_eq!(g.start.h, 260.0);
        assert_eq!(g.end.h, 305.0);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), (255, 255, 255));
    }
}
