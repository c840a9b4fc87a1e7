//! CSS color parsing for faded strokes.
//!
//! Pings fade by rewriting their color as `rgba(r,g,b,alpha)`, so the
//! configured color string has to be broken into channels first. Accepts
//! `#rgb`, `#rrggbb`, `rgb(...)`/`rgba(...)`, and common CSS names.
//! Anything else reads as black.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS color, falling back to black.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).unwrap_or_default();
        }
        if let Some(body) = s.strip_prefix("rgba(").or_else(|| s.strip_prefix("rgb(")) {
            return parse_functional(body).unwrap_or_default();
        }
        named(&s).unwrap_or_default()
    }

    /// `rgba(r,g,b,alpha)` with alpha clamped to `[0, 1]`.
    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> String {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        format!("rgba({},{},{},{alpha})", self.r, self.g, self.b)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let digit = |i: usize| hex.get(i..=i).and_then(hex_value);
    let pair = |i: usize| hex.get(i..i + 2).and_then(hex_value);
    match hex.len() {
        3 => Some(Rgb::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Some(Rgb::new(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

fn hex_value(digits: &str) -> Option<u8> {
    match u8::from_str_radix(digits, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

fn parse_functional(body: &str) -> Option<Rgb> {
    let inner = body.strip_suffix(')')?;
    let mut channels = inner.split(',').map(|part| {
        let part = part.trim();
        let value = match part.strip_suffix('%') {
            Some(pct) => pct.trim().parse::<f64>().map_or(f64::NAN, |p| p * 255.0 / 100.0),
            None => part.parse::<f64>().unwrap_or(f64::NAN),
        };
        channel(value)
    });
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    Some(Rgb::new(r, g, b))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> Option<u8> {
    value.is_finite().then(|| value.round().clamp(0.0, 255.0) as u8)
}

fn named(name: &str) -> Option<Rgb> {
    let rgb = match name {
        "black" => Rgb::new(0, 0, 0),
        "white" => Rgb::new(255, 255, 255),
        "red" => Rgb::new(255, 0, 0),
        "green" => Rgb::new(0, 128, 0),
        "lime" => Rgb::new(0, 255, 0),
        "blue" => Rgb::new(0, 0, 255),
        "yellow" => Rgb::new(255, 255, 0),
        "cyan" | "aqua" => Rgb::new(0, 255, 255),
        "magenta" | "fuchsia" => Rgb::new(255, 0, 255),
        "gray" | "grey" => Rgb::new(128, 128, 128),
        "silver" => Rgb::new(192, 192, 192),
        "lightgray" | "lightgrey" => Rgb::new(211, 211, 211),
        "darkgray" | "darkgrey" => Rgb::new(169, 169, 169),
        "maroon" => Rgb::new(128, 0, 0),
        "olive" => Rgb::new(128, 128, 0),
        "navy" => Rgb::new(0, 0, 128),
        "purple" => Rgb::new(128, 0, 128),
        "teal" => Rgb::new(0, 128, 128),
        "orange" => Rgb::new(255, 165, 0),
        "gold" => Rgb::new(255, 215, 0),
        "pink" => Rgb::new(255, 192, 203),
        "brown" => Rgb::new(165, 42, 42),
        "steelblue" => Rgb::new(70, 130, 180),
        "skyblue" => Rgb::new(135, 206, 235),
        "lightblue" => Rgb::new(173, 216, 230),
        "darkblue" => Rgb::new(0, 0, 139),
        "darkgreen" => Rgb::new(0, 100, 0),
        "darkred" => Rgb::new(139, 0, 0),
        "coral" => Rgb::new(255, 127, 80),
        "tomato" => Rgb::new(255, 99, 71),
        "crimson" => Rgb::new(220, 20, 60),
        "indigo" => Rgb::new(75, 0, 130),
        "violet" => Rgb::new(238, 130, 238),
        "turquoise" => Rgb::new(64, 224, 208),
        "tan" => Rgb::new(210, 180, 140),
        "beige" => Rgb::new(245, 245, 220),
        "ivory" => Rgb::new(255, 255, 240),
        "khaki" => Rgb::new(240, 230, 140),
        "salmon" => Rgb::new(250, 128, 114),
        "slategray" | "slategrey" => Rgb::new(112, 128, 144),
        _ => return None,
    };
    Some(rgb)
}
