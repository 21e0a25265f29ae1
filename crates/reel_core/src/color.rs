//! RGBA color value
//!
//! Channels are stored as `f32` in the `0.0..=1.0` range, in sRGB space.
//! Colors can be parsed from `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`
//! and `rgba(r, g, b, a)` strings.

use crate::error::{CoreError, Result};
use std::ops::Add;
use std::str::FromStr;

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns true if the string looks like a color literal
    pub fn is_color_literal(value: &str) -> bool {
        let value = value.trim_start();
        value.starts_with('#') || value.starts_with("rgb")
    }

    /// Parse a CSS-like color string
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let invalid = || CoreError::InvalidColor(value.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let (body, has_alpha) = if let Some(rest) = trimmed.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = trimmed.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };

        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<f32> = body
            .split(',')
            .map(|part| part.trim().parse::<f32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| invalid())?;

        match (parts.as_slice(), has_alpha) {
            ([r, g, b], false) => Ok(Self::rgb(r / 255.0, g / 255.0, b / 255.0)),
            ([r, g, b, a], true) => Ok(Self::rgba(r / 255.0, g / 255.0, b / 255.0, *a)),
            _ => Err(invalid()),
        }
    }

    /// Convert sRGB channels to linear light (alpha untouched)
    pub fn to_linear(&self) -> Color {
        Color::rgba(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a,
        )
    }

    /// Convert linear-light channels back to sRGB (alpha untouched)
    pub fn to_srgb(&self) -> Color {
        Color::rgba(
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
            self.a,
        )
    }

    /// Format as `#rrggbbaa`
    pub fn to_hex_string(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::rgba(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl FromStr for Color {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nibble = |c: u8| (c as char).to_digit(16);
    let bytes = hex.as_bytes();
    let byte = |i: usize| Some(nibble(bytes[i])? * 16 + nibble(bytes[i + 1])?);

    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])? * 17;
            let g = nibble(bytes[1])? * 17;
            let b = nibble(bytes[2])? * 17;
            Some(Color::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0))
        }
        6 | 8 => {
            let r = byte(0)? as f32 / 255.0;
            let g = byte(2)? as f32 / 255.0;
            let b = byte(4)? as f32 / 255.0;
            let a = if bytes.len() == 8 {
                byte(6)? as f32 / 255.0
            } else {
                1.0
            };
            Some(Color::rgba(r, g, b, a))
        }
        _ => None,
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#ff0000").unwrap(), Color::RED);

        let translucent = Color::parse("#00000080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(Color::parse("rgb(0, 255, 0)").unwrap(), Color::GREEN);
        let c: Color = "rgba(0, 0, 255, 0.5)".parse().unwrap();
        assert_eq!(c, Color::BLUE.with_alpha(0.5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Color::parse("#12"),
            Err(CoreError::InvalidColor(_))
        ));
        assert!(Color::parse("rgb(1, 2)").is_err());
        assert!(Color::parse("blue").is_err());
        assert!(Color::parse("#gggggg").is_err());
    }

    #[test]
    fn test_linear_round_trip() {
        let c = Color::rgb(0.2, 0.5, 0.8);
        let back = c.to_linear().to_srgb();
        assert!((back.r - c.r).abs() < 1e-5);
        assert!((back.g - c.g).abs() < 1e-5);
        assert!((back.b - c.b).abs() < 1e-5);
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(Color::RED.to_hex_string(), "#ff0000ff");
        assert!(Color::is_color_literal("#abc"));
        assert!(Color::is_color_literal("rgba(1,2,3,1)"));
        assert!(!Color::is_color_literal("hello"));
    }
}
