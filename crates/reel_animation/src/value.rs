//! Dynamically typed animatable values
//!
//! [`Value`] lets a single property type carry numbers, text, colors and
//! geometry, and picks the blend from the variants at play time: numbers
//! blend linearly, color strings blend as colors and are written back as hex,
//! other strings use the typewriter blend, geometry blends component-wise.
//! Mismatched variants switch over at the halfway point.

use crate::interpolate::{
    bool_lerp, color_lerp, map, rect_lerp, spacing_lerp, text_lerp, vector2_lerp, ColorSpace,
    Interpolate,
};
use reel_core::{Color, Rect, Spacing, Vector2};
use std::fmt;
use std::ops::Add;

/// Animatable value of any supported kind
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Color(Color),
    Vector2(Vector2),
    Rect(Rect),
    Spacing(Spacing),
    Bool(bool),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(text) if Color::is_color_literal(text) => "color string",
            Value::Text(_) => "text",
            Value::Color(_) => "color",
            Value::Vector2(_) => "vector2",
            Value::Rect(_) => "rect",
            Value::Spacing(_) => "spacing",
            Value::Bool(_) => "bool",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Number(0.0)
    }
}

fn color_text_lerp(from: &str, to: &str, t: f64) -> Option<String> {
    if t == 0.0 {
        return Some(from.to_string());
    }
    if t == 1.0 {
        return Some(to.to_string());
    }
    let from = Color::parse(from).ok()?;
    let to = Color::parse(to).ok()?;
    Some(color_lerp(&from, &to, t, ColorSpace::Srgb).to_hex_string())
}

impl Interpolate for Value {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        match (from, to) {
            (Value::Number(a), Value::Number(b)) => Value::Number(map(*a, *b, t)),
            (Value::Text(a), Value::Text(b)) => {
                let blended = if Color::is_color_literal(a) && Color::is_color_literal(b) {
                    color_text_lerp(a, b, t)
                } else {
                    None
                };
                Value::Text(blended.unwrap_or_else(|| text_lerp(a, b, t)))
            }
            (Value::Color(a), Value::Color(b)) => {
                Value::Color(color_lerp(a, b, t, ColorSpace::Srgb))
            }
            (Value::Vector2(a), Value::Vector2(b)) => Value::Vector2(vector2_lerp(a, b, t)),
            (Value::Rect(a), Value::Rect(b)) => Value::Rect(rect_lerp(a, b, t)),
            (Value::Spacing(a), Value::Spacing(b)) => Value::Spacing(spacing_lerp(a, b, t)),
            _ => bool_lerp(from, to, t),
        }
    }
}

/// Relative offsets for `Animator::diff`
///
/// Text is appended, booleans and mismatched kinds take the right-hand side.
impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
            (Value::Text(a), Value::Text(b)) => Value::Text(a + &b),
            (Value::Color(a), Value::Color(b)) => Value::Color(a + b),
            (Value::Vector2(a), Value::Vector2(b)) => Value::Vector2(a + b),
            (Value::Rect(a), Value::Rect(b)) => Value::Rect(a + b),
            (Value::Spacing(a), Value::Spacing(b)) => Value::Spacing(a + b),
            (_, rhs) => rhs,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{value}"),
            Value::Text(text) => f.write_str(text),
            Value::Color(color) => f.write_str(&color.to_hex_string()),
            Value::Vector2(v) => write!(f, "({}, {})", v.x, v.y),
            Value::Rect(r) => write!(f, "[{}, {}, {}x{}]", r.x, r.y, r.width, r.height),
            Value::Spacing(s) => write!(f, "[{} {} {} {}]", s.top, s.right, s.bottom, s.left),
            Value::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Value::Color(value)
    }
}

impl From<Vector2> for Value {
    fn from(value: Vector2) -> Self {
        Value::Vector2(value)
    }
}

impl From<Rect> for Value {
    fn from(value: Rect) -> Self {
        Value::Rect(value)
    }
}

impl From<Spacing> for Value {
    fn from(value: Spacing) -> Self {
        Value::Spacing(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blend(from: impl Into<Value>, to: impl Into<Value>, t: f64) -> Value {
        Value::interpolate(&from.into(), &to.into(), t)
    }

    #[test]
    fn test_numbers_blend_linearly() {
        assert_eq!(blend(0.0, 10.0, 0.5), Value::Number(5.0));
        assert_eq!(blend(2.0, 4.0, 1.5), Value::Number(5.0));
    }

    #[test]
    fn test_color_strings_blend_as_colors() {
        assert_eq!(blend("#000000", "#ffffff", 0.5), Value::from("#808080ff"));
        assert_eq!(blend("#000", "rgb(255, 0, 0)", 0.0), Value::from("#000"));
        assert_eq!(blend("#000", "rgb(255, 0, 0)", 1.0), Value::from("rgb(255, 0, 0)"));
    }

    #[test]
    fn test_plain_text_uses_typewriter() {
        assert_eq!(blend("", "hello", 1.0), Value::from("hello"));
        assert_eq!(blend("", "hello", 0.0), Value::from(""));
    }

    #[test]
    fn test_geometry_blends_component_wise() {
        assert_eq!(
            blend(Vector2::new(0.0, 0.0), Vector2::new(10.0, 20.0), 0.5),
            Value::Vector2(Vector2::new(5.0, 10.0))
        );
        assert_eq!(
            blend(Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(10.0, 10.0, 30.0, 50.0), 0.5),
            Value::Rect(Rect::new(5.0, 5.0, 20.0, 30.0))
        );
    }

    #[test]
    fn test_mismatched_kinds_switch_halfway() {
        assert_eq!(blend(1.0, "one", 0.4), Value::Number(1.0));
        assert_eq!(blend(1.0, "one", 0.5), Value::from("one"));
        assert_eq!(blend(false, true, 0.7), Value::Bool(true));
    }

    #[test]
    fn test_add() {
        assert_eq!(Value::from(1.5) + Value::from(2.0), Value::Number(3.5));
        assert_eq!(
            Value::from(Vector2::new(1.0, 2.0)) + Value::from(Vector2::new(3.0, 4.0)),
            Value::Vector2(Vector2::new(4.0, 6.0))
        );
        assert_eq!(Value::from("ab") + Value::from("cd"), Value::from("abcd"));
        assert_eq!(Value::from(1.0) + Value::from(true), Value::Bool(true));
    }

    #[test]
    fn test_kind_and_display() {
        assert_eq!(Value::from("#fff").kind(), "color string");
        assert_eq!(Value::from("abc").kind(), "text");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(Color::RED).to_string(), "#ff0000ff");
    }
}
