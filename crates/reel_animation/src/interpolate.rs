//! Value interpolation
//!
//! [`Interpolate`] blends two values of the same type given an eased progress.
//! Every implementation returns `from` at `t = 0` and `to` at `t = 1`
//! exactly. Values outside `[0, 1]` extrapolate, which lets overshooting
//! curves such as back and elastic easing work.
//!
//! The free functions cover blends that need extra arguments (color space,
//! arc direction) and small numeric helpers used across the crate.

use reel_core::{Color, Rect, Spacing, Vector2};
use std::f64::consts::FRAC_PI_2;

/// Blend between two values
pub trait Interpolate: Sized {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self;
}

/// Boxed custom interpolation function
pub type InterpolationFn<T> = std::rc::Rc<dyn Fn(&T, &T, f64) -> T>;

// ─────────────────────────────────────────────────────────────────────────────
// Numeric helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Linear blend, exact at both ends
#[inline]
pub fn map(from: f64, to: f64, value: f64) -> f64 {
    from * (1.0 - value) + to * value
}

/// Alias for [`map`]
#[inline]
pub fn lerp(from: f64, to: f64, value: f64) -> f64 {
    map(from, to, value)
}

#[inline]
fn map_f32(from: f32, to: f32, value: f64) -> f32 {
    map(from as f64, to as f64, value) as f32
}

/// Map `value` from the input range onto the output range
pub fn remap(from_in: f64, to_in: f64, from_out: f64, to_out: f64, value: f64) -> f64 {
    from_out + ((value - from_in) * (to_out - from_out)) / (to_in - from_in)
}

pub fn clamp(min: f64, max: f64, value: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// [`remap`] followed by a clamp to the output range
pub fn clamp_remap(from_in: f64, to_in: f64, from_out: f64, to_out: f64, value: f64) -> f64 {
    let remapped = remap(from_in, to_in, from_out, to_out, value);
    let (low, high) = if from_out > to_out {
        (to_out, from_out)
    } else {
        (from_out, to_out)
    };
    clamp(low, high, remapped)
}

/// Step between two values at the halfway point
pub fn bool_lerp<T: Clone>(from: &T, to: &T, value: f64) -> T {
    if value < 0.5 {
        from.clone()
    } else {
        to.clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────────────────────────────────────

/// Typewriter blend between two strings
///
/// Growing text types the target in from the left while the old characters
/// are kept until overwritten. Shrinking text erases from the right.
pub fn text_lerp(from: &str, to: &str, value: f64) -> String {
    let from: Vec<char> = from.chars().collect();
    let to: Vec<char> = to.chars().collect();

    if to.len() >= from.len() {
        let current = (to.len() as f64 * value).floor();
        let current_length = map(from.len() as f64 - 1.0, to.len() as f64, value).floor();

        let mut text = String::with_capacity(to.len());
        for (i, &target) in to.iter().enumerate() {
            let index = i as f64;
            if index < current {
                text.push(target);
            } else if i < from.len() || index <= current_length {
                text.push(from.get(i).copied().unwrap_or(target));
            }
        }
        text
    } else {
        let current = (from.len() as f64 * (1.0 - value)).round();
        let current_length = map(from.len() as f64 + 1.0, to.len() as f64, value).floor();

        let mut reversed = Vec::with_capacity(from.len());
        for (i, &source) in from.iter().enumerate().rev() {
            let index = i as f64;
            if index < current {
                reversed.push(source);
            } else if i < to.len() || index < current_length {
                reversed.push(to.get(i).copied().unwrap_or(source));
            }
        }
        reversed.into_iter().rev().collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// Space in which color channels are blended
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// Blend the stored sRGB channels directly
    #[default]
    Srgb,
    /// Blend in linear light, then convert back to sRGB
    LinearRgb,
}

pub fn color_lerp(from: &Color, to: &Color, value: f64, space: ColorSpace) -> Color {
    if value == 0.0 {
        return *from;
    }
    if value == 1.0 {
        return *to;
    }

    let blend = |a: &Color, b: &Color| {
        Color::rgba(
            map_f32(a.r, b.r, value),
            map_f32(a.g, b.g, value),
            map_f32(a.b, b.b, value),
            map_f32(a.a, b.a, value),
        )
    };

    match space {
        ColorSpace::Srgb => blend(from, to),
        ColorSpace::LinearRgb => blend(&from.to_linear(), &to.to_linear()).to_srgb(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

pub fn vector2_lerp(from: &Vector2, to: &Vector2, value: f64) -> Vector2 {
    Vector2::new(map_f32(from.x, to.x, value), map_f32(from.y, to.y, value))
}

/// Blend with separate progress for each axis
pub fn vector2_lerp_axes(from: &Vector2, to: &Vector2, value: Vector2) -> Vector2 {
    Vector2::new(
        map_f32(from.x, to.x, value.x as f64),
        map_f32(from.y, to.y, value.y as f64),
    )
}

pub fn spacing_lerp(from: &Spacing, to: &Spacing, value: f64) -> Spacing {
    Spacing::new(
        map_f32(from.top, to.top, value),
        map_f32(from.right, to.right, value),
        map_f32(from.bottom, to.bottom, value),
        map_f32(from.left, to.left, value),
    )
}

pub fn rect_lerp(from: &Rect, to: &Rect, value: f64) -> Rect {
    rect_lerp_axes(from, to, Vector2::splat(value as f32))
}

/// Blend position and size with the X progress horizontally and the Y
/// progress vertically
pub fn rect_lerp_axes(from: &Rect, to: &Rect, value: Vector2) -> Rect {
    let vx = value.x as f64;
    let vy = value.y as f64;
    Rect::new(
        map_f32(from.x, to.x, vx),
        map_f32(from.y, to.y, vy),
        map_f32(from.width, to.width, vx),
        map_f32(from.height, to.height, vy),
    )
}

/// Per-axis progress along a quarter ellipse
///
/// `ratio` describes the aspect of the travelled path. A ratio of 1 follows
/// a circular arc; ratios further from 1 blend toward a straight line.
pub fn arc_lerp(value: f64, reverse: bool, ratio: f64) -> Vector2 {
    let mut ratio = if ratio.is_nan() { 1.0 } else { ratio };
    let mut flip = reverse;
    if ratio > 1.0 {
        ratio = 1.0 / ratio;
    } else {
        flip = !flip;
    }

    let normalized = if flip {
        clamp(-1.0, 1.0, 1.0 - value).acos()
    } else {
        clamp(-1.0, 1.0, value).asin()
    };
    let radians = map(normalized, map(0.0, FRAC_PI_2, value), ratio);

    let mut x = radians.sin();
    let mut y = 1.0 - radians.cos();
    if reverse {
        std::mem::swap(&mut x, &mut y);
    }

    Vector2::new(x as f32, y as f32)
}

/// Arc ratio for travelling between two rectangles
pub fn calculate_ratio(from: &Rect, to: &Rect) -> f64 {
    let position = (from.position() - to.position()).ctg() as f64;
    let size = (from.size() - to.size()).ctg() as f64;
    (position + size) / 2.0
}

/// Blend two rectangles along an elliptical arc
pub fn rect_arc_lerp(from: &Rect, to: &Rect, value: f64, reverse: bool, ratio: Option<f64>) -> Rect {
    if value == 0.0 {
        return *from;
    }
    if value == 1.0 {
        return *to;
    }
    let ratio = ratio.unwrap_or_else(|| calculate_ratio(from, to));
    rect_lerp_axes(from, to, arc_lerp(value, reverse, ratio))
}

/// Blend two points along an elliptical arc
pub fn vector2_arc_lerp(
    from: &Vector2,
    to: &Vector2,
    value: f64,
    reverse: bool,
    ratio: Option<f64>,
) -> Vector2 {
    if value == 0.0 {
        return *from;
    }
    if value == 1.0 {
        return *to;
    }
    let ratio = ratio.unwrap_or_else(|| (*from - *to).ctg() as f64);
    vector2_lerp_axes(from, to, arc_lerp(value, reverse, ratio))
}

// ─────────────────────────────────────────────────────────────────────────────
// Trait impls
// ─────────────────────────────────────────────────────────────────────────────

impl Interpolate for f64 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        map(*from, *to, t)
    }
}

impl Interpolate for f32 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        map_f32(*from, *to, t)
    }
}

impl Interpolate for bool {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        bool_lerp(from, to, t)
    }
}

impl Interpolate for String {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        text_lerp(from, to, t)
    }
}

impl Interpolate for Color {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        color_lerp(from, to, t, ColorSpace::Srgb)
    }
}

impl Interpolate for Vector2 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        vector2_lerp(from, to, t)
    }
}

impl Interpolate for Spacing {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        spacing_lerp(from, to, t)
    }
}

impl Interpolate for Rect {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        rect_lerp(from, to, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_exact_at_bounds() {
        assert_eq!(map(0.1, 0.3, 0.0), 0.1);
        assert_eq!(map(0.1, 0.3, 1.0), 0.3);
        assert_eq!(map(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_remap_and_clamp() {
        assert_eq!(remap(0.0, 1.0, 10.0, 20.0, 0.5), 15.0);
        assert_eq!(clamp(0.0, 1.0, 2.0), 1.0);
        assert_eq!(clamp_remap(0.0, 1.0, 20.0, 10.0, 2.0), 10.0);
        assert_eq!(clamp_remap(0.0, 1.0, 20.0, 10.0, -1.0), 20.0);
    }

    #[test]
    fn test_text_lerp_bounds() {
        assert_eq!(text_lerp("hi", "hello", 0.0), "hi");
        assert_eq!(text_lerp("hi", "hello", 1.0), "hello");
        assert_eq!(text_lerp("goodbye", "bye", 0.0), "goodbye");
        assert_eq!(text_lerp("goodbye", "bye", 1.0), "bye");
        assert_eq!(text_lerp("", "abc", 0.0), "");
    }

    #[test]
    fn test_text_lerp_types_in() {
        assert_eq!(text_lerp("", "hello", 0.5), "hel");
        assert_eq!(text_lerp("", "hello", 0.2), "h");
    }

    #[test]
    fn test_text_lerp_multibyte() {
        assert_eq!(text_lerp("", "héllo", 1.0), "héllo");
        assert_eq!(text_lerp("", "héllo", 0.4), "hé");
    }

    #[test]
    fn test_color_lerp() {
        let mid = color_lerp(&Color::BLACK, &Color::WHITE, 0.5, ColorSpace::Srgb);
        assert!((mid.r - 0.5).abs() < 1e-6);

        let linear = color_lerp(&Color::BLACK, &Color::WHITE, 0.5, ColorSpace::LinearRgb);
        assert!(linear.r > 0.7);

        assert_eq!(
            color_lerp(&Color::RED, &Color::BLUE, 0.0, ColorSpace::LinearRgb),
            Color::RED
        );
        assert_eq!(
            color_lerp(&Color::RED, &Color::BLUE, 1.0, ColorSpace::LinearRgb),
            Color::BLUE
        );
    }

    #[test]
    fn test_boundary_idempotence() {
        let a = Rect::new(1.5, -2.0, 10.0, 3.3);
        let b = Rect::new(-7.1, 4.0, 0.2, 9.0);
        assert_eq!(Rect::interpolate(&a, &b, 0.0), a);
        assert_eq!(Rect::interpolate(&a, &b, 1.0), b);
        assert_eq!(rect_arc_lerp(&a, &b, 0.0, false, None), a);
        assert_eq!(rect_arc_lerp(&a, &b, 1.0, true, None), b);

        let s1 = Spacing::new(1.0, 2.0, 3.0, 4.0);
        let s2 = Spacing::all(0.3);
        assert_eq!(Spacing::interpolate(&s1, &s2, 0.0), s1);
        assert_eq!(Spacing::interpolate(&s1, &s2, 1.0), s2);

        let v1 = Vector2::new(0.1, 0.7);
        let v2 = Vector2::new(-3.0, 1e6);
        assert_eq!(Vector2::interpolate(&v1, &v2, 0.0), v1);
        assert_eq!(Vector2::interpolate(&v1, &v2, 1.0), v2);
        assert_eq!(vector2_arc_lerp(&v1, &v2, 1.0, false, None), v2);

        assert_eq!(f32::interpolate(&0.1, &0.7, 1.0), 0.7);
        assert!(!bool::interpolate(&false, &true, 0.0));
        assert!(bool::interpolate(&false, &true, 1.0));
    }

    #[test]
    fn test_arc_lerp_endpoints() {
        for reverse in [false, true] {
            for ratio in [0.5, 1.0, 2.0] {
                let start = arc_lerp(0.0, reverse, ratio);
                let end = arc_lerp(1.0, reverse, ratio);
                assert!(start.x.abs() < 1e-6 && start.y.abs() < 1e-6);
                assert!((end.x - 1.0).abs() < 1e-6 && (end.y - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_arc_lerp_circular_midpoint() {
        // Ratio 1 follows a quarter circle: the axes differ at the midpoint
        let mid = arc_lerp(0.5, false, 1.0);
        assert!((mid.x - mid.y).abs() > 0.1);
    }
}
