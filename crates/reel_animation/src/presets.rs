//! Animation presets for common entry/exit animations
//!
//! Pre-built animators for opacity, scale and position properties. Each
//! preset returns an [`Animator`] that can be extended with more steps before
//! calling [`Animator::run`].

use crate::animator::Animator;
use crate::easing::Easing;
use crate::spring::SpringConfig;
use crate::tween::SpringTweenProvider;
use reel_core::{Property, Vector2};

/// Pre-built animation presets for common patterns
pub struct AnimationPreset;

impl AnimationPreset {
    // ========================================================================
    // Fade animations
    // ========================================================================

    /// Fade in from transparent to opaque
    pub fn fade_in(opacity: impl Property<f64> + 'static, seconds: f64) -> Animator<f64> {
        Animator::new(opacity)
            .from(0.0)
            .key(1.0, seconds, Easing::EaseOutCubic)
    }

    /// Fade out from opaque to transparent
    pub fn fade_out(opacity: impl Property<f64> + 'static, seconds: f64) -> Animator<f64> {
        Animator::new(opacity)
            .from(1.0)
            .key(0.0, seconds, Easing::EaseInCubic)
    }

    // ========================================================================
    // Scale animations
    // ========================================================================

    /// Grow from nothing with a slight overshoot
    pub fn pop_in(scale: impl Property<f64> + 'static, seconds: f64) -> Animator<f64> {
        Animator::new(scale)
            .from(0.0)
            .key(1.1, seconds * 0.7, Easing::EaseOutCubic)
            .key(1.0, seconds * 0.3, Easing::EaseInOutSine)
    }

    /// Grow by `factor` and return to the current scale
    pub fn pulse(scale: impl Property<f64> + 'static, factor: f64, seconds: f64) -> Animator<f64> {
        let half = seconds / 2.0;
        let peak = scale.get() * factor;
        Animator::new(scale)
            .key(peak, half, Easing::EaseOutQuad)
            .back(half, Easing::EaseInQuad)
    }

    /// Spring from nothing to full size
    pub fn spring_in(scale: impl Property<f64> + 'static, config: SpringConfig) -> Animator<f64> {
        Animator::new(scale)
            .with_tween_provider(SpringTweenProvider::new(config))
            .from(0.0)
            .key(1.0, 0.0, Easing::Linear)
    }

    // ========================================================================
    // Motion animations
    // ========================================================================

    /// Shake sideways around the current value and settle back
    pub fn shake(offset: impl Property<f64> + 'static, distance: f64, seconds: f64) -> Animator<f64> {
        let quarter = seconds / 4.0;
        Animator::new(offset)
            .diff(distance, quarter, Easing::EaseOutSine)
            .diff(-2.0 * distance, quarter * 2.0, Easing::EaseInOutSine)
            .back(quarter, Easing::EaseInSine)
    }

    /// Slide into the current position from `distance` to the left
    pub fn slide_in_left(
        position: impl Property<Vector2> + 'static,
        distance: f32,
        seconds: f64,
    ) -> Animator<Vector2> {
        Self::slide_in(position, Vector2::new(-distance, 0.0), seconds)
    }

    /// Slide into the current position from `distance` to the right
    pub fn slide_in_right(
        position: impl Property<Vector2> + 'static,
        distance: f32,
        seconds: f64,
    ) -> Animator<Vector2> {
        Self::slide_in(position, Vector2::new(distance, 0.0), seconds)
    }

    /// Slide into the current position from `distance` above
    pub fn slide_in_top(
        position: impl Property<Vector2> + 'static,
        distance: f32,
        seconds: f64,
    ) -> Animator<Vector2> {
        Self::slide_in(position, Vector2::new(0.0, -distance), seconds)
    }

    fn slide_in(
        position: impl Property<Vector2> + 'static,
        offset: Vector2,
        seconds: f64,
    ) -> Animator<Vector2> {
        let rest = position.get();
        Animator::new(position)
            .from(rest + offset)
            .key(rest, seconds, Easing::EaseOutCubic)
    }
}
