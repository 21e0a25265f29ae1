//! Easing functions for animations

use crate::bezier::CubicBezier;
use std::f64::consts::PI;

/// Default overshoot for the back curves
pub const BACK_OVERSHOOT: f64 = 1.70158;

/// Default frequency for the elastic curves
pub const ELASTIC_FREQUENCY: f64 = 2.094395;

/// Default frequency for the in-out elastic curve
pub const ELASTIC_IN_OUT_FREQUENCY: f64 = 1.39626;

/// Easing function type
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    /// Overshoot amount
    EaseInBack(f64),
    EaseOutBack(f64),
    /// Overshoot amount and in-out scale
    EaseInOutBack(f64, f64),
    /// Oscillation frequency
    EaseInElastic(f64),
    EaseOutElastic(f64),
    EaseInOutElastic(f64),
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
    CubicBezier(CubicBezier),
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// CSS `ease`
    pub fn ease() -> Self {
        Self::bezier(0.25, 0.1, 0.25, 1.0)
    }

    /// CSS `ease-in-out` approximation of [`Easing::EaseInOutCubic`]
    pub fn css_ease_in_out_cubic() -> Self {
        Self::bezier(0.65, 0.0, 0.35, 1.0)
    }

    pub fn bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Easing::CubicBezier(CubicBezier::new(x1, y1, x2, y2))
    }

    pub fn ease_in_back() -> Self {
        Easing::EaseInBack(BACK_OVERSHOOT)
    }

    pub fn ease_out_back() -> Self {
        Easing::EaseOutBack(BACK_OVERSHOOT)
    }

    pub fn ease_in_out_back() -> Self {
        Easing::EaseInOutBack(BACK_OVERSHOOT, 1.525)
    }

    pub fn ease_in_elastic() -> Self {
        Easing::EaseInElastic(ELASTIC_FREQUENCY)
    }

    pub fn ease_out_elastic() -> Self {
        Easing::EaseOutElastic(ELASTIC_FREQUENCY)
    }

    pub fn ease_in_out_elastic() -> Self {
        Easing::EaseInOutElastic(ELASTIC_IN_OUT_FREQUENCY)
    }

    /// Look up a named curve (`ease-in-out-cubic`, `easeInOutCubic`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let easing = match key.as_str() {
            "linear" => Easing::Linear,
            "ease" => Easing::ease(),
            "easeinsine" => Easing::EaseInSine,
            "easeoutsine" => Easing::EaseOutSine,
            "easeinoutsine" => Easing::EaseInOutSine,
            "easeinquad" => Easing::EaseInQuad,
            "easeoutquad" => Easing::EaseOutQuad,
            "easeinoutquad" => Easing::EaseInOutQuad,
            "easeincubic" => Easing::EaseInCubic,
            "easeoutcubic" => Easing::EaseOutCubic,
            "easeinoutcubic" => Easing::EaseInOutCubic,
            "easeinquart" => Easing::EaseInQuart,
            "easeoutquart" => Easing::EaseOutQuart,
            "easeinoutquart" => Easing::EaseInOutQuart,
            "easeinquint" => Easing::EaseInQuint,
            "easeoutquint" => Easing::EaseOutQuint,
            "easeinoutquint" => Easing::EaseInOutQuint,
            "easeinexpo" => Easing::EaseInExpo,
            "easeoutexpo" => Easing::EaseOutExpo,
            "easeinoutexpo" => Easing::EaseInOutExpo,
            "easeincirc" => Easing::EaseInCirc,
            "easeoutcirc" => Easing::EaseOutCirc,
            "easeinoutcirc" => Easing::EaseInOutCirc,
            "easeinback" => Easing::ease_in_back(),
            "easeoutback" => Easing::ease_out_back(),
            "easeinoutback" => Easing::ease_in_out_back(),
            "easeinelastic" => Easing::ease_in_elastic(),
            "easeoutelastic" => Easing::ease_out_elastic(),
            "easeinoutelastic" => Easing::ease_in_out_elastic(),
            "easeinbounce" => Easing::EaseInBounce,
            "easeoutbounce" => Easing::EaseOutBounce,
            "easeinoutbounce" => Easing::EaseInOutBounce,
            _ => return None,
        };
        Some(easing)
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        // Built-in curves are pinned to their endpoints
        if (t == 0.0 || t == 1.0) && !matches!(self, Easing::Custom(_)) {
            return t;
        }
        match self {
            Easing::Linear => t,
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInQuint => t.powi(5),
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Easing::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Easing::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Easing::EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::EaseInCirc => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Easing::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt(),
            Easing::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }
            Easing::EaseInBack(s) => (s + 1.0) * t * t * t - s * t * t,
            Easing::EaseOutBack(s) => {
                1.0 + (s + 1.0) * (t - 1.0).powi(3) + s * (t - 1.0).powi(2)
            }
            Easing::EaseInOutBack(s, v) => {
                let c = s * v;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c + 1.0) * 2.0 * t - c)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c + 1.0) * (t * 2.0 - 2.0) + c) + 2.0) / 2.0
                }
            }
            Easing::EaseInElastic(s) => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * s).sin()
                }
            }
            Easing::EaseOutElastic(s) => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * s).sin() + 1.0
                }
            }
            Easing::EaseInOutElastic(s) => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * s).sin()) / 2.0
                } else {
                    2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * s).sin() / 2.0 + 1.0
                }
            }
            Easing::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Easing::EaseOutBounce => bounce_out(t),
            Easing::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            Easing::CubicBezier(curve) => curve.solve(t),
            Easing::Custom(f) => f(t),
        }
    }
}

impl From<CubicBezier> for Easing {
    fn from(curve: CubicBezier) -> Self {
        Easing::CubicBezier(curve)
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}
