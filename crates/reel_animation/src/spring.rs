//! Damped spring tweens
//!
//! A spring integrates Hooke's law with linear damping at a fixed 120 Hz
//! sub-step, independent of the playback frame rate, and reports its position
//! once per frame until it settles on the target.

use crate::threading::{suspend, threadable, Thread, ThreadContext};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Simulation rate in steps per second
pub const SIMULATION_RATE: f64 = 120.0;

/// Distance and velocity under which a spring counts as settled
pub const DEFAULT_SETTLE_TOLERANCE: f64 = 0.001;

/// Spring physics parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SpringConfig {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    #[serde(default)]
    pub initial_velocity: f64,
}

impl SpringConfig {
    pub fn new(mass: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            mass,
            stiffness,
            damping,
            initial_velocity: 0.0,
        }
    }

    pub fn with_initial_velocity(mut self, velocity: f64) -> Self {
        self.initial_velocity = velocity;
        self
    }

    /// Kicks off with a strong impulse, then settles slowly
    pub fn beat() -> Self {
        Self::new(0.13, 5.7, 1.2).with_initial_velocity(10.0)
    }

    /// Quick pop with a small wobble
    pub fn plop() -> Self {
        Self::new(0.2, 20.0, 0.68)
    }

    /// Barely damped, oscillates for a long time
    pub fn bounce() -> Self {
        Self::new(0.08, 4.75, 0.05)
    }

    pub fn swing() -> Self {
        Self::new(0.39, 19.85, 2.82)
    }

    pub fn jump() -> Self {
        Self::new(0.04, 10.0, 0.7).with_initial_velocity(8.0)
    }

    pub fn strike() -> Self {
        Self::new(0.03, 20.0, 0.9).with_initial_velocity(4.8)
    }

    /// Close to critically damped
    pub fn smooth() -> Self {
        Self::new(0.16, 15.35, 1.88)
    }

    /// Look up a preset by its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "beat" => Some(Self::beat()),
            "plop" => Some(Self::plop()),
            "bounce" => Some(Self::bounce()),
            "swing" => Some(Self::swing()),
            "jump" => Some(Self::jump()),
            "strike" => Some(Self::strike()),
            "smooth" => Some(Self::smooth()),
            "default" => Some(Self::default()),
            _ => None,
        }
    }

    /// Reason the parameters cannot be simulated, if any
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if self.mass <= 0.0 {
            Some("spring mass must be greater than 0")
        } else if self.stiffness < 0.0 {
            Some("spring stiffness must be greater or equal to 0")
        } else if self.damping < 0.0 {
            Some("spring damping must be greater or equal to 0")
        } else {
            None
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(0.05, 10.0, 0.5)
    }
}

/// Integration state of a running spring
#[derive(Debug, Clone, Copy)]
struct SpringState {
    position: f64,
    velocity: f64,
}

impl SpringState {
    fn step(&mut self, config: &SpringConfig, to: f64, dt: f64) {
        let force = -config.stiffness * (self.position - to) - config.damping * self.velocity;
        self.velocity += force / config.mass * dt;
        self.position += self.velocity * dt;
    }

    fn is_settled(&self, to: f64, tolerance: f64) -> bool {
        (to - self.position).abs() < tolerance && self.velocity.abs() < tolerance
    }
}

/// Animate from `from` to `to` with a damped spring
///
/// `on_progress` receives the position and the seconds since the spring
/// started, first with `from` at time 0 and then once per frame. Once the
/// spring settles it receives `to` exactly, followed by `on_end`. Invalid
/// parameters are logged and the thread finishes without calling either
/// callback.
pub fn spring(
    config: SpringConfig,
    from: f64,
    to: f64,
    settle_tolerance: f64,
    mut on_progress: impl FnMut(f64, f64) + 'static,
    on_end: impl FnOnce(f64, f64) + 'static,
) -> Thread {
    threadable("spring", async move {
        if let Some(reason) = config.invalid_reason() {
            error!(?config, "{reason}");
            return;
        }
        let Some(ctx) = ThreadContext::try_current() else {
            on_progress(to, 0.0);
            on_end(to, 0.0);
            return;
        };

        let step = 1.0 / SIMULATION_RATE;
        let start = ctx.time();
        let mut simulated = start;
        let mut state = SpringState {
            position: from,
            velocity: config.initial_velocity,
        };

        on_progress(from, 0.0);

        let mut settled = false;
        while !settled {
            let now = ctx.time();
            while simulated < now {
                let dt = step.min(now - simulated);
                state.step(&config, to, dt);
                simulated = if dt < step { now } else { simulated + step };

                if state.is_settled(to, settle_tolerance) {
                    settled = true;
                    break;
                }
            }

            if !settled {
                on_progress(state.position, now - start);
                suspend().await;
            }
        }

        let elapsed = ctx.time() - start;
        on_progress(to, elapsed);
        on_end(to, elapsed);
    })
}
