//! Reel Animation
//!
//! Frame-stepped animation runtime: cooperative threads, tweens and springs,
//! timing curves, and keyed property animation.
//!
//! # Features
//!
//! - **Threads**: async blocks resumed once per frame, with spawn, join and
//!   tree-wide cancellation
//! - **Flow**: `wait_for`, `wait_until`, loops, timers and combinators
//! - **Tweens**: linear progress per frame, or a damped spring at a fixed
//!   simulation rate
//! - **Animator**: fluent keys, relative keys and loops over a property
//! - **Curves**: the usual easing set and cubic Bézier timing
//!
//! # Example
//!
//! ```rust
//! use reel_animation::flow::wait_for;
//! use reel_animation::threading::{schedule, spawn, join, threadable};
//! use reel_animation::{Animator, Easing};
//! use reel_core::{PlaybackClock, Property, SharedProperty};
//! use std::rc::Rc;
//!
//! let clock = Rc::new(PlaybackClock::new(30.0).unwrap());
//! let x = SharedProperty::new(0.0);
//!
//! let target = x.clone();
//! let frames = schedule(clock, threadable("scene", async move {
//!     let slide = spawn(Animator::new(target).key(100.0, 1.0, Easing::Linear).run(1)).await;
//!     let pause = spawn(wait_for(2.0)).await;
//!     join(true, [slide, pause]).await;
//! }))
//! .unwrap();
//!
//! assert_eq!(frames, 60);
//! assert_eq!(x.get(), 100.0);
//! ```

pub mod animator;
pub mod bezier;
pub mod config;
pub mod easing;
pub mod error;
pub mod flow;
pub mod interpolate;
pub mod presets;
pub mod spring;
pub mod threading;
pub mod tween;
pub mod value;

pub use animator::Animator;
pub use bezier::{BisectionMode, CubicBezier};
pub use config::SchedulerConfig;
pub use easing::Easing;
pub use error::{Result, ThreadError};
pub use interpolate::{ColorSpace, Interpolate, InterpolationFn};
pub use presets::AnimationPreset;
pub use spring::{spring, SpringConfig};
pub use threading::{Scheduler, TaskId, TaskState, Thread};
pub use tween::{tween, SpringTweenProvider, TimeTweenProvider, TweenProvider};
pub use value::Value;
