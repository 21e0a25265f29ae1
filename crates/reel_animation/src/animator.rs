//! Keyed property animation
//!
//! An [`Animator`] records a sequence of steps against a property and turns
//! it into a [`Thread`] with [`Animator::run`]. Each key tweens the property
//! from the value the previous key ended on to its own target.
//!
//! ```rust
//! use reel_animation::{Animator, Easing};
//! use reel_animation::threading::Scheduler;
//! use reel_core::{PlaybackClock, Property, SharedProperty};
//! use std::rc::Rc;
//!
//! let clock = Rc::new(PlaybackClock::new(30.0).unwrap());
//! let mut scheduler = Scheduler::new(clock.clone());
//! let opacity = SharedProperty::new(0.0);
//!
//! scheduler.spawn(
//!     Animator::new(opacity.clone())
//!         .key(1.0, 0.5, Easing::EaseOutCubic)
//!         .wait_for(1.0)
//!         .back(0.5, Easing::EaseInCubic)
//!         .run(1),
//! );
//! scheduler.run_until_idle(|| { clock.advance(); }).unwrap();
//! assert_eq!(opacity.get(), 0.0);
//! ```

use crate::easing::Easing;
use crate::flow::{wait_for, wait_until, WaitTarget};
use crate::interpolate::{Interpolate, InterpolationFn};
use crate::threading::{threadable, Thread};
use crate::tween::{TimeTweenProvider, TweenProvider};
use reel_core::Property;
use std::cell::RefCell;
use std::fmt;
use std::ops::Add;
use std::rc::Rc;
use tracing::trace;

/// Target of a key
#[derive(Clone)]
enum KeyTarget<T> {
    Value(T),
    /// The value the animator started from
    Initial,
}

enum Step<T> {
    Key {
        target: KeyTarget<T>,
        seconds: f64,
        easing: Easing,
        interpolation: Option<InterpolationFn<T>>,
    },
    WaitFor(f64),
    WaitUntil(WaitTarget),
    Call(Rc<dyn Fn()>),
}

impl<T> Step<T> {
    fn kind(&self) -> &'static str {
        match self {
            Step::Key { .. } => "key",
            Step::WaitFor(_) => "wait_for",
            Step::WaitUntil(_) => "wait_until",
            Step::Call(_) => "call",
        }
    }
}

/// Builder for a keyed animation of one property
pub struct Animator<T> {
    property: Rc<dyn Property<T>>,
    provider: Rc<dyn TweenProvider>,
    interpolation: Option<InterpolationFn<T>>,
    steps: Vec<Step<T>>,
    from: Option<T>,
    last_target: Option<T>,
}

impl<T> Animator<T>
where
    T: Interpolate + Clone + 'static,
{
    pub fn new(property: impl Property<T> + 'static) -> Self {
        Self {
            property: Rc::new(property),
            provider: Rc::new(TimeTweenProvider),
            interpolation: None,
            steps: Vec::new(),
            from: None,
            last_target: None,
        }
    }

    /// Play keys with `provider` instead of duration-based tweens
    pub fn with_tween_provider(mut self, provider: impl TweenProvider + 'static) -> Self {
        self.provider = Rc::new(provider);
        self
    }

    /// Replace the inferred blend for every key without its own
    pub fn with_interpolation(mut self, interpolation: impl Fn(&T, &T, f64) -> T + 'static) -> Self {
        self.interpolation = Some(Rc::new(interpolation));
        self
    }

    /// Start from `value` instead of the property's current value
    ///
    /// The property is set to `value` when the animation starts playing.
    pub fn from(mut self, value: impl Into<T>) -> Self {
        self.from = Some(value.into());
        self
    }

    /// Tween to `value` over `seconds`
    pub fn key(self, value: impl Into<T>, seconds: f64, easing: Easing) -> Self {
        self.push_key(KeyTarget::Value(value.into()), seconds, easing, None)
    }

    /// [`key`](Self::key) with a custom blend
    pub fn key_with(
        self,
        value: impl Into<T>,
        seconds: f64,
        easing: Easing,
        interpolation: impl Fn(&T, &T, f64) -> T + 'static,
    ) -> Self {
        self.push_key(
            KeyTarget::Value(value.into()),
            seconds,
            easing,
            Some(Rc::new(interpolation)),
        )
    }

    /// Tween back to the starting value
    pub fn back(self, seconds: f64, easing: Easing) -> Self {
        self.push_key(KeyTarget::Initial, seconds, easing, None)
    }

    /// [`back`](Self::back) with a custom blend
    pub fn back_with(
        self,
        seconds: f64,
        easing: Easing,
        interpolation: impl Fn(&T, &T, f64) -> T + 'static,
    ) -> Self {
        self.push_key(KeyTarget::Initial, seconds, easing, Some(Rc::new(interpolation)))
    }

    pub fn wait_for(mut self, seconds: f64) -> Self {
        self.steps.push(Step::WaitFor(seconds));
        self
    }

    pub fn wait_until(mut self, target: impl Into<WaitTarget>) -> Self {
        self.steps.push(Step::WaitUntil(target.into()));
        self
    }

    /// Run `callback` once when playback reaches this point
    pub fn call(mut self, callback: impl Fn() + 'static) -> Self {
        self.steps.push(Step::Call(Rc::new(callback)));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn push_key(
        mut self,
        target: KeyTarget<T>,
        seconds: f64,
        easing: Easing,
        interpolation: Option<InterpolationFn<T>>,
    ) -> Self {
        self.last_target = Some(match &target {
            KeyTarget::Value(value) => value.clone(),
            KeyTarget::Initial => self.initial_value(),
        });
        self.steps.push(Step::Key {
            target,
            seconds,
            easing,
            interpolation,
        });
        self
    }

    fn initial_value(&self) -> T {
        match &self.from {
            Some(from) => from.clone(),
            None => self.property.get(),
        }
    }

    /// Play the steps `loops` times
    ///
    /// Every loop starts from the same initial value, so keys never inherit
    /// the end state of the previous loop.
    pub fn run(self, loops: usize) -> Thread {
        let Animator {
            property,
            provider,
            interpolation,
            steps,
            from,
            ..
        } = self;

        threadable("animator", async move {
            if let Some(from) = &from {
                property.set(from.clone());
            }
            let initial = from.unwrap_or_else(|| property.get());
            let current = Rc::new(RefCell::new(initial.clone()));

            for iteration in 0..loops {
                *current.borrow_mut() = initial.clone();
                for (index, step) in steps.iter().enumerate() {
                    trace!(iteration, index, step = step.kind(), "animator step");
                    match step {
                        Step::Key {
                            target,
                            seconds,
                            easing,
                            interpolation: own,
                        } => {
                            let target = match target {
                                KeyTarget::Value(value) => value.clone(),
                                KeyTarget::Initial => initial.clone(),
                            };
                            let start = current.borrow().clone();
                            let blend = own.clone().or_else(|| interpolation.clone());

                            let sink = property.clone();
                            let end = target.clone();
                            let on_progress = Box::new(move |t: f64| {
                                let value = match &blend {
                                    Some(blend) => blend(&start, &end, t),
                                    None => T::interpolate(&start, &end, t),
                                };
                                sink.set(value);
                            });

                            let settled = current.clone();
                            let on_end = Box::new(move || {
                                *settled.borrow_mut() = target;
                            });

                            provider.tween(*seconds, *easing, on_progress, on_end).await;
                        }
                        Step::WaitFor(seconds) => wait_for(*seconds).await,
                        Step::WaitUntil(target) => wait_until(target.clone()).await,
                        Step::Call(callback) => callback(),
                    }
                }
            }
        })
    }
}

impl<T> Animator<T>
where
    T: Interpolate + Clone + Add<Output = T> + 'static,
{
    /// Tween by `delta` relative to the previous key's target
    ///
    /// Without a previous key the delta applies to the starting value.
    pub fn diff(self, delta: impl Into<T>, seconds: f64, easing: Easing) -> Self {
        let target = self.diff_base() + delta.into();
        self.key(target, seconds, easing)
    }

    /// [`diff`](Self::diff) with a custom blend
    pub fn diff_with(
        self,
        delta: impl Into<T>,
        seconds: f64,
        easing: Easing,
        interpolation: impl Fn(&T, &T, f64) -> T + 'static,
    ) -> Self {
        let target = self.diff_base() + delta.into();
        self.key_with(target, seconds, easing, interpolation)
    }

    fn diff_base(&self) -> T {
        match &self.last_target {
            Some(last) => last.clone(),
            None => self.initial_value(),
        }
    }
}

impl<T> fmt::Debug for Animator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("steps", &self.steps.iter().map(Step::kind).collect::<Vec<_>>())
            .field("has_from", &self.from.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spring::SpringConfig;
    use crate::threading::Scheduler;
    use crate::tween::SpringTweenProvider;
    use crate::value::Value;
    use reel_core::{Clock, FnProperty, PlaybackClock, SharedProperty};
    use std::cell::Cell;

    struct Harness {
        clock: Rc<PlaybackClock>,
        scheduler: Scheduler,
    }

    impl Harness {
        fn new(thread: Thread) -> Self {
            let clock = Rc::new(PlaybackClock::new(30.0).unwrap());
            let mut scheduler = Scheduler::new(clock.clone());
            scheduler.spawn(thread);
            scheduler.tick().unwrap();
            Self { clock, scheduler }
        }

        fn advance_to(&mut self, frame: u64) {
            while self.clock.current_frame() < frame {
                self.clock.advance();
                self.scheduler.tick().unwrap();
            }
        }

        fn finish(&mut self) {
            while !self.scheduler.is_idle() {
                self.clock.advance();
                self.scheduler.tick().unwrap();
            }
        }
    }

    #[test]
    fn test_linear_key_hits_midpoint_and_target() {
        let value = SharedProperty::new(0.0_f64);
        let mut h = Harness::new(Animator::new(value.clone()).key(10.0, 1.0, Easing::Linear).run(1));

        h.advance_to(15);
        assert!((value.get() - 5.0).abs() < 1e-9);
        h.advance_to(30);
        assert_eq!(value.get(), 10.0);
        assert!(h.scheduler.is_idle());
    }

    #[test]
    fn test_diff_and_back() {
        let value = SharedProperty::new(2.0);
        let animator = Animator::new(value.clone())
            .key(5.0, 0.1, Easing::Linear)
            .diff(3.0, 0.1, Easing::Linear)
            .back(0.1, Easing::Linear);
        let mut h = Harness::new(animator.run(1));

        h.advance_to(3);
        assert_eq!(value.get(), 5.0);
        h.advance_to(6);
        assert_eq!(value.get(), 8.0);
        h.advance_to(9);
        assert_eq!(value.get(), 2.0);
        assert!(h.scheduler.is_idle());
    }

    #[test]
    fn test_diff_without_key_uses_start() {
        let value = SharedProperty::new(1.0);
        let animator = Animator::new(value.clone())
            .diff(2.0, 0.1, Easing::Linear)
            .diff(2.0, 0.1, Easing::Linear);
        let mut h = Harness::new(animator.run(1));
        h.finish();
        assert_eq!(value.get(), 5.0);
    }

    #[test]
    fn test_loops_restart_from_initial_value() {
        let value = SharedProperty::new(0.0_f64);
        let ends = Rc::new(Cell::new(0));
        let e = ends.clone();
        let animator = Animator::new(value.clone())
            .key(10.0, 0.1, Easing::Linear)
            .call(move || e.set(e.get() + 1));
        let mut h = Harness::new(animator.run(2));

        h.advance_to(3);
        assert_eq!(ends.get(), 1);
        assert_eq!(value.get(), 0.0);
        h.advance_to(4);
        assert!((value.get() - 10.0 / 3.0).abs() < 1e-9);
        h.finish();
        assert_eq!(ends.get(), 2);
        assert_eq!(value.get(), 10.0);
    }

    #[test]
    fn test_zero_loops_does_nothing() {
        let value = SharedProperty::new(3.0);
        let h = Harness::new(Animator::new(value.clone()).key(10.0, 1.0, Easing::Linear).run(0));
        assert!(h.scheduler.is_idle());
        assert_eq!(value.get(), 3.0);
    }

    #[test]
    fn test_from_overrides_current_value() {
        let value = SharedProperty::new(0.0);
        let mut h = Harness::new(
            Animator::new(value.clone())
                .from(4.0)
                .key(8.0, 0.1, Easing::Linear)
                .back(0.1, Easing::Linear)
                .run(1),
        );
        assert_eq!(value.get(), 4.0);
        h.advance_to(3);
        assert_eq!(value.get(), 8.0);
        h.finish();
        assert_eq!(value.get(), 4.0);
    }

    #[test]
    fn test_waits_and_calls_in_order() {
        let value = SharedProperty::new(0.0);
        let marks = Rc::new(RefCell::new(Vec::new()));
        let m = marks.clone();
        let clock_probe = Rc::new(Cell::new(0));
        let probe = clock_probe.clone();

        let mut h = Harness::new(
            Animator::new(value.clone())
                .key(1.0, 0.1, Easing::Linear)
                .wait_for(0.1)
                .call(move || {
                    m.borrow_mut().push("called");
                    probe.set(probe.get() + 1);
                })
                .wait_until(0.5)
                .key(2.0, 0.1, Easing::Linear)
                .run(1),
        );

        h.advance_to(5);
        assert!(marks.borrow().is_empty());
        h.advance_to(6);
        assert_eq!(*marks.borrow(), vec!["called"]);
        h.advance_to(15);
        assert_eq!(value.get(), 1.0);
        h.finish();
        assert_eq!(h.clock.current_frame(), 18);
        assert_eq!(value.get(), 2.0);
        assert_eq!(clock_probe.get(), 1);
    }

    #[test]
    fn test_custom_interpolation() {
        let value = SharedProperty::new(0.0);
        let mut h = Harness::new(
            Animator::new(value.clone())
                .key_with(10.0, 0.1, Easing::Linear, |from, to, t| if t < 1.0 { *from } else { *to })
                .run(1),
        );
        h.advance_to(2);
        assert_eq!(value.get(), 0.0);
        h.finish();
        assert_eq!(value.get(), 10.0);
    }

    #[test]
    fn test_easing_shapes_progress() {
        let value = SharedProperty::new(0.0_f64);
        let mut h = Harness::new(Animator::new(value.clone()).key(9.0, 0.1, Easing::EaseInQuad).run(1));
        h.advance_to(1);
        assert!((value.get() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_spring_provider_overshoots_and_lands() {
        let history = Rc::new(RefCell::new(Vec::new()));
        let store = Rc::new(Cell::new(0.0));
        let (read, write, log) = (store.clone(), store.clone(), history.clone());
        let property = FnProperty::new(
            move || read.get(),
            move |v: f64| {
                write.set(v);
                log.borrow_mut().push(v);
            },
        );

        let mut h = Harness::new(
            Animator::new(property)
                .with_tween_provider(SpringTweenProvider::new(SpringConfig::plop()))
                .key(10.0, 1.0, Easing::Linear)
                .run(1),
        );
        h.finish();

        assert_eq!(store.get(), 10.0);
        assert!(history.borrow().iter().any(|&v| v > 10.0));
    }

    #[test]
    fn test_value_animator_blends_color_strings() {
        let fill = SharedProperty::new(Value::from("#000000"));
        let mut h = Harness::new(
            Animator::new(fill.clone())
                .key("#ffffff", 0.1, Easing::Linear)
                .diff(1.0, 0.1, Easing::Linear)
                .run(1),
        );

        h.advance_to(1);
        assert_eq!(fill.get(), Value::from("#555555ff"));
        h.advance_to(3);
        assert_eq!(fill.get(), Value::from("#ffffff"));
        h.finish();
        assert_eq!(fill.get(), Value::Number(1.0));
    }

    #[test]
    fn test_debug_lists_steps() {
        let animator = Animator::new(SharedProperty::new(0.0))
            .key(1.0, 0.5, Easing::Linear)
            .wait_for(1.0);
        assert_eq!(animator.len(), 2);
        assert!(format!("{animator:?}").contains("wait_for"));
    }
}
