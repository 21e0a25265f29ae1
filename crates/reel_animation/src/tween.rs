//! Frame-driven tweens
//!
//! [`tween`] is the primitive every keyed animation is built on: it reports a
//! linear progress in `[0, 1]` once per tick and finishes on the frame where
//! the full duration has elapsed. A [`TweenProvider`] turns a duration and an
//! easing into such a thread, which lets an [`Animator`](crate::Animator)
//! swap time-based tweens for springs.

use crate::easing::Easing;
use crate::spring::{spring, SpringConfig, DEFAULT_SETTLE_TOLERANCE};
use crate::threading::{suspend, threadable, Thread, ThreadContext};

/// Drive `on_progress` with linear progress for `seconds`
///
/// Progress is `elapsed_frames / total_frames`. The last call always receives
/// exactly `1.0` and is followed by `on_end`. A duration that rounds to zero
/// frames finishes within the current tick.
pub fn tween(
    seconds: f64,
    mut on_progress: impl FnMut(f64) + 'static,
    on_end: impl FnOnce() + 'static,
) -> Thread {
    threadable("tween", async move {
        if let Some(ctx) = ThreadContext::try_current() {
            let start = ctx.frame();
            let frames = ctx.seconds_to_frames(seconds);
            loop {
                let elapsed = ctx.frame().saturating_sub(start);
                if elapsed >= frames {
                    break;
                }
                on_progress(elapsed as f64 / frames as f64);
                suspend().await;
            }
        }
        on_progress(1.0);
        on_end();
    })
}

/// Factory for the thread that plays a single animator key
pub trait TweenProvider {
    /// Build a thread reporting eased progress to `on_progress`
    ///
    /// The progress starts at 0 and its last reported value must be 1.
    fn tween(
        &self,
        seconds: f64,
        easing: Easing,
        on_progress: Box<dyn FnMut(f64)>,
        on_end: Box<dyn FnOnce()>,
    ) -> Thread;
}

/// Duration-based tweens shaped by an easing curve
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeTweenProvider;

impl TweenProvider for TimeTweenProvider {
    fn tween(
        &self,
        seconds: f64,
        easing: Easing,
        mut on_progress: Box<dyn FnMut(f64)>,
        on_end: Box<dyn FnOnce()>,
    ) -> Thread {
        tween(seconds, move |t| on_progress(easing.apply(t)), on_end)
    }
}

/// Spring simulation from 0 to 1
///
/// Duration and easing are ignored: the spring settles in its own time and
/// may overshoot past 1 on the way.
#[derive(Debug, Clone, Copy)]
pub struct SpringTweenProvider {
    pub config: SpringConfig,
    pub settle_tolerance: f64,
}

impl SpringTweenProvider {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            config,
            settle_tolerance: DEFAULT_SETTLE_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, settle_tolerance: f64) -> Self {
        self.settle_tolerance = settle_tolerance;
        self
    }
}

impl Default for SpringTweenProvider {
    fn default() -> Self {
        Self::new(SpringConfig::default())
    }
}

impl TweenProvider for SpringTweenProvider {
    fn tween(
        &self,
        _seconds: f64,
        _easing: Easing,
        mut on_progress: Box<dyn FnMut(f64)>,
        on_end: Box<dyn FnOnce()>,
    ) -> Thread {
        spring(
            self.config,
            0.0,
            1.0,
            self.settle_tolerance,
            move |value, _| on_progress(value),
            move |_, _| on_end(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threading::Scheduler;
    use reel_core::{Clock, PlaybackClock};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn setup() -> (Rc<PlaybackClock>, Scheduler) {
        let clock = Rc::new(PlaybackClock::new(30.0).unwrap());
        let scheduler = Scheduler::new(clock.clone());
        (clock, scheduler)
    }

    #[test]
    fn test_linear_progress_per_frame() {
        let (clock, mut scheduler) = setup();
        let samples = Rc::new(RefCell::new(Vec::new()));
        let ended = Rc::new(Cell::new(None));

        let s = samples.clone();
        let e = ended.clone();
        let c = clock.clone();
        scheduler.spawn(tween(
            0.1,
            move |t| s.borrow_mut().push(t),
            move || e.set(Some(c.current_frame())),
        ));

        scheduler
            .run_until_idle(|| {
                clock.advance();
            })
            .unwrap();

        let samples = samples.borrow();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(samples[3], 1.0);
        assert_eq!(ended.get(), Some(3));
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let (_clock, mut scheduler) = setup();
        let samples = Rc::new(RefCell::new(Vec::new()));
        let ended = Rc::new(Cell::new(false));

        let s = samples.clone();
        let e = ended.clone();
        scheduler.spawn(tween(0.0, move |t| s.borrow_mut().push(t), move || e.set(true)));
        scheduler.tick().unwrap();

        assert_eq!(*samples.borrow(), vec![1.0]);
        assert!(ended.get());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_time_provider_applies_easing() {
        let (clock, mut scheduler) = setup();
        let samples = Rc::new(RefCell::new(Vec::new()));

        let s = samples.clone();
        let thread = TimeTweenProvider.tween(
            0.1,
            Easing::EaseInQuad,
            Box::new(move |t| s.borrow_mut().push(t)),
            Box::new(|| {}),
        );
        scheduler.spawn(thread);
        scheduler
            .run_until_idle(|| {
                clock.advance();
            })
            .unwrap();

        let samples = samples.borrow();
        assert!((samples[1] - 1.0 / 9.0).abs() < 1e-12);
        assert_eq!(*samples.last().unwrap(), 1.0);
    }

    #[test]
    fn test_spring_provider_ends_at_one() {
        let (clock, mut scheduler) = setup();
        let last = Rc::new(Cell::new(0.0));
        let ended = Rc::new(Cell::new(false));

        let l = last.clone();
        let e = ended.clone();
        let thread = SpringTweenProvider::new(SpringConfig::plop()).tween(
            1.0,
            Easing::Linear,
            Box::new(move |t| l.set(t)),
            Box::new(move || e.set(true)),
        );
        scheduler.spawn(thread);
        scheduler
            .run_until_idle(|| {
                clock.advance();
            })
            .unwrap();

        assert_eq!(last.get(), 1.0);
        assert!(ended.get());
    }
}
