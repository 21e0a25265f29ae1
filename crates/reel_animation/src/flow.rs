//! Flow control primitives
//!
//! Every function here returns a threadable [`Thread`]. Await it to run it
//! inline in the current task, or hand it to
//! [`spawn`](crate::threading::spawn) to run it as a child task.

use crate::threading::{join, spawn, suspend, threadable, TaskId, Thread, ThreadContext};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Waiting
// ─────────────────────────────────────────────────────────────────────────────

/// Suspend for `seconds`
///
/// Always suspends at least once: a zero duration resumes on the next tick.
pub fn wait_for(seconds: f64) -> Thread {
    threadable("wait_for", async move {
        let Some(ctx) = ThreadContext::try_current() else {
            return;
        };
        let start = ctx.frame();
        let frames = ctx.seconds_to_frames(seconds);
        loop {
            suspend().await;
            if ctx.frame().saturating_sub(start) >= frames {
                break;
            }
        }
    })
}

/// [`wait_for`], then run `after` inline
pub fn wait_for_then(seconds: f64, after: impl Into<Thread>) -> Thread {
    let after = after.into();
    threadable("wait_for", async move {
        wait_for(seconds).await;
        after.await;
    })
}

/// Point in time to wait for
#[derive(Debug, Clone, PartialEq)]
pub enum WaitTarget {
    /// Seconds from frame 0
    Seconds(f64),
    /// Absolute frame
    Frame(u64),
    /// Named time event
    Event(String),
}

impl From<f64> for WaitTarget {
    fn from(seconds: f64) -> Self {
        WaitTarget::Seconds(seconds)
    }
}

impl From<&str> for WaitTarget {
    fn from(name: &str) -> Self {
        WaitTarget::Event(name.to_string())
    }
}

impl From<String> for WaitTarget {
    fn from(name: String) -> Self {
        WaitTarget::Event(name)
    }
}

/// Suspend until the target frame is reached
///
/// Completes without suspending if the target is already in the past. A
/// named event that is not known yet is looked up again on every tick.
pub fn wait_until(target: impl Into<WaitTarget>) -> Thread {
    let target = target.into();
    threadable("wait_until", async move {
        let Some(ctx) = ThreadContext::try_current() else {
            return;
        };

        let lookup = |first: bool| -> Option<u64> {
            match &target {
                WaitTarget::Seconds(seconds) => Some(ctx.seconds_to_frames(*seconds)),
                WaitTarget::Frame(frame) => Some(*frame),
                WaitTarget::Event(name) => {
                    let events = ctx.events()?;
                    if first {
                        events.register(name, ctx.frame())
                    } else {
                        events.frame_for_event(name)
                    }
                }
            }
        };

        let mut frame = lookup(true);
        loop {
            if matches!(frame, Some(at) if ctx.frame() >= at) {
                break;
            }
            suspend().await;
            frame = lookup(false);
        }
    })
}

/// [`wait_until`], then run `after` inline
pub fn wait_until_then(target: impl Into<WaitTarget>, after: impl Into<Thread>) -> Thread {
    let wait = wait_until(target);
    let after = after.into();
    threadable("wait_until", async move {
        wait.await;
        after.await;
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Composition
// ─────────────────────────────────────────────────────────────────────────────

/// Thread that finishes immediately
pub fn noop() -> Thread {
    threadable("noop", async {})
}

/// Name a future and mark it threadable
pub fn run<F>(name: &'static str, future: F) -> Thread
where
    F: std::future::Future<Output = ()> + 'static,
{
    threadable(name, future)
}

/// Run `thread` after `seconds`
pub fn delay(seconds: f64, thread: impl Into<Thread>) -> Thread {
    let thread = thread.into();
    threadable("delay", async move {
        wait_for(seconds).await;
        thread.await;
    })
}

/// Run threads one after another
pub fn chain<I>(threads: I) -> Thread
where
    I: IntoIterator,
    I::Item: Into<Thread>,
{
    let threads: Vec<Thread> = threads.into_iter().map(Into::into).collect();
    threadable("chain", async move {
        for thread in threads {
            thread.await;
        }
    })
}

async fn spawn_all(threads: Vec<Thread>) -> SmallVec<[TaskId; 4]> {
    let mut tasks = SmallVec::new();
    for thread in threads {
        tasks.push(spawn(thread).await);
    }
    tasks
}

/// Run threads in parallel and wait for all of them
pub fn all<I>(threads: I) -> Thread
where
    I: IntoIterator,
    I::Item: Into<Thread>,
{
    let threads: Vec<Thread> = threads.into_iter().map(Into::into).collect();
    threadable("all", async move {
        let tasks = spawn_all(threads).await;
        join(true, tasks).await;
    })
}

/// Run threads in parallel and wait for the first one
///
/// The remaining threads are cancelled when this thread finishes.
pub fn any<I>(threads: I) -> Thread
where
    I: IntoIterator,
    I::Item: Into<Thread>,
{
    let threads: Vec<Thread> = threads.into_iter().map(Into::into).collect();
    threadable("any", async move {
        let tasks = spawn_all(threads).await;
        join(false, tasks).await;
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Loops
// ─────────────────────────────────────────────────────────────────────────────

/// Run `factory(i)` for `iterations` iterations
///
/// An iteration that returns `None` suspends for one tick instead.
pub fn loop_n<F, R>(iterations: usize, factory: F) -> Thread
where
    F: FnMut(usize) -> R + 'static,
    R: Into<Option<Thread>> + 'static,
{
    threadable("loop", run_loop(Some(iterations), factory))
}

/// Run `factory(i)` forever
///
/// Refuses to run in a root task, since the root would then never finish.
pub fn loop_forever<F, R>(factory: F) -> Thread
where
    F: FnMut(usize) -> R + 'static,
    R: Into<Option<Thread>> + 'static,
{
    threadable("loop", run_loop(None, factory))
}

async fn run_loop<F, R>(iterations: Option<usize>, mut factory: F)
where
    F: FnMut(usize) -> R,
    R: Into<Option<Thread>>,
{
    if iterations.is_none() {
        let root = ThreadContext::try_current().map_or(true, |ctx| ctx.is_root());
        if root {
            tracing::error!("tried to run an infinite loop in a root thread; spawn it instead");
            return;
        }
    }

    let mut i = 0;
    while iterations.map_or(true, |n| i < n) {
        match factory(i).into() {
            Some(thread) => thread.await,
            None => suspend().await,
        }
        i += 1;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timers
// ─────────────────────────────────────────────────────────────────────────────

struct EveryState {
    interval: f64,
    callback: Option<Box<dyn FnMut(u64)>>,
    changed: bool,
}

/// Timer that calls a callback every N seconds
///
/// Created by [`every`]. The timer only runs while its
/// [`runner`](EveryTimer::runner) thread is scheduled.
#[derive(Clone)]
pub struct EveryTimer {
    state: Rc<RefCell<EveryState>>,
}

/// Call `callback` now and then every `interval` seconds
pub fn every(interval: f64, callback: impl FnMut(u64) + 'static) -> EveryTimer {
    EveryTimer {
        state: Rc::new(RefCell::new(EveryState {
            interval,
            callback: Some(Box::new(callback)),
            changed: false,
        })),
    }
}

impl EveryTimer {
    /// Thread driving the timer; it never finishes on its own
    pub fn runner(&self) -> Thread {
        let state = Rc::clone(&self.state);
        threadable("every", async move {
            let Some(ctx) = ThreadContext::try_current() else {
                return;
            };
            let mut acc = 0u64;
            let mut tick = 0u64;
            fire(&state, tick);

            loop {
                let interval = state.borrow().interval;
                if acc >= ctx.seconds_to_frames(interval) {
                    acc = 0;
                    tick += 1;
                    fire(&state, tick);
                } else {
                    state.borrow_mut().changed = false;
                }
                acc += 1;
                suspend().await;
            }
        })
    }

    pub fn set_interval(&self, interval: f64) {
        let mut state = self.state.borrow_mut();
        state.interval = interval;
        state.changed = false;
    }

    pub fn set_callback(&self, callback: impl FnMut(u64) + 'static) {
        let mut state = self.state.borrow_mut();
        state.callback = Some(Box::new(callback));
        state.changed = false;
    }

    /// Wait until the timer fires
    pub fn sync(&self) -> Thread {
        let state = Rc::clone(&self.state);
        threadable("every_sync", async move {
            while !state.borrow().changed {
                suspend().await;
            }
        })
    }
}

fn fire(state: &Rc<RefCell<EveryState>>, tick: u64) {
    let callback = state.borrow_mut().callback.take();
    if let Some(mut callback) = callback {
        callback(tick);
        let mut state = state.borrow_mut();
        if state.callback.is_none() {
            state.callback = Some(callback);
        }
    }
    state.borrow_mut().changed = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threading::Scheduler;
    use reel_core::{Clock, PlaybackClock, TimeEvents};
    use std::cell::Cell;

    fn setup() -> (Rc<PlaybackClock>, Scheduler) {
        let clock = Rc::new(PlaybackClock::new(30.0).unwrap());
        let scheduler = Scheduler::new(clock.clone());
        (clock, scheduler)
    }

    /// Tick once per frame until `frame` (inclusive)
    fn run_to(clock: &PlaybackClock, scheduler: &mut Scheduler, frame: u64) {
        while clock.current_frame() < frame {
            scheduler.tick().unwrap();
            clock.advance();
        }
        scheduler.tick().unwrap();
    }

    #[test]
    fn test_wait_for_resumes_on_exact_frame() {
        let (clock, mut scheduler) = setup();
        let done_at = Rc::new(Cell::new(None));
        let done = done_at.clone();
        let c = clock.clone();
        scheduler.spawn(threadable("root", async move {
            wait_for(1.0).await;
            done.set(Some(c.current_frame()));
        }));

        run_to(&clock, &mut scheduler, 29);
        assert_eq!(done_at.get(), None);
        clock.advance();
        scheduler.tick().unwrap();
        assert_eq!(done_at.get(), Some(30));
    }

    #[test]
    fn test_wait_for_zero_resumes_next_tick() {
        let (clock, mut scheduler) = setup();
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        scheduler.spawn(threadable("root", async move {
            wait_for(0.0).await;
            flag.set(true);
        }));

        scheduler.tick().unwrap();
        assert!(!done.get());
        clock.advance();
        scheduler.tick().unwrap();
        assert!(done.get());
    }

    #[test]
    fn test_wait_until_past_target_does_not_suspend() {
        let (clock, mut scheduler) = setup();
        clock.seek(100);
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        scheduler.spawn(threadable("root", async move {
            wait_until(WaitTarget::Frame(50)).await;
            flag.set(true);
        }));

        scheduler.tick().unwrap();
        assert!(done.get());
    }

    #[test]
    fn test_wait_until_seconds() {
        let (clock, mut scheduler) = setup();
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        scheduler.spawn(threadable("root", async move {
            wait_until(0.5).await;
            flag.set(true);
        }));

        run_to(&clock, &mut scheduler, 14);
        assert!(!done.get());
        clock.advance();
        scheduler.tick().unwrap();
        assert!(done.get());
    }

    #[test]
    fn test_wait_until_event_picks_up_offset() {
        let clock = Rc::new(PlaybackClock::new(30.0).unwrap());
        let events = Rc::new(TimeEvents::new());
        events.load([("drop", 20u64)]);
        let mut scheduler = Scheduler::new(clock.clone()).with_events(events.clone());

        let done_at = Rc::new(Cell::new(None));
        let done = done_at.clone();
        let c = clock.clone();
        scheduler.spawn(threadable("root", async move {
            wait_until("drop").await;
            done.set(Some(c.current_frame()));
        }));

        run_to(&clock, &mut scheduler, 5);
        // Editor moves the event while the waiter is suspended
        events.set_offset("drop", 40, true);
        run_to(&clock, &mut scheduler, 40);
        assert_eq!(done_at.get(), Some(40));
    }

    #[test]
    fn test_wait_until_unknown_event_without_registry_waits() {
        let (clock, mut scheduler) = setup();
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        scheduler.spawn(threadable("root", async move {
            wait_until("never").await;
            flag.set(true);
        }));
        run_to(&clock, &mut scheduler, 10);
        assert!(!done.get());
        assert!(!scheduler.is_idle());
    }

    #[test]
    fn test_delay_and_chain() {
        let (clock, mut scheduler) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        let c = clock.clone();
        let c2 = clock.clone();
        scheduler.spawn(chain([
            delay(
                0.5,
                threadable("a", async move {
                    a.borrow_mut().push(("a", c.current_frame()));
                }),
            ),
            threadable("b", async move {
                b.borrow_mut().push(("b", c2.current_frame()));
            }),
        ]));

        scheduler.run_until_idle(|| {
            clock.advance();
        })
        .unwrap();
        assert_eq!(*log.borrow(), vec![("a", 15), ("b", 15)]);
    }

    #[test]
    fn test_all_waits_for_longest() {
        let (clock, mut scheduler) = setup();
        let frames = scheduler_run(&clock, &mut scheduler, all([wait_for(0.5), wait_for(1.0)]));
        assert_eq!(frames, 30);
    }

    #[test]
    fn test_any_finishes_with_shortest() {
        let (clock, mut scheduler) = setup();
        let frames = scheduler_run(&clock, &mut scheduler, any([wait_for(0.5), wait_for(1.0)]));
        assert_eq!(frames, 15);
    }

    fn scheduler_run(clock: &Rc<PlaybackClock>, scheduler: &mut Scheduler, thread: Thread) -> u64 {
        scheduler.spawn(thread);
        scheduler
            .run_until_idle(|| {
                clock.advance();
            })
            .unwrap()
    }

    #[test]
    fn test_loop_n_runs_each_iteration() {
        let (clock, mut scheduler) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let frames = scheduler_run(
            &clock,
            &mut scheduler,
            loop_n(3, move |i| {
                s.borrow_mut().push(i);
                None::<Thread>
            }),
        );
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        // Each empty iteration suspends once
        assert_eq!(frames, 3);
    }

    #[test]
    fn test_loop_forever_refuses_root() {
        let (clock, mut scheduler) = setup();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let frames = scheduler_run(
            &clock,
            &mut scheduler,
            loop_forever(move |_| {
                c.set(c.get() + 1);
                wait_for(0.1)
            }),
        );
        assert_eq!(frames, 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_loop_forever_in_child() {
        let (clock, mut scheduler) = setup();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        scheduler.spawn(threadable("root", async move {
            let looping = spawn(loop_forever(move |_| {
                c.set(c.get() + 1);
                wait_for(0.0)
            }))
            .await;
            wait_for(1.0).await;
            crate::threading::cancel([looping]).await;
        }));

        scheduler
            .run_until_idle(|| {
                clock.advance();
            })
            .unwrap();
        // One iteration per frame, frames 0..=30
        assert_eq!(calls.get(), 31);
    }

    #[test]
    fn test_every_fires_on_interval() {
        let (clock, mut scheduler) = setup();
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let t = ticks.clone();
        let c = clock.clone();
        let timer = every(0.5, move |tick| t.borrow_mut().push((tick, c.current_frame())));
        scheduler.spawn(timer.runner());

        run_to(&clock, &mut scheduler, 31);
        assert_eq!(*ticks.borrow(), vec![(0, 0), (1, 15), (2, 30)]);
    }

    #[test]
    fn test_every_set_interval_and_sync() {
        let (clock, mut scheduler) = setup();
        let count = Rc::new(Cell::new(0u64));
        let n = count.clone();
        let timer = every(1.0, move |_| n.set(n.get() + 1));
        timer.set_interval(0.1);
        let synced = Rc::new(Cell::new(None));

        let runner = timer.runner();
        let sync_timer = timer.clone();
        let s = synced.clone();
        let c = clock.clone();
        scheduler.spawn(threadable("root", async move {
            spawn(runner).await;
            wait_for(0.15).await;
            sync_timer.sync().await;
            s.set(Some(c.current_frame()));
        }));

        run_to(&clock, &mut scheduler, 12);
        // Fires on frames 0, 3 and 6; the waiter is parked on frame 5
        assert_eq!(synced.get(), Some(6));
        assert_eq!(count.get(), 3);
    }
}
