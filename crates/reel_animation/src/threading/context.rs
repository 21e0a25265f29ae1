//! Access to the running scheduler from inside a task
//!
//! While a scheduler ticks, it installs itself as the current scheduler of
//! the OS thread. Suspension primitives use this to post their signal and
//! task code uses [`ThreadContext`] to query the clock or its own state,
//! without passing a context through every call.
//!
//! ```ignore
//! let thread = threadable("blink", async {
//!     let ctx = ThreadContext::current();
//!     while !ctx.is_cancelled() {
//!         wait_for(0.5).await;
//!     }
//! });
//! ```

use super::scheduler::{SchedulerState, SharedState};
use super::signal::{Resume, Signal};
use super::thread::{TaskId, TaskState};
use reel_core::{Clock, FrameEvents};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

thread_local! {
    static CURRENT: RefCell<Option<SharedState>> = const { RefCell::new(None) };
}

/// Restores the previously installed scheduler on drop
pub(crate) struct EnterGuard {
    previous: Option<SharedState>,
}

pub(crate) fn enter(state: SharedState) -> EnterGuard {
    let previous = CURRENT.with(|current| current.replace(Some(state)));
    EnterGuard { previous }
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|current| *current.borrow_mut() = previous);
    }
}

fn installed() -> Option<SharedState> {
    CURRENT.with(|current| current.borrow().clone())
}

/// Record the signal of the task being resumed
pub(crate) fn post(signal: Signal) {
    let Some(state) = installed() else {
        tracing::warn!(signal = signal.kind(), "signal posted outside of a scheduler tick");
        return;
    };
    let mut state = state.borrow_mut();
    match &state.signal {
        Some(existing) if !matches!(existing, Signal::Suspend) => {
            tracing::error!(
                kept = existing.kind(),
                dropped = signal.kind(),
                "a task posted more than one control signal in a single resumption"
            );
        }
        _ => state.signal = Some(signal),
    }
}

/// Take the resume value buffered for the task being resumed
pub(crate) fn take_input() -> Option<Resume> {
    installed().and_then(|state| state.borrow_mut().input.take())
}

/// Handle to the running task and its scheduler
#[derive(Clone)]
pub struct ThreadContext {
    state: Weak<RefCell<SchedulerState>>,
    task: TaskId,
}

impl ThreadContext {
    /// Context of the task currently being resumed
    ///
    /// # Panics
    ///
    /// Panics if called outside of a scheduler tick.
    pub fn current() -> Self {
        Self::try_current().expect("ThreadContext::current() called outside of a scheduler tick")
    }

    /// Context of the task currently being resumed, if any
    pub fn try_current() -> Option<Self> {
        let state = installed()?;
        let task = state.borrow().current?;
        Some(Self {
            state: Rc::downgrade(&state),
            task,
        })
    }

    fn with_state<R>(&self, f: impl FnOnce(&SchedulerState) -> R) -> Option<R> {
        let state = self.state.upgrade()?;
        let state = state.borrow();
        Some(f(&state))
    }

    fn clock(&self) -> Option<Rc<dyn Clock>> {
        self.with_state(|state| Rc::clone(&state.clock))
    }

    pub fn task(&self) -> TaskId {
        self.task
    }

    /// Frame the scheduler is currently ticking
    pub fn frame(&self) -> u64 {
        self.clock().map(|clock| clock.current_frame()).unwrap_or(0)
    }

    /// Current time in seconds
    pub fn time(&self) -> f64 {
        self.clock()
            .map(|clock| clock.frames_to_seconds(clock.current_frame()))
            .unwrap_or(0.0)
    }

    pub fn seconds_to_frames(&self, seconds: f64) -> u64 {
        self.clock()
            .map(|clock| clock.seconds_to_frames(seconds))
            .unwrap_or(0)
    }

    pub fn frames_to_seconds(&self, frames: u64) -> f64 {
        self.clock()
            .map(|clock| clock.frames_to_seconds(frames))
            .unwrap_or(0.0)
    }

    /// Named-event lookup, if the scheduler has one
    pub fn events(&self) -> Option<Rc<dyn FrameEvents>> {
        self.with_state(|state| state.events.clone()).flatten()
    }

    /// True once this task has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.with_state(|state| match state.tasks.get(self.task) {
            Some(node) => node.state == TaskState::Cancelling,
            None => true,
        })
        .unwrap_or(true)
    }

    /// True if this task has no parent
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    pub fn parent(&self) -> Option<TaskId> {
        self.with_state(|state| state.tasks.get(self.task).and_then(|node| node.parent))
            .flatten()
    }

    pub fn children(&self) -> Vec<TaskId> {
        self.with_state(|state| {
            state
                .tasks
                .get(self.task)
                .map(|node| node.children.to_vec())
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    /// True while `task` is registered with this task's scheduler
    pub fn is_alive(&self, task: TaskId) -> bool {
        self.with_state(|state| state.tasks.contains_key(task))
            .unwrap_or(false)
    }

    /// Pause or resume this task and everything it spawned
    pub fn pause(&self, paused: bool) {
        if let Some(state) = self.state.upgrade() {
            if let Some(node) = state.borrow_mut().tasks.get_mut(self.task) {
                node.paused = paused;
            }
        }
    }
}

impl std::fmt::Debug for ThreadContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadContext")
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}
