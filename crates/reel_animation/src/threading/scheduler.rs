//! Cooperative thread scheduler
//!
//! Owns a tree of tasks and resumes every live task once per tick. Tasks are
//! plain futures; a task suspends by posting a [`Signal`] and returning
//! `Poll::Pending`. After each resumption the scheduler interprets the
//! signal:
//!
//! - `Suspend`: park until the next tick
//! - `Spawn`: register a child and run it right away, then continue the parent
//! - `Join`: register a joiner child that completes once the join condition
//!   holds; the requester stays parked until the joiner is gone
//! - `Cancel`: remove the listed subtrees immediately, then continue the
//!   requester
//!
//! Each tick works on a snapshot of the active list taken when the tick
//! starts. Tasks re-enqueued during the tick go to the front of the working
//! queue, parked tasks go to the next tick's list.

use super::context;
use super::join::joiner;
use super::signal::{CancelRequest, JoinRequest, Resume, Signal};
use super::thread::{BoxFuture, TaskId, TaskState, Thread};
use crate::config::SchedulerConfig;
use crate::error::{Result, ThreadError};
use reel_core::{Clock, FrameEvents, PlaybackClock};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use futures_task::noop_waker;
use std::task::{Context, Poll};

pub(crate) type SharedState = Rc<RefCell<SchedulerState>>;

/// A task registered with the scheduler
pub(crate) struct TaskNode {
    pub name: Cow<'static, str>,
    /// Taken out while the task is being polled
    pub future: Option<BoxFuture>,
    pub parent: Option<TaskId>,
    pub children: SmallVec<[TaskId; 4]>,
    pub state: TaskState,
    pub paused: bool,
    /// Buffered until the next resumption
    pub input: Option<Resume>,
}

pub(crate) struct SchedulerState {
    pub tasks: SlotMap<TaskId, TaskNode>,
    /// Final state of recently finished tasks
    pub outcomes: FxHashMap<TaskId, TaskState>,
    /// Finish order of `outcomes`, oldest first
    pub outcome_order: VecDeque<TaskId>,
    pub active: Vec<TaskId>,
    /// Task being polled
    pub current: Option<TaskId>,
    pub input: Option<Resume>,
    pub signal: Option<Signal>,
    pub clock: Rc<dyn Clock>,
    pub events: Option<Rc<dyn FrameEvents>>,
    pub config: SchedulerConfig,
    /// Unknown handles seen by join/cancel this tick
    pub misuse: Vec<TaskId>,
    /// Futures of removed tasks, dropped once no borrow is held
    pub graveyard: Vec<BoxFuture>,
    pub finished_this_tick: usize,
}

impl SchedulerState {
    fn insert_task(&mut self, thread: Thread, parent: Option<TaskId>) -> TaskId {
        let (name, future, threadable) = thread.into_parts();

        if parent.is_some() && !threadable && self.config.warn_non_threadable {
            tracing::warn!(
                task = %name,
                "spawned a future that is not threadable; wrap it with `threadable()`"
            );
        }

        tracing::debug!(task = %name, parent = ?parent, "task spawned");

        let id = self.tasks.insert(TaskNode {
            name,
            future: Some(future),
            parent,
            children: SmallVec::new(),
            state: TaskState::Active,
            paused: false,
            input: None,
        });

        if let Some(parent) = parent.and_then(|p| self.tasks.get_mut(p)) {
            parent.children.push(id);
        }
        id
    }

    fn is_paused(&self, id: TaskId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor.and_then(|c| self.tasks.get(c)) {
            if node.paused {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    /// Handles older than the outcome history count as unknown
    fn is_known(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id) || self.outcomes.contains_key(&id)
    }

    fn note_misuse(&mut self, tasks: &[TaskId]) {
        for &task in tasks {
            if !self.is_known(task) {
                tracing::debug!(task = ?task, "join/cancel on a task unknown to this scheduler");
                self.misuse.push(task);
            }
        }
    }

    /// Remove `root` and its descendants
    ///
    /// `spare` stays registered in the `Cancelling` state so it can observe
    /// its cancellation during one more resumption.
    fn remove_subtree(&mut self, root: TaskId, outcome: TaskState, spare: Option<TaskId>) {
        if !self.tasks.contains_key(root) {
            return;
        }

        if Some(root) != spare {
            if let Some(parent) = self.tasks[root].parent {
                if let Some(parent) = self.tasks.get_mut(parent) {
                    parent.children.retain(|child| *child != root);
                }
            }
        }

        let mut stack: SmallVec<[TaskId; 8]> = SmallVec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            let Some(node) = self.tasks.get_mut(id) else {
                continue;
            };
            stack.extend(node.children.iter().copied());

            if Some(id) == spare {
                node.state = TaskState::Cancelling;
                node.children.clear();
                tracing::debug!(task = %node.name, "task cancelled, unwinding");
                continue;
            }

            let final_state = if id == root { outcome } else { TaskState::Cancelled };
            if let Some(node) = self.tasks.remove(id) {
                tracing::debug!(task = %node.name, state = ?final_state, "task finished");
                if let Some(future) = node.future {
                    self.graveyard.push(future);
                }
            }
            self.record_outcome(id, final_state);
            self.finished_this_tick += 1;
        }
    }

    fn record_outcome(&mut self, id: TaskId, outcome: TaskState) {
        if self.outcomes.insert(id, outcome).is_none() {
            self.outcome_order.push_back(id);
        }
        while self.outcome_order.len() > self.config.outcome_history {
            if let Some(oldest) = self.outcome_order.pop_front() {
                self.outcomes.remove(&oldest);
            }
        }
    }

    fn apply_cancel(&mut self, requester: TaskId, request: &CancelRequest) {
        for &task in &request.tasks {
            self.remove_subtree(task, TaskState::Cancelled, Some(requester));
        }
    }

    fn join_satisfied(&self, request: &JoinRequest) -> bool {
        request.is_satisfied(|task| self.tasks.contains_key(task))
    }
}

/// Summary of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Frame the tick ran on
    pub frame: u64,
    /// Number of resumptions, including same-tick re-resumptions
    pub resumed: usize,
    /// Tasks that completed or were cancelled
    pub finished: usize,
    /// Tasks parked for the next tick
    pub active: usize,
}

/// Drives a tree of cooperative tasks one frame at a time
pub struct Scheduler {
    state: SharedState,
}

impl Scheduler {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SchedulerState {
                tasks: SlotMap::with_key(),
                outcomes: FxHashMap::default(),
                outcome_order: VecDeque::new(),
                active: Vec::new(),
                current: None,
                input: None,
                signal: None,
                clock,
                events: None,
                config: SchedulerConfig::default(),
                misuse: Vec::new(),
                graveyard: Vec::new(),
                finished_this_tick: 0,
            })),
        }
    }

    pub fn with_config(clock: Rc<dyn Clock>, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        let scheduler = Self::new(clock);
        scheduler.state.borrow_mut().config = config;
        Ok(scheduler)
    }

    /// Attach a named-event lookup used by `wait_until`
    pub fn with_events(self, events: Rc<dyn FrameEvents>) -> Self {
        self.state.borrow_mut().events = Some(events);
        self
    }

    pub fn config(&self) -> SchedulerConfig {
        self.state.borrow().config.clone()
    }

    /// Register a root task. It is first resumed on the next tick.
    pub fn spawn(&mut self, thread: impl Into<Thread>) -> TaskId {
        let mut state = self.state.borrow_mut();
        let id = state.insert_task(thread.into(), None);
        state.active.push(id);
        id
    }

    /// Cancel a task and its descendants from outside the tick loop
    pub fn cancel(&mut self, task: TaskId) {
        self.state
            .borrow_mut()
            .remove_subtree(task, TaskState::Cancelled, None);
        self.bury();
    }

    /// Pause or resume a task together with its descendants
    pub fn pause(&mut self, task: TaskId, paused: bool) {
        if let Some(node) = self.state.borrow_mut().tasks.get_mut(task) {
            node.paused = paused;
        }
    }

    /// State of a live task, or the final state of one of the last
    /// `outcome_history` tasks to finish
    pub fn state(&self, task: TaskId) -> Option<TaskState> {
        let state = self.state.borrow();
        state
            .tasks
            .get(task)
            .map(|node| node.state)
            .or_else(|| state.outcomes.get(&task).copied())
    }

    pub fn is_alive(&self, task: TaskId) -> bool {
        self.state.borrow().tasks.contains_key(task)
    }

    pub fn parent(&self, task: TaskId) -> Option<TaskId> {
        self.state.borrow().tasks.get(task).and_then(|node| node.parent)
    }

    pub fn children(&self, task: TaskId) -> Vec<TaskId> {
        self.state
            .borrow()
            .tasks
            .get(task)
            .map(|node| node.children.to_vec())
            .unwrap_or_default()
    }

    pub fn task_name(&self, task: TaskId) -> Option<String> {
        self.state
            .borrow()
            .tasks
            .get(task)
            .map(|node| node.name.to_string())
    }

    /// Number of registered tasks
    pub fn task_count(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Number of tasks parked for the next tick
    pub fn active_count(&self) -> usize {
        self.state.borrow().active.len()
    }

    /// True once every task has finished
    pub fn is_idle(&self) -> bool {
        self.state.borrow().tasks.is_empty()
    }

    /// Resume every live task once
    ///
    /// A panic inside a task propagates out of this call and leaves the
    /// scheduler unusable.
    pub fn tick(&mut self) -> Result<TickReport> {
        let (frame, budget, mut queue) = {
            let mut state = self.state.borrow_mut();
            state.finished_this_tick = 0;
            let queue: VecDeque<TaskId> = std::mem::take(&mut state.active).into();
            (
                state.clock.current_frame(),
                state.config.max_resumptions_per_tick,
                queue,
            )
        };

        let mut next: Vec<TaskId> = Vec::with_capacity(queue.len());
        let mut report = TickReport {
            frame,
            ..TickReport::default()
        };

        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let _guard = context::enter(Rc::clone(&self.state));

        while let Some(id) = queue.pop_front() {
            let (mut future, unwinding) = {
                let mut state = self.state.borrow_mut();
                if !state.tasks.contains_key(id) {
                    continue;
                }
                if state.is_paused(id) {
                    next.push(id);
                    continue;
                }
                if report.resumed >= budget {
                    next.push(id);
                    next.extend(queue.drain(..));
                    state.active = next;
                    state.misuse.clear();
                    drop(state);
                    self.bury();
                    return Err(ThreadError::ResumeBudgetExceeded(budget));
                }

                let node = &mut state.tasks[id];
                let Some(future) = node.future.take() else {
                    continue;
                };
                let unwinding = node.state == TaskState::Cancelling;
                let input = node.input.take();

                state.current = Some(id);
                state.input = input;
                state.signal = None;
                (future, unwinding)
            };

            report.resumed += 1;
            let poll = future.as_mut().poll(&mut cx);

            let signal = {
                let mut state = self.state.borrow_mut();
                state.current = None;
                state.input = None;
                state.signal.take()
            };

            match poll {
                Poll::Ready(()) => {
                    drop(future);
                    let outcome = if unwinding {
                        TaskState::Cancelled
                    } else {
                        TaskState::Completed
                    };
                    tracing::trace!(task = ?id, frame, "task returned");
                    self.state.borrow_mut().remove_subtree(id, outcome, None);
                }
                Poll::Pending if unwinding => {
                    let mut state = self.state.borrow_mut();
                    match signal {
                        Some(Signal::Cancel(request)) => {
                            state.note_misuse(&request.tasks);
                            state.apply_cancel(id, &request);
                        }
                        Some(Signal::Spawn(thread)) => {
                            tracing::debug!(
                                child = thread.name(),
                                "spawn from a cancelled task discarded"
                            );
                            let (_, child, _) = thread.into_parts();
                            state.graveyard.push(child);
                        }
                        _ => {}
                    }
                    state.graveyard.push(future);
                    state.remove_subtree(id, TaskState::Cancelled, None);
                }
                Poll::Pending => {
                    let mut state = self.state.borrow_mut();
                    match state.tasks.get_mut(id) {
                        Some(node) => node.future = Some(future),
                        None => {
                            state.graveyard.push(future);
                            continue;
                        }
                    }

                    match signal {
                        None | Some(Signal::Suspend) => {
                            tracing::trace!(task = ?id, frame, "task suspended");
                            next.push(id);
                        }
                        Some(Signal::Spawn(thread)) => {
                            let child = state.insert_task(thread, Some(id));
                            state.tasks[id].input = Some(Resume::Spawned(child));
                            queue.push_front(id);
                            queue.push_front(child);
                        }
                        Some(Signal::Join(request)) => {
                            state.note_misuse(&request.tasks);
                            if state.join_satisfied(&request) {
                                queue.push_front(id);
                            } else {
                                let joiner = state.insert_task(joiner(request), Some(id));
                                state.tasks[id].input = Some(Resume::Spawned(joiner));
                                queue.push_front(id);
                                queue.push_front(joiner);
                            }
                        }
                        Some(Signal::Cancel(request)) => {
                            state.note_misuse(&request.tasks);
                            state.apply_cancel(id, &request);
                            queue.push_front(id);
                        }
                    }
                }
            }

            self.bury();
        }
        self.bury();

        let misuse = {
            let mut state = self.state.borrow_mut();
            report.active = next.len();
            report.finished = state.finished_this_tick;
            state.active = next;
            std::mem::take(&mut state.misuse)
        };

        tracing::debug!(
            frame,
            resumed = report.resumed,
            finished = report.finished,
            active = report.active,
            "tick"
        );

        if self.state.borrow().config.strict {
            if let Some(&task) = misuse.first() {
                return Err(ThreadError::UnregisteredTask(task));
            }
        }
        Ok(report)
    }

    /// Tick until every task has finished, calling `advance` between ticks
    ///
    /// Returns the number of times `advance` was called.
    pub fn run_until_idle(&mut self, mut advance: impl FnMut()) -> Result<u64> {
        let max_frames = self.state.borrow().config.max_frames;
        let mut frames = 0;
        loop {
            self.tick()?;
            if self.is_idle() {
                return Ok(frames);
            }
            if let Some(max) = max_frames {
                if frames >= max {
                    return Err(ThreadError::FrameLimitExceeded(max));
                }
            }
            advance();
            frames += 1;
        }
    }

    /// Drop futures of removed tasks outside of any borrow
    fn bury(&self) {
        let graveyard = std::mem::take(&mut self.state.borrow_mut().graveyard);
        drop(graveyard);
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        let futures: Vec<BoxFuture> = {
            let mut state = self.state.borrow_mut();
            let mut futures: Vec<BoxFuture> = std::mem::take(&mut state.graveyard);
            futures.extend(state.tasks.drain().filter_map(|(_, node)| node.future));
            futures
        };
        drop(futures);
    }
}

/// Run `root` on a fresh scheduler until it finishes, advancing `clock`
/// one frame between ticks
///
/// Returns the number of frames advanced.
pub fn schedule(clock: Rc<PlaybackClock>, root: impl Into<Thread>) -> Result<u64> {
    schedule_with(clock, SchedulerConfig::default(), root)
}

/// [`schedule`] with an explicit configuration
pub fn schedule_with(
    clock: Rc<PlaybackClock>,
    config: SchedulerConfig,
    root: impl Into<Thread>,
) -> Result<u64> {
    let mut scheduler = Scheduler::with_config(clock.clone(), config)?;
    scheduler.spawn(root);
    scheduler.run_until_idle(|| {
        clock.advance();
    })
}
