//! Control signals exchanged between tasks and the scheduler
//!
//! A task suspends by posting exactly one [`Signal`] and returning
//! `Poll::Pending`. The scheduler reads the signal after the poll returns and
//! may hand a [`Resume`] value back on the next resumption.

use super::context;
use super::thread::{TaskId, Thread};
use smallvec::SmallVec;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

pub(crate) type TaskList = SmallVec<[TaskId; 4]>;

/// Wait for tasks to leave the scheduler
#[derive(Debug, Clone)]
pub(crate) struct JoinRequest {
    pub tasks: TaskList,
    /// Wait for every task when true, for the first one otherwise
    pub all: bool,
}

impl JoinRequest {
    /// An empty request is always satisfied
    pub(crate) fn is_satisfied(&self, is_alive: impl Fn(TaskId) -> bool) -> bool {
        if self.tasks.is_empty() {
            return true;
        }
        if self.all {
            self.tasks.iter().all(|&task| !is_alive(task))
        } else {
            self.tasks.iter().any(|&task| !is_alive(task))
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CancelRequest {
    pub tasks: TaskList,
}

/// What a task asks of the scheduler when it suspends
#[derive(Debug)]
pub(crate) enum Signal {
    /// Park until the next tick
    Suspend,
    /// Register a child task
    Spawn(Thread),
    Join(JoinRequest),
    Cancel(CancelRequest),
}

impl Signal {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Signal::Suspend => "suspend",
            Signal::Spawn(_) => "spawn",
            Signal::Join(_) => "join",
            Signal::Cancel(_) => "cancel",
        }
    }
}

/// Value handed back to a task on its next resumption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    /// The task registered by a `Spawn` or `Join`
    Spawned(TaskId),
}

/// Posts a signal on first poll and completes on the next one
pub(crate) struct Yield {
    signal: Option<Signal>,
}

impl Yield {
    pub(crate) fn new(signal: Signal) -> Self {
        Self {
            signal: Some(signal),
        }
    }
}

impl Future for Yield {
    type Output = Option<Resume>;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.signal.take() {
            Some(signal) => {
                context::post(signal);
                Poll::Pending
            }
            None => Poll::Ready(context::take_input()),
        }
    }
}
