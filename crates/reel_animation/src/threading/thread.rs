//! Threads and task handles

use slotmap::new_key_type;
use std::borrow::Cow;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

new_key_type! {
    /// Stable handle to a task registered with a scheduler
    pub struct TaskId;
}

/// Boxed coroutine body
pub type BoxFuture = Pin<Box<dyn Future<Output = ()>>>;

/// Lifecycle state of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Registered and resumed once per tick
    Active,
    /// Cancelled during its own resumption, gets one more resumption to unwind
    Cancelling,
    /// Ran to completion
    Completed,
    /// Removed by a cancel request or a finished ancestor
    Cancelled,
}

impl TaskState {
    pub fn is_finished(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Cancelled)
    }
}

/// A named coroutine that can run inside a scheduler
///
/// Awaiting a thread runs it inline as part of the awaiting task. Handing it
/// to [`spawn`](crate::threading::spawn) runs it as a child task instead.
///
/// Any `Future<Output = ()>` converts into a thread, but only threads built
/// with [`Thread::new`] or [`threadable`] are considered threadable.
/// Spawning a raw future still works and logs a warning.
pub struct Thread {
    name: Cow<'static, str>,
    future: BoxFuture,
    threadable: bool,
}

impl Thread {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, future: F) -> Self
    where
        F: Future<Output = ()> + 'static,
    {
        Self {
            name: name.into(),
            future: Box::pin(future),
            threadable: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_threadable(&self) -> bool {
        self.threadable
    }

    /// Rename the thread, keeping its threadable flag
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub(crate) fn into_parts(self) -> (Cow<'static, str>, BoxFuture, bool) {
        (self.name, self.future, self.threadable)
    }
}

/// Mark a future as a threadable coroutine
pub fn threadable<F>(name: impl Into<Cow<'static, str>>, future: F) -> Thread
where
    F: Future<Output = ()> + 'static,
{
    Thread::new(name, future)
}

impl<F> From<F> for Thread
where
    F: Future<Output = ()> + 'static,
{
    fn from(future: F) -> Self {
        Self {
            name: Cow::Borrowed("anonymous"),
            future: Box::pin(future),
            threadable: false,
        }
    }
}

impl IntoFuture for Thread {
    type Output = ();
    type IntoFuture = BoxFuture;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("name", &self.name)
            .field("threadable", &self.threadable)
            .finish_non_exhaustive()
    }
}
