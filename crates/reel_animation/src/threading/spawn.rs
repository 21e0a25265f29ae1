//! Suspending and spawning

use super::signal::{Resume, Signal, Yield};
use super::thread::{TaskId, Thread};

/// Park the current task until the next tick
pub async fn suspend() {
    Yield::new(Signal::Suspend).await;
}

/// Run `thread` as a child of the current task and return its handle
///
/// The child runs until its first suspension before the caller continues,
/// within the same tick. Outside of a scheduler the returned handle is null.
pub async fn spawn(thread: impl Into<Thread>) -> TaskId {
    match Yield::new(Signal::Spawn(thread.into())).await {
        Some(Resume::Spawned(task)) => task,
        None => TaskId::default(),
    }
}
