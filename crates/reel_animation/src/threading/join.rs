//! Waiting for other tasks

use super::context::ThreadContext;
use super::signal::{JoinRequest, Resume, Signal, TaskList, Yield};
use super::spawn::suspend;
use super::thread::{TaskId, Thread};

/// Wait until all (`all = true`) or any of `tasks` have finished
///
/// Tasks that already finished count as finished. An empty list completes
/// without suspending.
pub async fn join<I>(all: bool, tasks: I)
where
    I: IntoIterator<Item = TaskId>,
{
    let tasks: TaskList = tasks.into_iter().collect();
    let joiner = match Yield::new(Signal::Join(JoinRequest { tasks, all })).await {
        Some(Resume::Spawned(joiner)) => joiner,
        None => return,
    };

    let Some(ctx) = ThreadContext::try_current() else {
        return;
    };
    while ctx.is_alive(joiner) {
        suspend().await;
    }
}

/// Wait for every task in `tasks`
pub async fn join_all<I>(tasks: I)
where
    I: IntoIterator<Item = TaskId>,
{
    join(true, tasks).await
}

/// Wait for the first task in `tasks` to finish
pub async fn join_any<I>(tasks: I)
where
    I: IntoIterator<Item = TaskId>,
{
    join(false, tasks).await
}

/// Child task that finishes once the join condition holds
pub(crate) fn joiner(request: JoinRequest) -> Thread {
    Thread::new("join", async move {
        let Some(ctx) = ThreadContext::try_current() else {
            return;
        };
        while !request.is_satisfied(|task| ctx.is_alive(task)) {
            suspend().await;
        }
    })
}
