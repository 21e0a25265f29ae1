//! Cancelling tasks

use super::signal::{CancelRequest, Signal, Yield};
use super::thread::TaskId;

/// Cancel `tasks` and all of their descendants
///
/// Cancellation happens before the next task of the tick is resumed.
/// Cancelling a finished task does nothing. A task that cancels itself (or
/// an ancestor) continues once more so it can check
/// [`ThreadContext::is_cancelled`](super::ThreadContext::is_cancelled) and
/// unwind; it is removed when that resumption suspends or returns.
pub async fn cancel<I>(tasks: I)
where
    I: IntoIterator<Item = TaskId>,
{
    let tasks = tasks.into_iter().collect();
    Yield::new(Signal::Cancel(CancelRequest { tasks })).await;
}
