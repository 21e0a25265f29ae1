//! Scheduler error types

use crate::threading::TaskId;
use thiserror::Error;

/// Errors reported by the thread scheduler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThreadError {
    /// A join or cancel named a task this scheduler never ran (strict mode)
    #[error("Task {0:?} is not registered with this scheduler")]
    UnregisteredTask(TaskId),

    /// A single tick resumed tasks more often than the configured budget
    #[error("Resume budget of {0} exceeded in a single tick")]
    ResumeBudgetExceeded(usize),

    /// Running to completion exceeded the configured frame cap
    #[error("Frame limit of {0} exceeded")]
    FrameLimitExceeded(u64),

    /// Configuration values are out of range
    #[error("Invalid scheduler config: {0}")]
    InvalidConfig(String),
}

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, ThreadError>;
