//!
//! Error taxonomy for the thread pool, split into argument and resource
//! families per the same classification the rest of this workspace uses.
//!

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker count must be in (0, TPOOL_MAX_THREADS]")]
    InvalidArgument,
    #[error("pool has queued or in-progress tasks")]
    HasTasks,
    #[error("task queue is at capacity")]
    TooManyTasks,
    #[error("task has not been pushed to a pool")]
    TaskNotPushed,
    #[error("task is still owned by the pool")]
    TaskInPool,
}
