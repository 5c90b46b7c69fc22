//!
//! A joinable or detachable unit of work.
//!
//! Each task carries its own mutex and completion condition, separate from
//! the pool's mutex, per the two-lock-domain design: the pool mutex guards
//! the queue and worker bookkeeping, the task mutex guards only that one
//! task's status and result. A status byte is additionally kept atomic so
//! `is_running`/`is_finished` can be answered without taking the task lock;
//! those reads are advisory only.
//!

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::error::PoolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskStatus {
    Created = 0,
    Waiting = 1,
    Running = 2,
    Completed = 3,
    Joined = 4,
    Detached = 5,
}

impl TaskStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => TaskStatus::Created,
            1 => TaskStatus::Waiting,
            2 => TaskStatus::Running,
            3 => TaskStatus::Completed,
            4 => TaskStatus::Joined,
            5 => TaskStatus::Detached,
            _ => unreachable!("task status byte out of range"),
        }
    }
}

pub(crate) struct Guarded<T> {
    pub(crate) status: TaskStatus,
    pub(crate) result: Option<T>,
}

pub(crate) struct TaskInner<T> {
    pub(crate) func: Mutex<Option<Box<dyn FnOnce() -> T + Send>>>,
    pub(crate) guarded: Mutex<Guarded<T>>,
    pub(crate) completed: Condvar,
    fast_status: AtomicU8,
}

impl<T> TaskInner<T> {
    pub(crate) fn set_status(&self, guarded: &mut Guarded<T>, status: TaskStatus) {
        guarded.status = status;
        self.fast_status.store(status as u8, Ordering::Release);
    }
}

/// A unit of work submitted to a [`crate::ThreadPool`].
///
/// Construct with [`Task::new`], hand a reference to
/// [`crate::ThreadPool::push`], then consume it with [`Task::join`] or
/// [`Task::detach`] — both take `self` by value, so a task can only ever
/// be finished off one way, once.
pub struct Task<T> {
    pub(crate) inner: Arc<TaskInner<T>>,
}

impl<T> Task<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            inner: Arc::new(TaskInner {
                func: Mutex::new(Some(Box::new(f))),
                guarded: Mutex::new(Guarded { status: TaskStatus::Created, result: None }),
                completed: Condvar::new(),
                fast_status: AtomicU8::new(TaskStatus::Created as u8),
            }),
        }
    }

    fn fast_status(&self) -> TaskStatus {
        TaskStatus::from_u8(self.inner.fast_status.load(Ordering::Acquire))
    }

    /// Lock-free, advisory-only snapshot of whether the task has finished
    /// running the user function.
    pub fn is_finished(&self) -> bool {
        matches!(self.fast_status(), TaskStatus::Completed | TaskStatus::Joined | TaskStatus::Detached)
    }

    /// Lock-free, advisory-only snapshot of whether a worker currently has
    /// the task's function executing.
    pub fn is_running(&self) -> bool {
        self.fast_status() == TaskStatus::Running
    }

    /// Block until the task completes, returning its result and
    /// transitioning it to `Joined`. Fails with [`PoolError::TaskNotPushed`]
    /// if the task was never pushed to a pool.
    pub fn join(self) -> Result<T, PoolError> {
        let mut guarded = self.inner.guarded.lock().unwrap();
        if guarded.status == TaskStatus::Created {
            return Err(PoolError::TaskNotPushed);
        }
        while guarded.status != TaskStatus::Completed {
            guarded = self.inner.completed.wait(guarded).unwrap();
        }
        self.inner.set_status(&mut guarded, TaskStatus::Joined);
        Ok(guarded.result.take().expect("completed task always carries a result"))
    }

    /// Disavow the task's result. If it has already completed it is
    /// reclaimed immediately; otherwise the worker that eventually runs it
    /// reclaims it after the function returns.
    pub fn detach(self) -> Result<(), PoolError> {
        let mut guarded = self.inner.guarded.lock().unwrap();
        match guarded.status {
            TaskStatus::Created => Err(PoolError::TaskNotPushed),
            TaskStatus::Completed => {
                self.inner.set_status(&mut guarded, TaskStatus::Joined);
                Ok(())
            }
            TaskStatus::Waiting | TaskStatus::Running => {
                self.inner.set_status(&mut guarded, TaskStatus::Detached);
                Ok(())
            }
            TaskStatus::Joined | TaskStatus::Detached => Err(PoolError::TaskInPool),
        }
    }

    /// Discard a task that was never pushed, or that has already been
    /// joined. Legal only in those two states; a task still owned by a
    /// pool must be joined or detached instead.
    pub fn delete(self) -> Result<(), PoolError> {
        match self.fast_status() {
            TaskStatus::Created | TaskStatus::Joined => Ok(()),
            _ => Err(PoolError::TaskInPool),
        }
    }
}
