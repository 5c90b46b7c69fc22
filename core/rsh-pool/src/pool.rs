//!
//! The bounded worker pool: a single mutex guarding the queue and worker
//! bookkeeping, mirroring `naml-std-threads::scheduler`'s `TaskQueue` +
//! `Condvar` + shutdown-flag pattern, generalized from fire-and-forget
//! closures to the full CREATED→…→JOINED/DETACHED task lifecycle.
//!

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::PoolError;
use crate::task::{Task, TaskInner, TaskStatus};

/// Hard ceiling on worker threads any single pool may create.
pub const TPOOL_MAX_THREADS: usize = 64;
/// Hard ceiling on tasks that may sit in a pool's queue at once.
pub const TPOOL_MAX_TASKS: usize = 4096;

struct PoolState<T> {
    queue: VecDeque<Arc<TaskInner<T>>>,
    thread_count: usize,
    in_progress: usize,
    shutting_down: bool,
    workers: Vec<JoinHandle<()>>,
}

/// A bounded pool of lazily-created OS worker threads draining a shared
/// task queue.
pub struct ThreadPool<T> {
    state: Arc<Mutex<PoolState<T>>>,
    available: Arc<Condvar>,
    max_threads: usize,
}

impl<T: Send + 'static> ThreadPool<T> {
    /// Create a pool whose worker count never exceeds `max_threads`.
    /// Workers are spawned lazily as tasks arrive, not up front.
    pub fn new(max_threads: usize) -> Result<Self, PoolError> {
        if max_threads == 0 || max_threads > TPOOL_MAX_THREADS {
            return Err(PoolError::InvalidArgument);
        }
        Ok(Self {
            state: Arc::new(Mutex::new(PoolState {
                queue: VecDeque::new(),
                thread_count: 0,
                in_progress: 0,
                shutting_down: false,
                workers: Vec::new(),
            })),
            available: Arc::new(Condvar::new()),
            max_threads,
        })
    }

    /// Current number of worker threads actually spawned so far.
    pub fn thread_count(&self) -> usize {
        self.state.lock().unwrap().thread_count
    }

    /// Enqueue `task`, transition it to `Waiting`, and spawn one more
    /// worker iff every existing worker is already busy and the pool has
    /// not yet reached `max_threads`.
    pub fn push(&self, task: &Task<T>) -> Result<(), PoolError> {
        let mut state = self.state.lock().unwrap();
        if state.queue.len() >= TPOOL_MAX_TASKS {
            return Err(PoolError::TooManyTasks);
        }

        {
            let mut guarded = task.inner.guarded.lock().unwrap();
            task.inner.set_status(&mut guarded, TaskStatus::Waiting);
        }
        state.queue.push_back(Arc::clone(&task.inner));

        if state.in_progress == state.thread_count && state.thread_count < self.max_threads {
            self.spawn_worker(&mut state);
        }
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    fn spawn_worker(&self, state: &mut PoolState<T>) {
        let shared_state = Arc::clone(&self.state);
        let available = Arc::clone(&self.available);
        let handle = thread::Builder::new()
            .name("rsh-pool-worker".into())
            .spawn(move || worker_loop(shared_state, available))
            .expect("OS thread creation failed; pool cannot make forward progress");
        state.thread_count += 1;
        state.workers.push(handle);
        tracing::debug!("spawned worker, pool now at {} threads", state.thread_count);
    }

    /// Shut the pool down: legal only once the queue is empty and no task
    /// is currently running. Broadcasts shutdown and joins every worker.
    /// Takes `&self`, not `self`, so a caller who gets `HasTasks` back
    /// still holds the pool and may retry once outstanding work drains.
    pub fn delete(&self) -> Result<(), PoolError> {
        let mut state = self.state.lock().unwrap();
        if !state.queue.is_empty() || state.in_progress > 0 {
            return Err(PoolError::HasTasks);
        }
        state.shutting_down = true;
        let workers = std::mem::take(&mut state.workers);
        drop(state);

        self.available.notify_all();
        for handle in workers {
            let _ = handle.join();
        }
        Ok(())
    }
}

fn worker_loop<T: Send + 'static>(state: Arc<Mutex<PoolState<T>>>, available: Arc<Condvar>) {
    loop {
        let task = {
            let mut guard = state.lock().unwrap();
            loop {
                if let Some(task) = guard.queue.pop_front() {
                    guard.in_progress += 1;
                    break Some(task);
                }
                if guard.shutting_down {
                    break None;
                }
                guard = available.wait(guard).unwrap();
            }
        };
        let Some(task) = task else { return };

        {
            let mut guarded = task.guarded.lock().unwrap();
            if guarded.status != TaskStatus::Detached {
                task.set_status(&mut guarded, TaskStatus::Running);
            }
        }

        let func = task.func.lock().unwrap().take().expect("worker loop runs a task's function at most once");
        let result = func();

        // `in_progress` must be decremented, under the pool mutex, before the
        // completion status is published and joiners are woken under the
        // task mutex — otherwise a joiner can return from `Task::join` and
        // race a caller's `ThreadPool::delete` into observing a stale
        // `in_progress > 0` for a task that has already delivered its result.
        let mut guard = state.lock().unwrap();
        guard.in_progress -= 1;
        drop(guard);

        {
            let mut guarded = task.guarded.lock().unwrap();
            guarded.result = Some(result);
            if guarded.status == TaskStatus::Detached {
                task.set_status(&mut guarded, TaskStatus::Joined);
                drop(guarded);
                // the worker's Arc to `task` is the last reference once
                // neither the submitter nor the queue holds one; it is
                // freed here when this stack frame drops it.
            } else {
                task.set_status(&mut guarded, TaskStatus::Completed);
                drop(guarded);
                task.completed.notify_all();
            }
        }
    }
}
