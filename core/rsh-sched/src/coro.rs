//!
//! Thread-backed stackful coroutine primitive.
//!
//! A coroutine's body runs on its own OS thread, but a baton — one
//! `Mutex` + `Condvar` pair per coroutine — ensures exactly one coroutine's
//! thread is ever unparked at a time: [`Coro::resume`] hands the baton over
//! and blocks until the coroutine yields or finishes, so the scheduler never
//! observes more than one coroutine running concurrently. This gives the
//! stackful-coroutine contract (create, yield, read switch count, wait for
//! completion) without a hand-rolled context switch.
//!

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Baton {
    Idle,
    Run,
    Yielded,
    Finished,
}

struct Shared {
    baton: Mutex<Baton>,
    cv: Condvar,
    switch_count: AtomicU64,
}

impl Shared {
    fn wait_while(&self, pred: impl Fn(Baton) -> bool) -> Baton {
        let mut guard = self.baton.lock().unwrap();
        while pred(*guard) {
            guard = self.cv.wait(guard).unwrap();
        }
        *guard
    }

    fn set(&self, state: Baton) {
        *self.baton.lock().unwrap() = state;
        self.cv.notify_all();
    }
}

/// Handle a running coroutine uses to suspend itself and inspect its own
/// switch count. Passed by reference into the coroutine body instead of
/// being looked up through a thread-local, so there is never any ambiguity
/// about which coroutine a call belongs to.
pub struct CoroCtx {
    shared: Arc<Shared>,
}

impl CoroCtx {
    /// Suspend the current coroutine until the driver resumes it.
    pub fn yield_now(&self) {
        self.shared.switch_count.fetch_add(1, Ordering::SeqCst);
        self.shared.set(Baton::Yielded);
        self.shared.wait_while(|b| b == Baton::Yielded);
    }

    /// Number of times this coroutine has yielded so far.
    pub fn switch_count(&self) -> u64 {
        self.shared.switch_count.load(Ordering::SeqCst)
    }
}

/// Opaque identifier for a coroutine owned by a `Scheduler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoroId(pub(crate) usize);

pub(crate) enum CoroOutcome<T> {
    Running,
    Finished(T),
}

/// A single stackful coroutine: an OS thread plus the baton that keeps it
/// paused until explicitly resumed.
pub(crate) struct Coro<T> {
    shared: Arc<Shared>,
    join: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> Coro<T> {
    pub(crate) fn spawn<F>(body: F) -> Self
    where
        F: FnOnce(&CoroCtx) -> T + Send + 'static,
    {
        let shared = Arc::new(Shared {
            baton: Mutex::new(Baton::Idle),
            cv: Condvar::new(),
            switch_count: AtomicU64::new(0),
        });
        let worker_shared = Arc::clone(&shared);
        let join = thread::spawn(move || {
            worker_shared.wait_while(|b| b == Baton::Idle);
            let ctx = CoroCtx { shared: Arc::clone(&worker_shared) };
            let result = body(&ctx);
            worker_shared.set(Baton::Finished);
            result
        });
        Self { shared, join: Some(join) }
    }

    /// Hand the baton to this coroutine and block until it yields or
    /// finishes. Returns the coroutine's result exactly once, on the resume
    /// call during which it finished.
    pub(crate) fn resume(&mut self) -> CoroOutcome<T> {
        self.shared.set(Baton::Run);
        let state = self.shared.wait_while(|b| b == Baton::Run);
        match state {
            Baton::Yielded => CoroOutcome::Running,
            Baton::Finished => {
                let result = self
                    .join
                    .take()
                    .expect("coroutine resumed again after finishing")
                    .join()
                    .expect("coroutine thread panicked");
                CoroOutcome::Finished(result)
            }
            Baton::Idle => unreachable!("resume cannot observe a coroutine still idle"),
        }
    }

    pub(crate) fn switch_count(&self) -> u64 {
        self.shared.switch_count.load(Ordering::SeqCst)
    }
}
