//!
//! A bounded pool of OS worker threads draining a shared task queue, with
//! joinable and detachable tasks carried through a small state machine:
//! `Created → Waiting → Running → Completed → Joined`, with a `Detached`
//! side-branch the worker reclaims on its own.
//!
//! ```
//! use rsh_pool::{ThreadPool, Task};
//!
//! let pool = ThreadPool::new(2).unwrap();
//! let task = Task::new(|| 2 + 2);
//! pool.push(&task).unwrap();
//! assert_eq!(task.join().unwrap(), 4);
//! pool.delete().unwrap();
//! ```

mod error;
mod pool;
mod task;

pub use error::PoolError;
pub use pool::{ThreadPool, TPOOL_MAX_TASKS, TPOOL_MAX_THREADS};
pub use task::{Task, TaskStatus};
