//!
//! rsh-sched - Cooperative scheduler with time-quantum yielding
//!
//! Drives a fixed number of CPU-bound coroutines to completion on a single
//! logical timeline. Each coroutine cooperatively yields back to the
//! scheduler whenever it has run for longer than its share of a target
//! latency (`quantum = target_latency / task_count`), so that `K` tasks
//! round-trip through the scheduler in bounded time regardless of how CPU
//! bound any one of them is.
//!
//! ## Example
//!
//! ```
//! use rsh_sched::{Clock, Scheduler, quicksort};
//!
//! let clock = Clock::new();
//! let target_latency_us = 2_000;
//! let files = vec![vec![3, 1, 2], vec![6, 5, 4]];
//! let quantum_us = target_latency_us / files.len() as u64;
//!
//! let mut sched = Scheduler::new();
//! for mut data in files {
//!     sched.spawn(move |ctx| {
//!         let stats = quicksort(&mut data, ctx, quantum_us, &clock);
//!         (data, stats)
//!     });
//! }
//!
//! let mut outputs = Vec::new();
//! while let Some(id) = sched.wait_any() {
//!     outputs.push(sched.take_result(id).unwrap());
//! }
//! assert_eq!(outputs.len(), 2);
//! ```
//!

mod clock;
mod coro;
mod scheduler;
mod sort;

pub use clock::Clock;
pub use coro::{CoroCtx, CoroId};
pub use scheduler::{CoroStatus, Scheduler};
pub use sort::{quicksort, SortStats};
