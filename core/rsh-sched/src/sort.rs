//!
//! CPU-bound sort worker instrumented with time-quantum yield checkpoints.
//!
//! Mirrors `quick_sort`/`coro_update` from the reference implementation: an
//! in-place Hoare-partition quicksort that, at every partition step, checks
//! the monotonic clock and yields back to the scheduler once the configured
//! quantum has elapsed since the coroutine was last resumed.
//!

use crate::clock::Clock;
use crate::coro::CoroCtx;

/// Final statistics for a completed sort task: CPU time actually spent
/// running (never counting suspended intervals) and the number of yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    pub work_time_us: u64,
    pub yields: u64,
}

struct YieldState<'a> {
    clock: &'a Clock,
    quantum_us: u64,
    work_time_us: u64,
    last_resumed_at_us: u64,
    yields: u64,
}

impl<'a> YieldState<'a> {
    fn new(clock: &'a Clock, quantum_us: u64) -> Self {
        Self {
            clock,
            quantum_us,
            work_time_us: 0,
            last_resumed_at_us: clock.now_micros(),
            yields: 0,
        }
    }

    /// Yield through `ctx` if at least `quantum_us` has elapsed since the
    /// last resume, accumulating the interval actually spent running.
    fn checkpoint(&mut self, ctx: &CoroCtx) {
        let now = self.clock.now_micros();
        if now.saturating_sub(self.last_resumed_at_us) >= self.quantum_us {
            self.work_time_us += now - self.last_resumed_at_us;
            ctx.yield_now();
            self.yields += 1;
            self.last_resumed_at_us = self.clock.now_micros();
        }
    }

    /// Record runtime accrued since the last checkpoint without yielding.
    /// Used once at completion for a task that never crossed a quantum
    /// boundary, so its runtime is still reflected in `work_time_us`.
    fn finish(&mut self) {
        let now = self.clock.now_micros();
        self.work_time_us += now.saturating_sub(self.last_resumed_at_us);
        self.last_resumed_at_us = now;
    }

    fn stats(&self) -> SortStats {
        SortStats { work_time_us: self.work_time_us, yields: self.yields }
    }
}

/// Sorts `arr` in place, yielding back to the scheduler whenever the
/// quantum has elapsed since the last resume. `quantum_us` should be
/// `target_latency_us / task_count` so that a worst-case round trip through
/// every coroutine is bounded by the target latency.
pub fn quicksort(arr: &mut [i32], ctx: &CoroCtx, quantum_us: u64, clock: &Clock) -> SortStats {
    let mut state = YieldState::new(clock, quantum_us);
    if !arr.is_empty() {
        quicksort_range(arr, 0, arr.len() as isize - 1, ctx, &mut state);
    }
    if ctx.switch_count() == 0 {
        state.finish();
    }
    state.stats()
}

fn quicksort_range(arr: &mut [i32], low: isize, high: isize, ctx: &CoroCtx, state: &mut YieldState) {
    if low >= high {
        return;
    }
    let mid = low + (high - low) / 2;
    let pivot = arr[mid as usize];
    let (mut i, mut j) = (low, high);

    while i <= j {
        while arr[i as usize] < pivot {
            i += 1;
        }
        while arr[j as usize] > pivot {
            j -= 1;
        }
        if i <= j {
            arr.swap(i as usize, j as usize);
            i += 1;
            j -= 1;
        }
        state.checkpoint(ctx);
    }

    quicksort_range(arr, low, j, ctx, state);
    quicksort_range(arr, i, high, ctx, state);
}
