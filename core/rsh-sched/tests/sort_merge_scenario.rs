//! Two input arrays, a 2000us target latency, both outputs sorted and
//! merged, neither task over budget.

use rsh_sched::{quicksort, Clock, Scheduler};

fn k_way_merge(sorted: &[Vec<i32>]) -> Vec<i32> {
    let mut cursors = vec![0usize; sorted.len()];
    let total: usize = sorted.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);

    loop {
        let mut best: Option<(usize, i32)> = None;
        for (i, arr) in sorted.iter().enumerate() {
            if cursors[i] >= arr.len() {
                continue;
            }
            let candidate = arr[cursors[i]];
            let better = match best {
                Some((_, v)) => candidate < v,
                None => true,
            };
            if better {
                best = Some((i, candidate));
            }
        }
        match best {
            Some((i, v)) => {
                out.push(v);
                cursors[i] += 1;
            }
            None => break,
        }
    }
    out
}

#[test]
fn two_files_sort_and_merge_within_budget() {
    let clock = Clock::new();
    let target_latency_us = 2_000u64;
    let inputs = vec![vec![3, 1, 2], vec![6, 5, 4]];
    let quantum_us = target_latency_us / inputs.len() as u64;

    let mut sched = Scheduler::new();
    let ids: Vec<_> = inputs
        .into_iter()
        .map(|mut data| {
            sched.spawn(move |ctx| {
                let stats = quicksort(&mut data, ctx, quantum_us, &clock);
                (data, stats)
            })
        })
        .collect();

    while sched.wait_any().is_some() {}

    let mut outputs: Vec<(Vec<i32>, rsh_sched::SortStats)> =
        ids.into_iter().map(|id| sched.take_result(id).unwrap()).collect();

    assert_eq!(outputs[0].0, vec![1, 2, 3]);
    assert_eq!(outputs[1].0, vec![4, 5, 6]);
    for (_, stats) in &outputs {
        assert!(stats.work_time_us <= target_latency_us);
    }

    let sorted_only: Vec<Vec<i32>> = outputs.drain(..).map(|(arr, _)| arr).collect();
    let merged = k_way_merge(&sorted_only);
    assert_eq!(merged, vec![1, 2, 3, 4, 5, 6]);
}
