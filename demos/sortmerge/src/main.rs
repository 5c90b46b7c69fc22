//!
//! Sorts each input file's whitespace-separated integers on its own
//! scheduler coroutine, bounded by a shared target latency, then k-way
//! merges the per-file sorted output into `result.txt`.
//!
//! Re-implements the driver flow of the original single-file sort/merge
//! exercise as a thin CLI glued onto `rsh_sched`.
//!

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use rsh_sched::{Clock, Scheduler, SortStats};

/// Sort files of whitespace-separated integers on cooperative coroutines
/// bounded by a target latency, then merge the results.
#[derive(Parser, Debug)]
#[command(name = "sortmerge", version, about)]
struct Args {
    /// Target wall-clock latency, in microseconds, shared across all files.
    target_latency_us: u64,

    /// Input files, each containing whitespace-separated i32 values.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn read_numbers(path: &Path) -> io::Result<Vec<i32>> {
    let contents = fs::read_to_string(path)?;
    let numbers = contents
        .split_whitespace()
        .map(|tok| {
            tok.parse::<i32>()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{path:?}: {tok:?}: {e}")))
        })
        .collect::<io::Result<Vec<_>>>()?;
    Ok(numbers)
}

fn write_numbers(path: &Path, numbers: &[i32]) -> io::Result<()> {
    let mut out = String::with_capacity(numbers.len() * 4);
    for n in numbers {
        out.push_str(&n.to_string());
        out.push(' ');
    }
    fs::write(path, out)
}

fn sorted_path_for(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".sorted");
    PathBuf::from(name)
}

/// Merge already-sorted slices into one non-decreasing sequence by
/// repeatedly taking the smallest head among all inputs.
fn k_way_merge(sorted: &[Vec<i32>]) -> Vec<i32> {
    let mut cursors = vec![0usize; sorted.len()];
    let total: usize = sorted.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);

    loop {
        let mut best: Option<(usize, i32)> = None;
        for (j, arr) in sorted.iter().enumerate() {
            if cursors[j] >= arr.len() {
                continue;
            }
            let candidate = arr[cursors[j]];
            let better = match best {
                Some((_, v)) => candidate < v,
                None => true,
            };
            if better {
                best = Some((j, candidate));
            }
        }
        match best {
            Some((j, v)) => {
                cursors[j] += 1;
                merged.push(v);
            }
            None => break,
        }
    }

    merged
}

fn run(args: Args) -> io::Result<()> {
    let start = Instant::now();
    let clock = Clock::new();
    let quantum_us = args.target_latency_us / args.files.len() as u64;

    let mut sched: Scheduler<(PathBuf, Vec<i32>, SortStats)> = Scheduler::new();
    for path in &args.files {
        let numbers = read_numbers(path)?;
        let path = path.clone();
        let clock = clock.clone();
        tracing::info!("queued {} ({} values)", path.display(), numbers.len());
        sched.spawn(move |ctx| {
            let mut data = numbers;
            let stats = rsh_sched::quicksort(&mut data, ctx, quantum_us, &clock);
            (path, data, stats)
        });
    }

    let mut sorted_arrays = Vec::new();
    while let Some(id) = sched.wait_any() {
        let (path, data, stats) = sched.take_result(id).expect("coroutine just finished");
        tracing::info!(
            "{}: switch_count={} work_time_us={}",
            path.display(),
            sched.switch_count(id),
            stats.work_time_us
        );
        write_numbers(&sorted_path_for(&path), &data)?;
        sorted_arrays.push(data);
    }

    let merged = k_way_merge(&sorted_arrays);
    write_numbers(Path::new("result.txt"), &merged)?;

    let elapsed = start.elapsed();
    writeln!(io::stdout(), "merged {} values from {} files in {:.3}s", merged.len(), args.files.len(), elapsed.as_secs_f64())?;

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sortmerge: {e}");
            ExitCode::FAILURE
        }
    }
}
