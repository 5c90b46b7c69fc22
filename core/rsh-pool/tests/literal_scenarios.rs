use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};

use rsh_pool::{PoolError, Task, ThreadPool};

#[test]
fn pool_of_two_drains_four_sleeping_tasks_within_budget() {
    let pool = ThreadPool::new(2).unwrap();
    let start = Instant::now();

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let task = Task::new(|| {
                sleep(Duration::from_millis(50));
                ()
            });
            pool.push(&task).unwrap();
            task
        })
        .collect();

    for task in tasks {
        task.join().unwrap();
    }

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(95), "elapsed {elapsed:?} too fast for 4 tasks on 2 workers");
    assert!(elapsed <= Duration::from_millis(400), "elapsed {elapsed:?} too slow; workers may not be parallel");
    assert_eq!(pool.thread_count(), 2);

    pool.delete().unwrap();
}

#[test]
fn detach_before_task_runs_still_completes_and_pool_can_be_deleted() {
    let pool: ThreadPool<()> = ThreadPool::new(1).unwrap();
    let ran = Arc::new(AtomicUsize::new(0));
    let ran_clone = Arc::clone(&ran);

    let task = Task::new(move || {
        sleep(Duration::from_millis(20));
        ran_clone.fetch_add(1, Ordering::SeqCst);
    });
    pool.push(&task).unwrap();
    task.detach().unwrap();

    // give the lone worker time to pick the task up and finish it
    sleep(Duration::from_millis(200));
    assert_eq!(ran.load(Ordering::SeqCst), 1);

    pool.delete().unwrap();
}

#[test]
fn join_returns_the_task_functions_value() {
    let pool = ThreadPool::new(1).unwrap();
    let task = Task::new(|| 6 * 7);
    pool.push(&task).unwrap();
    assert_eq!(task.join().unwrap(), 42);
    pool.delete().unwrap();
}

#[test]
fn delete_refuses_while_tasks_are_in_flight() {
    let pool = ThreadPool::new(1).unwrap();
    let task = Task::new(|| {
        sleep(Duration::from_millis(100));
        1
    });
    pool.push(&task).unwrap();

    // the task is now at least queued, likely running; either way in_progress or queue is non-empty
    match pool.delete() {
        Err(PoolError::HasTasks) => {}
        other => panic!("expected HasTasks while a task is outstanding, got {other:?}"),
    }
}

#[test]
fn lazy_spawning_never_exceeds_max_workers() {
    let pool = ThreadPool::new(2).unwrap();
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let task = Task::new(|| {
                sleep(Duration::from_millis(10));
            });
            pool.push(&task).unwrap();
            task
        })
        .collect();

    for task in tasks {
        task.join().unwrap();
    }
    assert!(pool.thread_count() <= 2);
    pool.delete().unwrap();
}

#[test]
fn pool_new_rejects_zero_workers() {
    let result: Result<ThreadPool<()>, _> = ThreadPool::new(0);
    assert_eq!(result.err(), Some(PoolError::InvalidArgument));
}

#[test]
fn join_on_unpushed_task_fails() {
    let task: Task<i32> = Task::new(|| 1);
    assert_eq!(task.join(), Err(PoolError::TaskNotPushed));
}
