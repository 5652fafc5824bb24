//! Reset-on-activity, fire-after-quiet save scheduler.

use crate::storage::StoreResult;
use log::{debug, info, warn};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Quiet period after the last mutation before a save is committed.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

const WORKER_THREAD_NAME: &str = "swiftjot-save";

/// Durable sink for scheduler snapshots.
pub trait SnapshotWriter<T>: Send + Sync {
    fn write_snapshot(&self, snapshot: &T) -> StoreResult<()>;
}

struct Pending<T> {
    snapshot: Option<T>,
    deadline: Option<Instant>,
    worker_alive: bool,
}

struct Shared<T> {
    state: Mutex<Pending<T>>,
    rearmed: Condvar,
    // Lock order: `write_lock` before `state`.
    write_lock: Mutex<()>,
    writer: Arc<dyn SnapshotWriter<T>>,
    delay: Duration,
}

/// Debounces snapshot writes through a single pending timer.
///
/// Each [`schedule_save`](Self::schedule_save) replaces the pending snapshot
/// and pushes the deadline out by the debounce delay. A worker thread lives
/// for one debounce cycle: it sleeps until the deadline stops moving, writes
/// the latest snapshot, and exits once nothing is pending.
pub struct PersistenceScheduler<T: Send + 'static> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + 'static> PersistenceScheduler<T> {
    /// Creates a scheduler with the standard 500 ms debounce window.
    pub fn new(writer: Arc<dyn SnapshotWriter<T>>) -> Self {
        Self::with_delay(writer, SAVE_DEBOUNCE)
    }

    /// Creates a scheduler with a custom debounce window.
    pub fn with_delay(writer: Arc<dyn SnapshotWriter<T>>, delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(Pending {
                    snapshot: None,
                    deadline: None,
                    worker_alive: false,
                }),
                rearmed: Condvar::new(),
                write_lock: Mutex::new(()),
                writer,
                delay,
            }),
        }
    }

    /// Arms (or re-arms) the timer with `snapshot` as the state to persist.
    ///
    /// `snapshot` must be an owned copy; later mutations of the live
    /// collection cannot reach it.
    pub fn schedule_save(&self, snapshot: T) {
        let mut state = lock(&self.shared.state);
        state.snapshot = Some(snapshot);
        state.deadline = Some(Instant::now() + self.shared.delay);

        if state.worker_alive {
            self.shared.rearmed.notify_all();
            return;
        }

        state.worker_alive = true;
        drop(state);

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(&shared));
        if let Err(err) = spawned {
            // The snapshot stays pending; the next schedule or flush retries.
            lock(&self.shared.state).worker_alive = false;
            warn!(
                "event=save_schedule module=persist status=error error_code=spawn_failed error={}",
                err
            );
            return;
        }
        debug!("event=save_schedule module=persist status=armed");
    }

    /// Returns whether a snapshot is waiting for its debounce window.
    pub fn is_pending(&self) -> bool {
        lock(&self.shared.state).deadline.is_some()
    }

    /// Writes the pending snapshot now on the calling thread.
    ///
    /// Returns whether a snapshot was written. Failures are swallowed like
    /// timer-driven writes.
    pub fn flush(&self) -> bool {
        let _write_guard = lock(&self.shared.write_lock);
        let snapshot = {
            let mut state = lock(&self.shared.state);
            state.deadline = None;
            state.snapshot.take()
        };
        self.shared.rearmed.notify_all();

        match snapshot {
            Some(snapshot) => {
                commit(&self.shared, &snapshot, "flush");
                true
            }
            None => false,
        }
    }
}

fn run_worker<T>(shared: &Shared<T>) {
    loop {
        {
            let mut state = lock(&shared.state);
            loop {
                let Some(deadline) = state.deadline else {
                    state.worker_alive = false;
                    return;
                };
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                state = shared
                    .rearmed
                    .wait_timeout(state, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
        }

        let _write_guard = lock(&shared.write_lock);
        let snapshot = {
            let mut state = lock(&shared.state);
            match state.deadline {
                // Still quiet after taking the write lock: fire.
                Some(deadline) if Instant::now() >= deadline => {
                    state.deadline = None;
                    state.snapshot.take()
                }
                // Re-armed or flushed while waiting for the write lock.
                _ => None,
            }
        };

        if let Some(snapshot) = snapshot {
            commit(shared, &snapshot, "timer");
        }
    }
}

fn commit<T>(shared: &Shared<T>, snapshot: &T, trigger: &str) {
    let started_at = Instant::now();
    match shared.writer.write_snapshot(snapshot) {
        Ok(()) => info!(
            "event=save_commit module=persist status=ok trigger={} duration_ms={}",
            trigger,
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=save_commit module=persist status=error trigger={} duration_ms={} error={}",
            trigger,
            started_at.elapsed().as_millis(),
            err
        ),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
