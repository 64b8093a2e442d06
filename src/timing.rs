use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::executor::ThreadPool;
use futures_timer::Delay;

pub type ScheduledTask = Box<dyn FnOnce() + Send + 'static>;

/// Runs a task once after a delay.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: ScheduledTask);
}

/// Drives every pending timer as a task on one shared worker thread.
#[derive(Clone)]
pub struct ThreadScheduler {
    pool: ThreadPool,
}

impl ThreadScheduler {
    pub fn new() -> io::Result<Self> {
        let pool = ThreadPool::builder()
            .pool_size(1)
            .name_prefix("leadform-timer-")
            .create()?;
        Ok(Self { pool })
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) {
        self.pool.spawn_ok(async move {
            Delay::new(delay).await;
            task();
        });
    }
}

struct PendingTask {
    due: Duration,
    sequence: u64,
    task: ScheduledTask,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_sequence: u64,
    pending: Vec<PendingTask>,
}

/// Simulated clock. Tasks run only when [`ManualScheduler::advance`] moves
/// time past their due point, in due order.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.lock().now
    }

    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn advance(&self, by: Duration) {
        let target = self.lock().now + by;
        loop {
            let task = {
                let mut state = self.lock();
                let next = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by_key(|(_, pending)| (pending.due, pending.sequence))
                    .map(|(index, _)| index);
                let Some(index) = next else {
                    state.now = target;
                    return;
                };
                let pending = state.pending.swap_remove(index);
                state.now = pending.due;
                pending.task
            };
            task();
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) {
        let mut state = self.lock();
        let due = state.now + delay;
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.pending.push(PendingTask {
            due,
            sequence,
            task,
        });
    }
}

/// Runs the callback with the latest value once calls stop for `delay`.
pub struct Debouncer<T> {
    delay: Duration,
    scheduler: Arc<dyn Scheduler>,
    ticket: Arc<AtomicU64>,
    callback: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            delay: self.delay,
            scheduler: self.scheduler.clone(),
            ticket: self.ticket.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<T> Debouncer<T>
where
    T: Send + 'static,
{
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        delay: Duration,
        callback: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            delay,
            scheduler,
            ticket: Arc::new(AtomicU64::new(0)),
            callback: Arc::new(callback),
        }
    }

    pub fn call(&self, value: T) {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let current = self.ticket.clone();
        let callback = self.callback.clone();
        self.scheduler.schedule(
            self.delay,
            Box::new(move || {
                if current.load(Ordering::SeqCst) == ticket {
                    callback(value);
                }
            }),
        );
    }

    /// Drops any pending call.
    pub fn cancel(&self) {
        self.ticket.fetch_add(1, Ordering::SeqCst);
    }
}

/// Runs the callback on the leading edge and drops calls until `interval`
/// has passed.
pub struct Throttler<T> {
    interval: Duration,
    scheduler: Arc<dyn Scheduler>,
    cooling: Arc<AtomicBool>,
    callback: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> Clone for Throttler<T> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            scheduler: self.scheduler.clone(),
            cooling: self.cooling.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<T> Throttler<T>
where
    T: Send + 'static,
{
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        interval: Duration,
        callback: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            interval,
            scheduler,
            cooling: Arc::new(AtomicBool::new(false)),
            callback: Arc::new(callback),
        }
    }

    /// Returns whether the callback ran.
    pub fn call(&self, value: T) -> bool {
        if self.cooling.swap(true, Ordering::SeqCst) {
            return false;
        }
        (self.callback)(value);
        let cooling = self.cooling.clone();
        self.scheduler.schedule(
            self.interval,
            Box::new(move || cooling.store(false, Ordering::SeqCst)),
        );
        true
    }
}
