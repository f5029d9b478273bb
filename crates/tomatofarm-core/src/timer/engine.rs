//! Tokio-backed timer implementation.
//!
//! Every armed action becomes a task on the runtime that sleeps for its delay
//! and then invokes the callback. Cancellation is two-fold: the task handles
//! are aborted, and each task re-checks its generation right before firing so
//! a task that already woke up cannot run a stale callback.
//!
//! ## Usage
//!
//! ```ignore
//! let timer = TomatoTimer::new(tokio::runtime::Handle::current());
//! timer.start(vec![
//!     TimedAction::new(warn_after, || notify_warning()),
//!     TimedAction::new(due_after, || finish_phase()),
//! ]);
//! // Later, to cut the phase short:
//! timer.stop();
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{TimedAction, Timer};

/// Elapsed-time tracking for the current generation.
#[derive(Debug, Default)]
struct Stopwatch {
    started_at: Option<Instant>,
    /// Set once the longest action fired or the timer was stopped.
    frozen: Option<Duration>,
}

impl Stopwatch {
    fn restart(&mut self) {
        self.started_at = Some(Instant::now());
        self.frozen = None;
    }

    fn freeze(&mut self) {
        if self.frozen.is_none() {
            self.frozen = Some(self.elapsed());
        }
    }

    fn elapsed(&self) -> Duration {
        match (self.frozen, self.started_at) {
            (Some(frozen), _) => frozen,
            (None, Some(started_at)) => started_at.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct Armed {
    generation: u64,
    tasks: Vec<JoinHandle<()>>,
    stopwatch: Stopwatch,
}

impl Armed {
    /// Invalidate the current generation and abort its tasks.
    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.stopwatch.freeze();
    }
}

/// Production [`Timer`] spawning its callbacks on a tokio runtime.
#[derive(Debug)]
pub struct TomatoTimer {
    runtime: Handle,
    armed: Arc<Mutex<Armed>>,
}

impl TomatoTimer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            armed: Arc::new(Mutex::new(Armed::default())),
        }
    }

    /// Time since the last `start`, frozen once the longest action fired or
    /// the timer was stopped. Diagnostics only.
    pub fn elapsed(&self) -> Duration {
        lock(&self.armed).stopwatch.elapsed()
    }

    /// Number of armed actions of the current generation that have not fired.
    pub fn pending(&self) -> usize {
        lock(&self.armed)
            .tasks
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }
}

impl Timer for TomatoTimer {
    fn start(&self, actions: Vec<TimedAction>) {
        let mut armed = lock(&self.armed);
        armed.cancel();
        armed.stopwatch.restart();

        let generation = armed.generation;
        let longest = actions.iter().map(|a| a.due_in).max().unwrap_or_default();
        tracing::debug!(generation, actions = actions.len(), ?longest, "timer armed");

        for TimedAction { due_in, action } in actions {
            let shared = Arc::clone(&self.armed);
            let task = self.runtime.spawn(async move {
                tokio::time::sleep(due_in).await;
                {
                    let mut armed = lock(&shared);
                    if armed.generation != generation {
                        return;
                    }
                    if due_in == longest {
                        armed.stopwatch.freeze();
                    }
                }
                action();
            });
            armed.tasks.push(task);
        }
    }

    fn stop(&self) {
        let mut armed = lock(&self.armed);
        if !armed.tasks.is_empty() {
            tracing::debug!(generation = armed.generation, "timer stopped");
        }
        armed.cancel();
    }
}

impl Drop for TomatoTimer {
    fn drop(&mut self) {
        lock(&self.armed).cancel();
    }
}

fn lock(armed: &Mutex<Armed>) -> MutexGuard<'_, Armed> {
    armed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_action(due_in: Duration, counter: &Arc<AtomicUsize>) -> TimedAction {
        let counter = Arc::clone(counter);
        TimedAction::new(due_in, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn one_action_fires_when_its_time_elapses() {
        let timer = TomatoTimer::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        timer.start(vec![counting_action(Duration::from_secs(2), &fired)]);
        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1300)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn each_action_fires_at_its_own_time() {
        let timer = TomatoTimer::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        timer.start(vec![
            counting_action(Duration::from_secs(2), &fired),
            counting_action(Duration::from_secs(4), &fired),
        ]);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert_eq!(timer.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_timer_fires_nothing() {
        let timer = TomatoTimer::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        timer.start(vec![
            counting_action(Duration::from_secs(2), &fired),
            counting_action(Duration::from_secs(4), &fired),
        ]);
        tokio::time::sleep(Duration::from_secs(1)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_keeps_already_fired_callbacks() {
        let timer = TomatoTimer::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        timer.start(vec![
            counting_action(Duration::from_secs(2), &fired),
            counting_action(Duration::from_secs(4), &fired),
        ]);
        tokio::time::sleep(Duration::from_secs(3)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_timer_cancels_all_tasks() {
        let timer = TomatoTimer::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        timer.start(vec![
            counting_action(Duration::from_secs(2), &fired),
            counting_action(Duration::from_secs(4), &fired),
        ]);
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(timer);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_replaces_the_previous_generation() {
        let timer = TomatoTimer::new(Handle::current());
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        timer.start(vec![counting_action(Duration::from_secs(2), &first)]);
        tokio::time::sleep(Duration::from_secs(1)).await;
        timer.start(vec![counting_action(Duration::from_secs(2), &second)]);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_freezes_after_longest_action() {
        let timer = TomatoTimer::new(Handle::current());
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.start(vec![
            TimedAction::new(Duration::from_secs(1), || {}),
            TimedAction::new(Duration::from_secs(3), || {}),
        ]);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(timer.elapsed(), Duration::from_secs(2));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_freezes_on_stop() {
        let timer = TomatoTimer::new(Handle::current());
        timer.start(vec![TimedAction::new(Duration::from_secs(10), || {})]);
        tokio::time::sleep(Duration::from_secs(4)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(4)).await;

        assert_eq!(timer.elapsed(), Duration::from_secs(4));
    }
}
