//! Delayed-callback timer.
//!
//! A [`Timer`] arms one independent delayed invocation per [`TimedAction`].
//! Each `start` call begins a new generation: callbacks of an older generation
//! never fire once `start` is called again, `stop` is called, or the timer is
//! dropped.

mod engine;

use std::fmt;
use std::time::Duration;

pub use engine::TomatoTimer;

/// Callback fired by a [`Timer`].
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// A (delay, callback) pair, relative to the `start` call.
pub struct TimedAction {
    pub due_in: Duration,
    pub action: Callback,
}

impl TimedAction {
    pub fn new(due_in: Duration, action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            due_in,
            action: Box::new(action),
        }
    }
}

impl fmt::Debug for TimedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedAction")
            .field("due_in", &self.due_in)
            .finish_non_exhaustive()
    }
}

pub trait Timer: Send + Sync {
    /// Arm `actions`, cancelling whatever the previous call armed.
    fn start(&self, actions: Vec<TimedAction>);

    /// Cancel all pending callbacks. Callbacks that already fired are unaffected.
    fn stop(&self);
}
