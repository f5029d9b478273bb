use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Durations driving one work day. Immutable once the farm is built.
///
/// Warning delays are measured from the start of their phase: a 30 minute
/// tomato with a 29 minute warning warns one minute before it is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomatoFarmSettings {
    pub regular_hours: Duration,
    pub tomato_size: Duration,
    pub tomato_due_warning: Duration,
    pub break_size: Duration,
    pub break_due_warning: Duration,
    pub long_break_size: Duration,
    pub long_break_due_warning: Duration,
}

impl Default for TomatoFarmSettings {
    fn default() -> Self {
        Self {
            regular_hours: Duration::from_secs(8 * 3600),
            tomato_size: Duration::from_secs(25 * 60),
            tomato_due_warning: Duration::from_secs(24 * 60),
            break_size: Duration::from_secs(5 * 60),
            break_due_warning: Duration::from_secs(4 * 60 + 30),
            long_break_size: Duration::from_secs(15 * 60),
            long_break_due_warning: Duration::from_secs(14 * 60),
        }
    }
}
