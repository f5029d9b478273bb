//! Break variants and the break-type rule.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::settings::TomatoFarmSettings;
use crate::events::{Messenger, Notification};
use crate::workday::{TimeSlot, TimeSlotKind};

/// Tomatoes per round; a round ends with a long break.
pub const TOMATO_ROUND_SIZE: usize = 4;

/// Slots a full round occupies before its long break: 4 tomatoes, 3 short breaks.
const ROUND_WINDOW: usize = 2 * TOMATO_ROUND_SIZE - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

/// Per-kind notifications: (warning, finished).
const NOTIFICATIONS: [(Notification, Notification); 2] = [
    (Notification::BreakWarning, Notification::BreakFinished),
    (Notification::LongBreakWarning, Notification::LongBreakFinished),
];

impl BreakKind {
    /// Pick the break that follows the most recent tomato.
    ///
    /// Walks back from the newest slot until the previous long break. Once a
    /// full round window has been counted, the round is complete and the next
    /// break is long.
    pub fn for_history(slots: &[TimeSlot]) -> Self {
        let since_long_break = slots
            .iter()
            .rev()
            .take_while(|slot| slot.kind() != TimeSlotKind::LongBreak)
            .take(ROUND_WINDOW)
            .count();
        if since_long_break == ROUND_WINDOW {
            BreakKind::Long
        } else {
            BreakKind::Short
        }
    }

    pub fn slot_kind(self) -> TimeSlotKind {
        match self {
            BreakKind::Short => TimeSlotKind::Break,
            BreakKind::Long => TimeSlotKind::LongBreak,
        }
    }

    pub fn warn_time(self, settings: &TomatoFarmSettings) -> Duration {
        match self {
            BreakKind::Short => settings.break_due_warning,
            BreakKind::Long => settings.long_break_due_warning,
        }
    }

    pub fn due_time(self, settings: &TomatoFarmSettings) -> Duration {
        match self {
            BreakKind::Short => settings.break_size,
            BreakKind::Long => settings.long_break_size,
        }
    }

    pub fn warning(self) -> Notification {
        NOTIFICATIONS[self as usize].0
    }

    pub fn finished(self) -> Notification {
        NOTIFICATIONS[self as usize].1
    }

    pub fn warn(self, messenger: &dyn Messenger) {
        messenger.notify(self.warning());
    }

    pub fn finish(self, messenger: &dyn Messenger) {
        messenger.notify(self.finished());
    }
}
