use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlotKind {
    Tomato,
    Break,
    LongBreak,
}

impl TimeSlotKind {
    /// Break and LongBreak belong to the same family.
    pub fn is_break(self) -> bool {
        matches!(self, TimeSlotKind::Break | TimeSlotKind::LongBreak)
    }

    /// True when `self` and `other` may not follow each other directly.
    pub fn conflicts_with(self, other: TimeSlotKind) -> bool {
        self == other || (self.is_break() && other.is_break())
    }
}

impl fmt::Display for TimeSlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeSlotKind::Tomato => "tomato",
            TimeSlotKind::Break => "break",
            TimeSlotKind::LongBreak => "long break",
        };
        f.write_str(name)
    }
}

/// One contiguous interval of a single kind.
///
/// Slots are created and closed by the ledger only; consumers get read access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    start_time: NaiveTime,
    end_time: Option<NaiveTime>,
    kind: TimeSlotKind,
    in_progress: bool,
}

impl TimeSlot {
    pub(crate) fn open(start_time: NaiveTime, kind: TimeSlotKind) -> Self {
        Self {
            start_time,
            end_time: None,
            kind,
            in_progress: true,
        }
    }

    pub(crate) fn close(&mut self, end_time: NaiveTime) {
        if self.in_progress {
            self.end_time = Some(end_time);
            self.in_progress = false;
        }
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    pub fn kind(&self) -> TimeSlotKind {
        self.kind
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Length of a closed slot. `None` while in progress.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// Snapshot of one work day.
///
/// `slots` are kept in chronological order: the current (most recent) slot is
/// the last element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkSummary {
    pub(crate) date: NaiveDate,
    pub(crate) start_time: NaiveTime,
    pub(crate) regular_hours_end_time: NaiveTime,
    pub(crate) end_time: Option<NaiveTime>,
    pub(crate) slots: Vec<TimeSlot>,
}

impl WorkSummary {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    /// Informational only; wraps past midnight.
    pub fn regular_hours_end_time(&self) -> NaiveTime {
        self.regular_hours_end_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Slots oldest first.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slots_most_recent_first(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter().rev()
    }

    pub fn current_slot(&self) -> Option<&TimeSlot> {
        self.slots.last()
    }

    pub fn count(&self, kind: TimeSlotKind) -> usize {
        self.slots.iter().filter(|s| s.kind == kind).count()
    }

    /// Total time spent in closed tomato slots.
    pub fn worked(&self) -> chrono::Duration {
        self.slots
            .iter()
            .filter(|s| s.kind == TimeSlotKind::Tomato)
            .filter_map(TimeSlot::duration)
            .fold(chrono::Duration::zero(), |acc, d| acc + d)
    }
}
