//! Work day ledger.
//!
//! The ledger owns the ordered slot record of a single day and is the only
//! place the sequencing invariants are checked:
//!
//! 1. no slot starts before the day started;
//! 2. slot start times never go backwards;
//! 3. a slot cannot follow an in-progress slot of the same kind, and two
//!    breaks of any kind cannot follow each other;
//! 4. a paused day cannot be resumed with a break;
//! 5. at most one slot is in progress;
//! 6. the day's end time is written once, by `finish_day`.
//!
//! Every check runs before any mutation, so a rejected call leaves the ledger
//! untouched.
//!
//! ```text
//! NoSlot -> start_time_slot -> InProgress(kind)
//! InProgress -> start_time_slot(other kind) | pause_day | finish_day
//! Paused -> start_time_slot(Tomato) -> InProgress(Tomato)
//! ```

use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};

use super::slot::{TimeSlot, TimeSlotKind, WorkSummary};
use crate::error::WorkDayError;

#[derive(Debug, Clone)]
pub struct WorkDay {
    summary: WorkSummary,
    paused: bool,
}

impl WorkDay {
    /// Open a new day starting at the time of day of `date`.
    pub fn make_new_day(date: NaiveDateTime, regular_hours: Duration) -> Self {
        let start_time = date.time();
        let regular = chrono::Duration::from_std(regular_hours).unwrap_or_else(|_| chrono::Duration::zero());
        let (regular_hours_end_time, _) = start_time.overflowing_add_signed(regular);
        Self {
            summary: WorkSummary {
                date: date.date(),
                start_time,
                regular_hours_end_time,
                end_time: None,
                slots: Vec::new(),
            },
            paused: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn summary(&self) -> &WorkSummary {
        &self.summary
    }

    pub fn current_slot(&self) -> Option<&TimeSlot> {
        self.summary.slots.last()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.summary.is_finished()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Close the in-progress slot (if any) and open a new one of `kind`.
    pub fn start_time_slot(
        &mut self,
        timestamp: NaiveTime,
        kind: TimeSlotKind,
    ) -> Result<(), WorkDayError> {
        self.check_timestamp(timestamp)?;
        self.check_kind(kind)?;

        self.close_current_slot(timestamp);
        self.paused = false;
        self.summary.slots.push(TimeSlot::open(timestamp, kind));
        Ok(())
    }

    /// Close the in-progress slot and mark the day paused. Resumable.
    pub fn pause_day(&mut self, timestamp: NaiveTime) -> Result<(), WorkDayError> {
        self.check_timestamp(timestamp)?;
        self.close_current_slot(timestamp);
        self.paused = true;
        Ok(())
    }

    /// Pause the day and record its end time.
    pub fn finish_day(&mut self, timestamp: NaiveTime) -> Result<(), WorkDayError> {
        if let Some(end_time) = self.summary.end_time {
            return Err(WorkDayError::DayAlreadyFinished { end_time });
        }
        self.pause_day(timestamp)?;
        self.summary.end_time = Some(timestamp);
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn check_timestamp(&self, timestamp: NaiveTime) -> Result<(), WorkDayError> {
        let earliest = self
            .current_slot()
            .map(TimeSlot::start_time)
            .map_or(self.summary.start_time, |t| t.max(self.summary.start_time));
        if timestamp < earliest {
            return Err(WorkDayError::InvalidStartTime {
                timestamp,
                earliest,
            });
        }
        Ok(())
    }

    fn check_kind(&self, kind: TimeSlotKind) -> Result<(), WorkDayError> {
        if kind.is_break() && self.paused {
            return Err(WorkDayError::ResumeWorkDayWithBreak);
        }
        match self.current_slot() {
            Some(current) if current.is_in_progress() && current.kind().conflicts_with(kind) => {
                Err(WorkDayError::TimeSlotTypeAlreadyInProgress {
                    requested: kind,
                    in_progress: current.kind(),
                })
            }
            _ => Ok(()),
        }
    }

    fn close_current_slot(&mut self, timestamp: NaiveTime) {
        if let Some(current) = self.summary.slots.last_mut() {
            current.close(timestamp);
        }
    }
}
