//! The standard tomato farm: drives a [`WorkDay`] with a [`Timer`].
//!
//! ## Phase Transitions
//!
//! ```text
//! start_work -> Tomato --(tomato due | start_break)--> Break/LongBreak
//! Break --(break due)--> Paused --(start_new_tomato)--> Tomato
//! any --(pause_work)--> Paused      any --(end_work)--> Finished
//! ```
//!
//! All session state sits behind one mutex. Caller operations and timer
//! callbacks both enter through it, so an explicit `start_break` racing the
//! tomato-due callback opens at most one break. Each arm or stop of the timer
//! bumps a phase generation; a callback carrying an older generation is a
//! no-op.
//!
//! Caller operations update the ledger before the timer is touched, so a
//! rejected operation leaves the running phase and its callbacks as they were.
//! A break coming due is the exception: the timer is stopped and the finish
//! notification sent before the day is paused.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::NaiveTime;
use tracing::{debug, error, info, warn};

use super::breaks::BreakKind;
use super::settings::TomatoFarmSettings;
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::events::{Messenger, Notification};
use crate::timer::{TimedAction, Timer};
use crate::workday::{TimeSlotKind, WorkDay, WorkSummary};

/// Work a timer callback performs inside the session lock.
type PhaseAction = Box<dyn FnOnce(&Arc<Shared>, &mut Session) -> Result<()> + Send>;

#[derive(Debug, Default)]
struct Session {
    day: Option<WorkDay>,
    phase: u64,
}

impl Session {
    /// The running day, refusing days that were already finished.
    fn open_day(&mut self) -> Result<&mut WorkDay> {
        match self.day.as_mut() {
            None => Err(CoreError::NoActiveDay),
            Some(day) if day.is_finished() => Err(CoreError::DayFinished),
            Some(day) => Ok(day),
        }
    }

    /// The head slot is a break, running or already closed.
    fn in_break(&self) -> bool {
        self.day
            .as_ref()
            .and_then(WorkDay::current_slot)
            .is_some_and(|slot| slot.kind().is_break())
    }
}

struct Shared {
    settings: TomatoFarmSettings,
    clock: Arc<dyn Clock>,
    timer: Arc<dyn Timer>,
    messenger: Arc<dyn Messenger>,
    session: Mutex<Session>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.timer.stop();
    }
}

/// Session driver for one person's work day.
///
/// Cheap to clone; clones share the same session. Pending timer callbacks
/// only hold a weak reference, so dropping the last clone tears the session
/// down and stops the timer.
#[derive(Clone)]
pub struct TomatoFarmApp {
    shared: Arc<Shared>,
}

impl TomatoFarmApp {
    pub fn new(
        settings: TomatoFarmSettings,
        clock: Arc<dyn Clock>,
        timer: Arc<dyn Timer>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                settings,
                clock,
                timer,
                messenger,
                session: Mutex::new(Session::default()),
            }),
        }
    }

    pub fn settings(&self) -> &TomatoFarmSettings {
        &self.shared.settings
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new day and its first tomato.
    pub fn start_work(&self) -> Result<()> {
        let mut session = self.shared.lock();
        if let Some(day) = session.day.as_ref().filter(|day| !day.is_finished()) {
            warn!(date = %day.summary().date(), "replacing a work day that was never finished");
        }

        let now = self.shared.clock.current_date();
        session.day = Some(WorkDay::make_new_day(now, self.shared.settings.regular_hours));
        info!(date = %now.date(), start = %now.time(), "work day started");

        Shared::start_tomato(&self.shared, &mut session, now.time())
    }

    /// Start a fresh tomato; also cuts a running break short.
    pub fn start_new_tomato(&self) -> Result<()> {
        let mut session = self.shared.lock();
        let now = self.shared.clock.current_time();
        Shared::start_tomato(&self.shared, &mut session, now)
    }

    /// End the running tomato early and go on break.
    ///
    /// A no-op when the head slot is already a break, whether it is still
    /// running (its callbacks keep going) or has finished and paused the day.
    pub fn start_break(&self) -> Result<()> {
        let mut session = self.shared.lock();
        session.open_day()?;
        Shared::start_break(&self.shared, &mut session)
    }

    /// Finish the day; records its end time.
    pub fn end_work(&self) -> Result<()> {
        let mut session = self.shared.lock();
        let now = self.shared.clock.current_time();
        session.open_day()?.finish_day(now)?;
        self.shared.disarm(&mut session);
        info!(end = %now, "work day finished");
        Ok(())
    }

    /// Pause the day without finishing it.
    pub fn pause_work(&self) -> Result<()> {
        let mut session = self.shared.lock();
        let now = self.shared.clock.current_time();
        session.open_day()?.pause_day(now)?;
        self.shared.disarm(&mut session);
        debug!(at = %now, "work day paused");
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Snapshot of the current day, `None` before `start_work`.
    pub fn summary(&self) -> Option<WorkSummary> {
        self.shared.lock().day.as_ref().map(|day| day.summary().clone())
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cancel pending callbacks and make any that already woke up stale.
    fn disarm(&self, session: &mut Session) {
        session.phase = session.phase.wrapping_add(1);
        self.timer.stop();
    }

    /// Replace pending callbacks with a warn/due pair bound to a new phase.
    fn arm(
        this: &Arc<Self>,
        session: &mut Session,
        warn_in: Duration,
        on_warn: PhaseAction,
        due_in: Duration,
        on_due: PhaseAction,
    ) {
        this.disarm(session);
        let phase = session.phase;
        this.timer.start(vec![
            TimedAction::new(warn_in, Self::callback(Arc::downgrade(this), phase, on_warn)),
            TimedAction::new(due_in, Self::callback(Arc::downgrade(this), phase, on_due)),
        ]);
    }

    /// Run `action` under the session lock if `phase` is still current.
    fn callback(
        this: Weak<Self>,
        phase: u64,
        action: PhaseAction,
    ) -> impl FnOnce() + Send + 'static {
        move || {
            let Some(this) = this.upgrade() else {
                return;
            };
            let mut session = this.lock();
            if session.phase != phase {
                debug!(phase, current = session.phase, "stale timer callback ignored");
                return;
            }
            if let Err(e) = action(&this, &mut session) {
                error!(error = %e, "timer callback failed");
            }
        }
    }

    fn start_tomato(this: &Arc<Self>, session: &mut Session, now: NaiveTime) -> Result<()> {
        session.open_day()?.start_time_slot(now, TimeSlotKind::Tomato)?;
        debug!(at = %now, "tomato started");

        Self::arm(
            this,
            session,
            this.settings.tomato_due_warning,
            Box::new(|this: &Arc<Shared>, _: &mut Session| -> Result<()> {
                this.messenger.notify(Notification::TomatoWarning);
                Ok(())
            }),
            this.settings.tomato_size,
            Box::new(|this: &Arc<Shared>, session: &mut Session| Self::start_break(this, session)),
        );
        Ok(())
    }

    fn start_break(this: &Arc<Self>, session: &mut Session) -> Result<()> {
        if session.in_break() {
            debug!("head slot is already a break, ignoring trigger");
            return Ok(());
        }

        let now = this.clock.current_time();
        let day = session.open_day()?;
        let kind = BreakKind::for_history(day.summary().slots());
        day.start_time_slot(now, kind.slot_kind())?;
        this.messenger.notify(Notification::TomatoFinished);
        debug!(at = %now, ?kind, "break started");

        Self::arm(
            this,
            session,
            kind.warn_time(&this.settings),
            Box::new(move |this: &Arc<Shared>, _: &mut Session| -> Result<()> {
                kind.warn(this.messenger.as_ref());
                Ok(())
            }),
            kind.due_time(&this.settings),
            Box::new(move |this: &Arc<Shared>, session: &mut Session| {
                Self::finish_break(this, session, kind)
            }),
        );
        Ok(())
    }

    fn finish_break(this: &Arc<Self>, session: &mut Session, kind: BreakKind) -> Result<()> {
        this.disarm(session);
        kind.finish(this.messenger.as_ref());

        let now = this.clock.current_time();
        session.open_day()?.pause_day(now)?;
        debug!(at = %now, ?kind, "break finished, day paused");
        Ok(())
    }
}
