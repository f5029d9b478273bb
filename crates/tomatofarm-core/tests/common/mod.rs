//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tomatofarm_core::timer::Callback;
use tomatofarm_core::{
    Clock, Messenger, Notification, TimedAction, Timer, TomatoFarmApp, TomatoFarmSettings,
};

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn at(h: u32, m: u32) -> Self {
        let now = NaiveDate::from_ymd_opt(2015, 1, 7)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap());
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `h:m` on the same date, backwards if need be.
    pub fn set_time(&self, h: u32, m: u32) {
        let mut now = self.now.lock().unwrap();
        *now = now.date().and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap());
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn current_date(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
struct Armed {
    warn: Option<(Duration, Callback)>,
    due: Option<(Duration, Callback)>,
    warn_time: Option<Duration>,
    due_time: Option<Duration>,
    was_stopped: bool,
}

/// Timer that records what was armed and fires callbacks on demand.
#[derive(Default)]
pub struct ManualTimer {
    armed: Mutex<Armed>,
}

impl ManualTimer {
    pub fn warn_time(&self) -> Option<Duration> {
        self.armed.lock().unwrap().warn_time
    }

    pub fn due_time(&self) -> Option<Duration> {
        self.armed.lock().unwrap().due_time
    }

    pub fn was_stopped(&self) -> bool {
        self.armed.lock().unwrap().was_stopped
    }

    pub fn reset_stopped(&self) {
        self.armed.lock().unwrap().was_stopped = false;
    }

    /// Take the armed due callback without firing it.
    pub fn take_due(&self) -> Callback {
        let (_, action) = self.armed.lock().unwrap().due.take().expect("no due callback armed");
        action
    }

    pub fn raise_warn_elapsed(&self) {
        let action = self.armed.lock().unwrap().warn.take();
        let (_, action) = action.expect("no warn callback armed");
        action();
    }

    pub fn raise_due_time_elapsed(&self) {
        let action = self.armed.lock().unwrap().due.take();
        let (_, action) = action.expect("no due callback armed");
        action();
    }
}

impl Timer for ManualTimer {
    fn start(&self, actions: Vec<TimedAction>) {
        assert_eq!(actions.len(), 2, "unexpected number of actions");
        let mut actions = actions.into_iter();
        let warn = actions.next().unwrap();
        let due = actions.next().unwrap();

        let mut armed = self.armed.lock().unwrap();
        armed.warn_time = Some(warn.due_in);
        armed.due_time = Some(due.due_in);
        armed.warn = Some((warn.due_in, warn.action));
        armed.due = Some((due.due_in, due.action));
    }

    fn stop(&self) {
        self.armed.lock().unwrap().was_stopped = true;
    }
}

/// Messenger that keeps every notification it receives.
#[derive(Default)]
pub struct RecordingMessenger {
    received: Mutex<Vec<Notification>>,
}

impl RecordingMessenger {
    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub fn was_fired(&self, notification: Notification) -> bool {
        self.received.lock().unwrap().contains(&notification)
    }

    pub fn clear(&self) {
        self.received.lock().unwrap().clear();
    }
}

impl Messenger for RecordingMessenger {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}

pub fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

pub fn time(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

/// Tomato 30m (warn at 29m), break 5m (warn at 4.5m), long break 15m (warn at 14m).
pub fn settings() -> TomatoFarmSettings {
    TomatoFarmSettings {
        regular_hours: Duration::from_secs(2 * 3600),
        tomato_size: minutes(30),
        tomato_due_warning: minutes(29),
        break_size: minutes(5),
        break_due_warning: Duration::from_secs(4 * 60 + 30),
        long_break_size: minutes(15),
        long_break_due_warning: minutes(14),
    }
}

pub struct Farm {
    pub app: TomatoFarmApp,
    pub clock: Arc<ManualClock>,
    pub timer: Arc<ManualTimer>,
    pub messenger: Arc<RecordingMessenger>,
}

impl Farm {
    /// A farm whose clock starts at 2015-01-07 08:00:00.
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::at(8, 0));
        let timer = Arc::new(ManualTimer::default());
        let messenger = Arc::new(RecordingMessenger::default());
        let app = TomatoFarmApp::new(settings(), clock.clone(), timer.clone(), messenger.clone());
        Self {
            app,
            clock,
            timer,
            messenger,
        }
    }

    /// Let the armed due callback fire after its full delay.
    pub fn let_due_elapse(&self) {
        let due = self.timer.due_time().expect("nothing armed");
        self.clock.advance(due);
        self.timer.raise_due_time_elapsed();
    }

    /// Start work and run `count` tomato/break pairs to completion.
    pub fn build_tomato_and_break_pairs(&self, count: usize) {
        self.app.start_work().unwrap();
        self.let_due_elapse();
        self.let_due_elapse();
        for _ in 1..count {
            self.app.start_new_tomato().unwrap();
            self.let_due_elapse();
            self.let_due_elapse();
        }
    }
}
