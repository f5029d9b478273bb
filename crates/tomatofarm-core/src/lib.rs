//! # TomatoFarm Core Library
//!
//! This library tracks one person's work day as an alternating sequence of
//! focused work intervals ("tomatoes") and breaks, advancing between them on
//! timed callbacks and producing a chronological summary on demand.
//!
//! ## Architecture
//!
//! - **Work Day Ledger**: ordered slot record enforcing the sequencing rules
//! - **Break Rules**: short/long break selection and their warn/finish lifecycle
//! - **Farm**: the session driver wiring timer callbacks to ledger transitions
//! - **Timer**: cancellable delayed callbacks on a tokio runtime
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TomatoFarmApp`]: Session driver
//! - [`WorkDay`]: Slot ledger for one day
//! - [`TomatoTimer`]: Production timer
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod farm;
pub mod storage;
pub mod timer;
pub mod workday;

pub use clock::{Clock, SystemClock};
pub use error::{ConfigError, CoreError, WorkDayError};
pub use events::{Messenger, Notification};
pub use farm::{BreakKind, TomatoFarmApp, TomatoFarmSettings};
pub use storage::Config;
pub use timer::{TimedAction, Timer, TomatoTimer};
pub use workday::{TimeSlot, TimeSlotKind, WorkDay, WorkSummary};
