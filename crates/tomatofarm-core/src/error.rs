//! Core error types for tomatofarm-core.
//!
//! Ledger violations are programmer or usage errors: they are raised to the
//! direct caller and never retried or translated on the way up.

use std::path::PathBuf;

use chrono::NaiveTime;
use thiserror::Error;

use crate::workday::TimeSlotKind;

/// Core error type for tomatofarm-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Work day ledger invariant violations
    #[error("Work day error: {0}")]
    WorkDay(#[from] WorkDayError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An operation that needs a started day was called before `start_work`
    #[error("No work day has been started")]
    NoActiveDay,

    /// An operation that needs an open day was called after `end_work`
    #[error("The work day has already been finished")]
    DayFinished,
}

/// Errors raised by the [`WorkDay`](crate::workday::WorkDay) ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkDayError {
    /// Timestamp precedes the day's start or the current slot's start
    #[error("Invalid start time {timestamp}: must not be earlier than {earliest}")]
    InvalidStartTime {
        timestamp: NaiveTime,
        earliest: NaiveTime,
    },

    /// Same kind (or break family) as the slot already in progress
    #[error("Cannot start a {requested} slot while a {in_progress} slot is in progress")]
    TimeSlotTypeAlreadyInProgress {
        requested: TimeSlotKind,
        in_progress: TimeSlotKind,
    },

    /// A paused day may only be resumed with a tomato
    #[error("A paused work day cannot be resumed with a break")]
    ResumeWorkDayWithBreak,

    /// The day's end time is already recorded
    #[error("The work day was already finished at {end_time}")]
    DayAlreadyFinished { end_time: NaiveTime },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
