//! TOML-based application configuration.
//!
//! Stores the durations that shape a work day:
//! - Regular working hours
//! - Tomato size and warning delay
//! - Short and long break sizes and warning delays
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/tomatofarm/config.toml`.
//! Durations are whole seconds (minutes for regular hours); warning delays
//! count from the start of their phase.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::farm::TomatoFarmSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkDayConfig {
    #[serde(default = "default_regular_hours_min")]
    pub regular_hours_min: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomatoConfig {
    #[serde(default = "default_tomato_size")]
    pub size_secs: u64,
    #[serde(default = "default_tomato_warn_after")]
    pub warn_after_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortBreakConfig {
    #[serde(default = "default_short_break_size")]
    pub size_secs: u64,
    #[serde(default = "default_short_break_warn_after")]
    pub warn_after_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongBreakConfig {
    #[serde(default = "default_long_break_size")]
    pub size_secs: u64,
    #[serde(default = "default_long_break_warn_after")]
    pub warn_after_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Ring the terminal bell with each notification.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tomatofarm/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub work_day: WorkDayConfig,
    #[serde(default)]
    pub tomato: TomatoConfig,
    #[serde(default)]
    pub short_break: ShortBreakConfig,
    #[serde(default)]
    pub long_break: LongBreakConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_regular_hours_min() -> u64 {
    8 * 60
}
fn default_tomato_size() -> u64 {
    25 * 60
}
fn default_tomato_warn_after() -> u64 {
    24 * 60
}
fn default_short_break_size() -> u64 {
    5 * 60
}
fn default_short_break_warn_after() -> u64 {
    4 * 60 + 30
}
fn default_long_break_size() -> u64 {
    15 * 60
}
fn default_long_break_warn_after() -> u64 {
    14 * 60
}
fn default_true() -> bool {
    true
}

impl Default for WorkDayConfig {
    fn default() -> Self {
        Self {
            regular_hours_min: default_regular_hours_min(),
        }
    }
}

impl Default for TomatoConfig {
    fn default() -> Self {
        Self {
            size_secs: default_tomato_size(),
            warn_after_secs: default_tomato_warn_after(),
        }
    }
}

impl Default for ShortBreakConfig {
    fn default() -> Self {
        Self {
            size_secs: default_short_break_size(),
            warn_after_secs: default_short_break_warn_after(),
        }
    }
}

impl Default for LongBreakConfig {
    fn default() -> Self {
        Self {
            size_secs: default_long_break_size(),
            warn_after_secs: default_long_break_warn_after(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { bell: true }
    }
}

impl Config {
    fn value_at<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    /// Replace the leaf at `key`, parsing `value` as the type already stored there.
    fn set_value_at(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Self::value_at_mut(root, parent).ok_or_else(unknown)?, leaf),
            None => (root, key),
        };
        let slot = parent
            .as_object_mut()
            .and_then(|obj| obj.get_mut(leaf))
            .ok_or_else(unknown)?;

        *slot = match &*slot {
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|e| invalid(e.to_string()))?,
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|e| invalid(e.to_string()))?,
            serde_json::Value::Object(_) => return Err(invalid("expected a leaf key".into())),
            _ => serde_json::Value::String(value.into()),
        };
        Ok(())
    }

    fn value_at_mut<'a>(root: &'a mut serde_json::Value, key: &str) -> Option<&'a mut serde_json::Value> {
        key.split('.').try_fold(root, |node, part| node.get_mut(part))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/tomatofarm"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::value_at(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory, then validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting durations are inconsistent.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_value_at(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.settings()?;
        *self = updated;
        Ok(())
    }

    /// Settings for a [`TomatoFarmApp`](crate::farm::TomatoFarmApp).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a size is zero or a warning
    /// would fire at or after its phase is due.
    pub fn settings(&self) -> Result<TomatoFarmSettings, ConfigError> {
        let phases = [
            ("tomato", self.tomato.size_secs, self.tomato.warn_after_secs),
            ("short_break", self.short_break.size_secs, self.short_break.warn_after_secs),
            ("long_break", self.long_break.size_secs, self.long_break.warn_after_secs),
        ];
        for (name, size, warn_after) in phases {
            if size == 0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("{name}.size_secs"),
                    message: "must be greater than zero".into(),
                });
            }
            if warn_after >= size {
                return Err(ConfigError::InvalidValue {
                    key: format!("{name}.warn_after_secs"),
                    message: format!("must be less than {name}.size_secs ({size})"),
                });
            }
        }

        Ok(TomatoFarmSettings {
            regular_hours: Duration::from_secs(self.work_day.regular_hours_min.saturating_mul(60)),
            tomato_size: Duration::from_secs(self.tomato.size_secs),
            tomato_due_warning: Duration::from_secs(self.tomato.warn_after_secs),
            break_size: Duration::from_secs(self.short_break.size_secs),
            break_due_warning: Duration::from_secs(self.short_break.warn_after_secs),
            long_break_size: Duration::from_secs(self.long_break.size_secs),
            long_break_due_warning: Duration::from_secs(self.long_break.warn_after_secs),
        })
    }
}
