mod config;

pub use config::{
    Config, LongBreakConfig, NotificationsConfig, ShortBreakConfig, TomatoConfig, WorkDayConfig,
};

use std::path::PathBuf;

/// Returns `~/.config/tomatofarm[-dev]/` based on TOMATOFARM_ENV.
///
/// Set TOMATOFARM_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TOMATOFARM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tomatofarm-dev")
    } else {
        base_dir.join("tomatofarm")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
