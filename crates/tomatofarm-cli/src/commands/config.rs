use std::time::Duration;

use clap::Subcommand;
use tomatofarm_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "tomato.size_secs", "notifications.bell")
        key: String,
    },
    /// Set a config value
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// Show the configured work day
    List {
        /// Print the raw config as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", describe(&config)?);
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// One line per phase, with warning delays shown relative to the phase start.
fn describe(config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let settings = config.settings()?;
    let phase = |size: Duration, warn: Duration| {
        format!("{} (warn after {})", human(size), human(warn))
    };
    Ok(format!(
        "regular hours  {}\n\
         tomato         {}\n\
         short break    {}\n\
         long break     {}\n\
         bell           {}\n",
        human(settings.regular_hours),
        phase(settings.tomato_size, settings.tomato_due_warning),
        phase(settings.break_size, settings.break_due_warning),
        phase(settings.long_break_size, settings.long_break_due_warning),
        if config.notifications.bell { "on" } else { "off" },
    ))
}

fn human(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    match (h, m, s) {
        (0, m, 0) => format!("{m}m"),
        (0, m, s) => format!("{m}m{s:02}s"),
        (h, 0, 0) => format!("{h}h"),
        (h, m, _) => format!("{h}h{m:02}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_durations() {
        assert_eq!(human(Duration::from_secs(25 * 60)), "25m");
        assert_eq!(human(Duration::from_secs(270)), "4m30s");
        assert_eq!(human(Duration::from_secs(8 * 3600)), "8h");
        assert_eq!(human(Duration::from_secs(7 * 3600 + 30 * 60)), "7h30m");
    }

    #[test]
    fn describe_lists_every_phase() {
        let text = describe(&Config::default()).unwrap();
        assert!(text.contains("regular hours  8h\n"));
        assert!(text.contains("tomato         25m (warn after 24m)\n"));
        assert!(text.contains("short break    5m (warn after 4m30s)\n"));
        assert!(text.contains("long break     15m (warn after 14m)\n"));
        assert!(text.contains("bell           on\n"));
    }
}
