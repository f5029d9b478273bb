//! Interactive work day session on the terminal.
//!
//! Commands are read line by line from stdin while notifications from the
//! farm are printed as they arrive.

use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tomatofarm_core::{
    Config, Notification, SystemClock, TomatoFarmApp, TomatoFarmSettings, TomatoTimer,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Tomato,
    Break,
    Pause,
    End,
    Summary,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tomato" | "t" => Ok(Command::Tomato),
            "break" | "b" => Ok(Command::Break),
            "pause" | "p" => Ok(Command::Pause),
            "end" => Ok(Command::End),
            "summary" | "s" => Ok(Command::Summary),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

const HELP: &str = "\
commands:
  tomato   start a new tomato
  break    take a break now
  pause    pause the day
  end      finish the day and print its summary
  summary  print the day so far
  help     show this help
  quit     print the summary and exit";

pub fn run() -> CliResult<()> {
    let config = Config::load_or_default();
    let settings = config.settings()?;
    let bell = config.notifications.bell;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(session(settings, bell));
    // A pending stdin read must not hold up exit.
    runtime.shutdown_background();
    result
}

async fn session(settings: TomatoFarmSettings, bell: bool) -> CliResult<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let timer = Arc::new(TomatoTimer::new(Handle::current()));
    let app = TomatoFarmApp::new(settings, Arc::new(SystemClock), timer, Arc::new(tx));

    app.start_work()?;
    if let Some(summary) = app.summary() {
        println!(
            "work day started at {}, regular hours end at {}",
            summary.start_time().format("%H:%M"),
            summary.regular_hours_end_time().format("%H:%M")
        );
    }
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(notification) = rx.recv() => announce(notification, bell),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                };
                if command == Command::Quit {
                    break;
                }
                if let Err(e) = execute(&app, command) {
                    eprintln!("error: {e}");
                    continue;
                }
                if command == Command::End {
                    break;
                }
            }
        }
    }

    print_summary(&app)
}

fn execute(app: &TomatoFarmApp, command: Command) -> CliResult<()> {
    tracing::debug!(?command, "command received");
    match command {
        Command::Tomato => {
            app.start_new_tomato()?;
            println!("tomato started");
        }
        Command::Break => {
            app.start_break()?;
            println!("on break");
        }
        Command::Pause => {
            app.pause_work()?;
            println!("day paused, 'tomato' resumes");
        }
        Command::End => app.end_work()?,
        Command::Summary => print_summary(app)?,
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn announce(notification: Notification, bell: bool) {
    let now = chrono::Local::now().format("%H:%M");
    let bell = if bell { "\x07" } else { "" };
    println!("{bell}[{now}] {}", notification.message());
}

fn print_summary(app: &TomatoFarmApp) -> CliResult<()> {
    match app.summary() {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => println!("no work day"),
    }
    Ok(())
}
