#![warn(clippy::pedantic)]
//! Command-line front end of 38 Club.
//!
//! ```bash
//! club38 --user alice onboard --weight 82 --body-fat 18 --height 180 --calories 2700
//! club38 --user alice today
//! club38 --user alice log "lat pulldowns 50kg 12 reps"
//! club38 --user alice analyze "Lat Pulldowns"
//! ```

mod commands;
mod log;
mod settings;

use std::sync::{Arc, Mutex};

use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use club38_domain::{Service, Store, UserID, WorkoutDay};
use club38_storage::{Gemini, JsonFile};

use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "club38",
    version,
    about = "Voice workout logging for the 38 Club training program"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    overrides: Overrides,

    /// Print the recorded log messages after the command finished
    #[arg(long, global = true)]
    print_log: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Interpret a spoken set description without logging it
    Parse {
        transcript: String,
        /// Restrict recognized exercises to a workout day
        #[arg(long, value_parser = commands::parse_day)]
        day: Option<WorkoutDay>,
    },
    /// Show the scheduled workout of today
    Today,
    /// Interpret a spoken set description and log it as a workout
    Log(commands::LogArgs),
    /// Show the sets of the last three weeks of an exercise
    History { exercise: String },
    /// Show personal bests
    Best { exercise: Option<String> },
    /// Analyze the progress of an exercise or of all exercises of a workout day
    Analyze {
        exercise: Option<String>,
        #[arg(long, value_parser = commands::parse_day)]
        day: Option<WorkoutDay>,
    },
    /// Set up the body metrics and start the training program
    Onboard(commands::OnboardArgs),
    /// Delete all workouts, history and personal bests
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.overrides, |key| std::env::var(key).ok())?;

    let memory = Arc::new(Mutex::new(log::Memory::default()));
    log::init(memory.clone(), settings.log_level()?)?;

    let result = run(cli.command, &settings).await;

    if cli.print_log {
        if let Ok(memory) = memory.lock() {
            for entry in log::Repository::read_entries(&*memory).iter().rev() {
                eprintln!("{} {:<5} {}", entry.time, entry.level, entry.message);
            }
        }
    }

    let output = result?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

async fn run(command: Command, settings: &Settings) -> anyhow::Result<String> {
    let service = Service::new(Gemini::new(settings.gemini_config())?);
    let mut store = Store::new(JsonFile::new(settings.data_dir.clone()));
    let today = Local::now().date_naive();
    let now = Utc::now();

    if !matches!(command, Command::Parse { .. }) {
        let user = settings
            .user
            .as_deref()
            .context("no user configured, pass --user or set CLUB38_USER")?;
        store.sign_in(UserID::new(user)?).await?;
        ::log::debug!("signed in as {user}");
    }

    match command {
        Command::Parse { transcript, day } => commands::parse(&service, &transcript, day).await,
        Command::Today => Ok(commands::today(&store, today)),
        Command::Log(args) => commands::log(&service, &mut store, args, today, now).await,
        Command::History { exercise } => Ok(commands::history(&store, &exercise)),
        Command::Best { exercise } => Ok(commands::best(&store, exercise.as_deref())),
        Command::Analyze { exercise, day } => {
            commands::analyze(&service, &store, exercise.as_deref(), day, today).await
        }
        Command::Onboard(args) => Ok(commands::onboard(&mut store, args, today).await),
        Command::Reset { yes } => commands::reset(&mut store, yes).await,
    }
}
