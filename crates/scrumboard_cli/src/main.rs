//! Terminal dashboard for the scrum board.
//!
//! # Responsibility
//! - Parse commands, resolve configuration and bootstrap logging/storage.
//! - Drive `StoryService` and render results as tables and text charts.
//!
//! # Invariants
//! - Schema initialization failure aborts before any command runs.
//! - Every successful write is followed by a fresh read of the board.

mod render;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::info;
use scrumboard_core::{
    init_logging, init_stderr_logging, open_db, BoardChange, BoardConfig, ConfigOverrides,
    NewStory, SqliteStoryRepository, StoryFilter, StoryId, StoryRepository, StoryService,
    StoryStatus,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scrumboard", version, about = "Scrum board: stories, grid and trends")]
struct Cli {
    /// Database file (overrides SCRUMBOARD_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// trace|debug|info|warn|error (overrides SCRUMBOARD_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute log directory (overrides SCRUMBOARD_LOG_DIR). Logs go to stderr without one.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the stories table if it does not exist.
    Init,
    /// Create a new story.
    Create(CreateArgs),
    /// Show the story grid, optionally filtered.
    List(ListArgs),
    /// Change the status of one story.
    Update {
        id: i64,
        #[arg(long)]
        status: StoryStatus,
    },
    /// Delete one story.
    Delete { id: i64 },
    /// Show status, time-by-assignee and timeline charts.
    Trends {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    assignee: String,
    /// Time allotted in hours.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    hours: u32,
    /// Start date, YYYY-MM-DD (default: today).
    #[arg(long)]
    start: Option<NaiveDate>,
    /// End date, YYYY-MM-DD (default: today).
    #[arg(long)]
    end: Option<NaiveDate>,
    /// To Do | In Progress | Completed
    #[arg(long)]
    status: StoryStatus,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    assignee: Option<String>,
    #[arg(long)]
    status: Option<StoryStatus>,
    #[arg(long)]
    min_hours: Option<u32>,
    #[arg(long)]
    max_hours: Option<u32>,
    /// Only stories whose date range contains this day.
    #[arg(long)]
    active_on: Option<NaiveDate>,
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn filter(&self) -> StoryFilter {
        StoryFilter {
            title_contains: self.title.clone(),
            assignee_contains: self.assignee.clone(),
            status: self.status,
            min_hours: self.min_hours,
            max_hours: self.max_hours,
            active_on: self.active_on,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = BoardConfig::resolve(ConfigOverrides {
        db_path: cli.db.clone(),
        log_level: cli.log_level.clone(),
        log_dir: cli.log_dir.clone(),
    })?;

    match &config.log_dir {
        Some(log_dir) => init_logging(config.log_level, log_dir),
        None => init_stderr_logging(config.log_level),
    }
    .context("logging setup failed")?;

    let conn = open_db(&config.db_path).with_context(|| {
        format!(
            "could not initialize story database at {}",
            config.db_path.display()
        )
    })?;
    let service = StoryService::new(SqliteStoryRepository::try_new(&conn)?);

    run(&service, cli.command)
}

fn run<R: StoryRepository>(service: &StoryService<R>, command: Command) -> Result<()> {
    match command {
        Command::Init => {
            info!("event=cli_command module=cli status=ok command=init");
            println!("Story table is ready.");
            Ok(())
        }
        Command::Create(args) => {
            let today = Local::now().date_naive();
            let draft = NewStory::new(
                args.title,
                args.assignee,
                args.hours,
                args.start.unwrap_or(today),
                args.end.unwrap_or(today),
                args.status,
            );
            let change = service.create_story(&draft)?;
            report_change(service, change, "Story created successfully!")
        }
        Command::List(args) => {
            let stories = service.list_filtered(&args.filter())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stories)?);
            } else {
                print!("{}", render::grid(&stories));
            }
            Ok(())
        }
        Command::Update { id, status } => {
            let change = service.update_status(StoryId::from(id), status)?;
            report_change(service, change, "Story updated successfully!")
        }
        Command::Delete { id } => {
            let change = service.delete_story(StoryId::from(id))?;
            report_change(service, change, "Story deleted successfully!")
        }
        Command::Trends { json } => {
            let trends = service.trends()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&trends)?);
            } else {
                print!("{}", render::trends(&trends)?);
            }
            Ok(())
        }
    }
}

/// Prints the outcome and re-renders the grid when the board changed.
fn report_change<R: StoryRepository>(
    service: &StoryService<R>,
    change: BoardChange,
    success: &str,
) -> Result<()> {
    if !change.needs_refresh() {
        eprintln!("Story ID {} not available!", change.story_id());
        return Ok(());
    }

    println!("{success} (id {})", change.story_id());
    let stories = service.list_stories()?;
    print!("{}", render::grid(&stories));
    Ok(())
}
