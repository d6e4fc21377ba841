//! taskmeter - personal task tracker with productivity analytics
//!
//! Command-line front end for taskmeter-core: log in, manage one-off tasks
//! and daily routines, and view completion analytics.

mod output;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use taskmeter_core::analytics::{self, StatsRange};
use taskmeter_core::types::{Priority, Routine, Task, TaskDraft, TaskStatus};
use taskmeter_core::{auth, Config, Store};

#[derive(Parser)]
#[command(name = "taskmeter")]
#[command(about = "Personal task tracker with productivity analytics")]
#[command(version)]
struct Cli {
    /// Output machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with an email address
    Login { email: String },
    /// Remove the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage one-off tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Manage daily routines
    Routine {
        #[command(subcommand)]
        command: RoutineCommand,
    },
    /// Show completion statistics for daily routines
    Stats {
        /// Range keyword: week, month, 3months, 6months, year
        #[arg(short, long)]
        range: Option<String>,
    },
    /// Show the 365-day completion heatmap
    Heatmap,
    /// Compare the current period with the previous one
    Compare {
        /// Range keyword: week, month, 3months, 6months, year
        #[arg(short, long)]
        range: Option<String>,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Due day (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks
    List,
    /// Mark a task completed
    Done { id: String },
    /// Mark a completed task pending again
    Reopen { id: String },
    /// Edit a task's fields
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due day (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Delete a task
    Rm { id: String },
}

#[derive(Subcommand)]
enum RoutineCommand {
    /// Add a daily routine
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List routines with today's status
    List,
    /// Toggle today's completion for a routine
    Check { id: String },
    /// Delete a routine and its completion history
    Rm { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        taskmeter_core::logging::init(&config.logging).context("failed to initialize logging")?;

    match cli.command {
        Command::Login { email } => {
            let session = auth::login(&email).context("login failed")?;
            println!("Logged in as {}", session.user);
            Ok(())
        }
        Command::Logout => {
            auth::logout().context("logout failed")?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            match auth::current().context("failed to read session")? {
                Some(session) => println!("{}", session.user),
                None => println!("(not logged in)"),
            }
            Ok(())
        }
        command => run_protected(command, &config, cli.json),
    }
}

/// Everything past login requires a session and the store.
fn run_protected(command: Command, config: &Config, json: bool) -> Result<()> {
    let session = auth::require_session()?;
    tracing::debug!(user = %session.user, "Session active");

    let db_path = Config::database_path();
    let store = Store::open(&db_path).context("failed to open task store")?;
    store.migrate().context("failed to run store migrations")?;

    let today = Local::now().date_naive();

    match command {
        Command::Task { command } => run_task(command, &store, json),
        Command::Routine { command } => run_routine(command, &store, today, json),
        Command::Stats { range } => {
            let range = resolve_range(range.as_deref(), config);
            let stats = analytics::completion_stats(&store, range, today)?;
            let efficiency = analytics::efficiency_breakdown(&store, range, today)?;
            output::print_stats(&stats, &efficiency, range, json)
        }
        Command::Heatmap => {
            let cells = analytics::heatmap_data(&store, today)?;
            output::print_heatmap(&cells, json)
        }
        Command::Compare { range } => {
            let range = resolve_range(range.as_deref(), config);
            let comparison = analytics::comparison_stats(&store, range, today)?;
            output::print_comparison(&comparison, range, json)
        }
        Command::Login { .. } | Command::Logout | Command::Whoami => unreachable!(),
    }
}

fn run_task(command: TaskCommand, store: &Store, json: bool) -> Result<()> {
    match command {
        TaskCommand::Add {
            title,
            description,
            due,
            priority,
        } => {
            let task = store.add_task(TaskDraft {
                title,
                description,
                due_date: due,
                priority,
                ..Default::default()
            })?;
            println!("Added task {} ({})", short_id(&task.id), task.title);
        }
        TaskCommand::List => {
            let tasks = store.list_tasks()?;
            output::print_tasks(&tasks, json)?;
        }
        TaskCommand::Done { id } => {
            let mut task = find_task(store, &id)?;
            task.status = TaskStatus::Completed;
            store.update_task(&task)?;
            println!("Task marked as Completed ({})", task.title);
        }
        TaskCommand::Reopen { id } => {
            let mut task = find_task(store, &id)?;
            task.status = TaskStatus::Pending;
            store.update_task(&task)?;
            println!("Task marked as Pending ({})", task.title);
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            due,
            priority,
        } => {
            let mut task = find_task(store, &id)?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(due) = due {
                task.due_date = Some(due);
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }
            store.update_task(&task)?;
            println!("Task updated ({})", task.title);
        }
        TaskCommand::Rm { id } => {
            let task = find_task(store, &id)?;
            store.delete_task(&task.id)?;
            println!("Task deleted ({})", task.title);
        }
    }
    Ok(())
}

fn run_routine(command: RoutineCommand, store: &Store, today: NaiveDate, json: bool) -> Result<()> {
    match command {
        RoutineCommand::Add { title, description } => {
            let routine = store.add_routine(&title, &description)?;
            println!("Added routine {} ({})", short_id(&routine.id), routine.title);
        }
        RoutineCommand::List => {
            let routines = store.list_routines()?;
            output::print_routines(&routines, today, json)?;
        }
        RoutineCommand::Check { id } => {
            let routine = find_routine(store, &id)?;
            let updated = store.toggle_routine(&routine.id, today)?;
            println!(
                "Routine marked as {} ({})",
                updated.status_for(today).display_name(),
                updated.title
            );
        }
        RoutineCommand::Rm { id } => {
            let routine = find_routine(store, &id)?;
            store.delete_routine(&routine.id)?;
            println!("Routine deleted ({})", routine.title);
        }
    }
    Ok(())
}

fn resolve_range(keyword: Option<&str>, config: &Config) -> StatsRange {
    match keyword {
        Some(keyword) => StatsRange::parse(keyword),
        None => StatsRange::parse(&config.analytics.default_range),
    }
}

/// First 8 characters of an id, enough to address it on the command line.
fn short_id(id: &str) -> &str {
    &id[..8.min(id.len())]
}

/// Look up a task by exact id or unique prefix.
fn find_task(store: &Store, needle: &str) -> Result<Task> {
    if let Some(task) = store.get_task(needle)? {
        return Ok(task);
    }

    let mut matches: Vec<Task> = store
        .list_tasks()?
        .into_iter()
        .filter(|t| t.id.starts_with(needle))
        .collect();

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => bail!("no task matching '{}'", needle),
        n => bail!("task id '{}' is ambiguous ({} matches)", needle, n),
    }
}

/// Look up a routine by exact id or unique prefix.
fn find_routine(store: &Store, needle: &str) -> Result<Routine> {
    if let Some(routine) = store.get_routine(needle)? {
        return Ok(routine);
    }

    let mut matches: Vec<Routine> = store
        .list_routines()?
        .into_iter()
        .filter(|r| r.id.starts_with(needle))
        .collect();

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => bail!("no routine matching '{}'", needle),
        n => bail!("routine id '{}' is ambiguous ({} matches)", needle, n),
    }
}
