//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::schedule::{self, ScheduleOptions};
use super::task;
use crate::domain::ScheduleId;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "taskplan")]
#[command(author, version, about = "Dependency-aware task scheduling for small teams")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new taskplan project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage the project's tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Order tasks, allocate them to calendar days and check deadlines
    Schedule {
        /// Task file (.json, .yaml, .yml or .toml) instead of the project's tasks
        #[arg(long)]
        file: Option<PathBuf>,

        /// Working hours per day (overrides the task file and config)
        #[arg(long, env = "TASKPLAN_HOURS_PER_DAY")]
        hours_per_day: Option<u32>,

        /// First day of the schedule (defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Do not save the result to the project history
        #[arg(long)]
        no_save: bool,

        /// Replace the project's tasks with the tasks from --file
        #[arg(long, requires = "file")]
        save_tasks: bool,
    },

    /// Check tasks for dependency cycles
    Check {
        /// Task file instead of the project's tasks
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Show the most recently saved schedule
    Last,

    /// Show a saved schedule by ID
    Show {
        /// Schedule ID (e.g. s-1a2b3c4)
        id: ScheduleId,
    },

    /// List saved schedules
    History {
        /// Number of schedules to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

/// Installs the tracing subscriber; library events go to stderr
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "taskplan=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolves the output format from the flag or the global config
fn resolve_format(flag: Option<OutputFormat>) -> OutputFormat {
    flag.unwrap_or_else(|| {
        Config::load()
            .map(|config| config.global.default_format.into())
            .unwrap_or_default()
    })
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = Output::new(resolve_format(cli.format), cli.verbose);

    output.verbose("taskplan starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created project directory at: {}", project.project_dir().display()),
            );
            output.success(&format!("Initialized taskplan project at {}", project.root().display()));
        }

        Commands::Task(cmd) => task::run(cmd, &output)?,

        Commands::Schedule {
            file,
            hours_per_day,
            start,
            no_save,
            save_tasks,
        } => schedule::schedule(
            &output,
            ScheduleOptions {
                file: file.as_deref(),
                hours_per_day,
                start,
                no_save,
                save_tasks,
            },
        )?,

        Commands::Check { file } => schedule::check(&output, file.as_deref())?,

        Commands::Last => schedule::last(&output)?,

        Commands::Show { id } => schedule::show(&output, &id)?,

        Commands::History { limit } => schedule::history(&output, limit)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
