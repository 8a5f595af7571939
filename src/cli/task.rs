//! Task CLI commands

use anyhow::{bail, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{parse_due_date, ScheduleRequest, TaskSpec};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task, or replace the task with the same title
    ///
    /// Examples:
    ///   taskplan task add "Design API" --hours 6 --due 2026-11-02
    ///   taskplan task add "Build API" --hours 24 --dep "Design API"
    Add {
        /// Task title (unique within the project)
        title: String,

        /// Estimated effort in hours
        #[arg(long)]
        hours: f64,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Title of a task that must come first (repeatable)
        #[arg(long = "dep")]
        deps: Vec<String>,
    },

    /// List tasks
    List,

    /// Remove a task
    Remove {
        /// Task title
        title: String,
    },
}

pub fn run(cmd: TaskCommands, output: &Output) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            title,
            hours,
            due,
            deps,
        } => add_task(output, title, hours, due, deps),
        TaskCommands::List => list_tasks(output),
        TaskCommands::Remove { title } => remove_task(output, &title),
    }
}

fn add_task(
    output: &Output,
    title: String,
    hours: f64,
    due: Option<String>,
    deps: Vec<String>,
) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    if let Some(raw) = due.as_deref() {
        if parse_due_date(raw).is_none() {
            bail!("Invalid due date '{}': expected YYYY-MM-DD", raw);
        }
    }

    let mut task = TaskSpec::new(title.trim(), hours);
    task.due_date = due;
    task.dependencies = deps;

    ScheduleRequest::new(vec![task.clone()]).validate()?;

    let existing = store.read_all()?;
    for dep in &task.dependencies {
        if !existing.iter().any(|t| &t.title == dep) {
            output.verbose_ctx("task", &format!("Dependency '{}' does not exist yet", dep));
        }
    }

    let replaced = store.upsert(&task)?;
    output.verbose_ctx("task", &format!("Wrote {}", store.path().display()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task,
            "replaced": replaced,
        }));
    } else if replaced {
        output.success(&format!("Updated task '{}'", task.title));
    } else {
        output.success(&format!("Added task '{}'", task.title));
    }

    Ok(())
}

fn list_tasks(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;

    output.verbose_ctx("task", &format!("Loaded {} tasks", tasks.len()));

    if output.is_json() {
        output.data(&tasks);
    } else if tasks.is_empty() {
        println!("No tasks. Add one with 'taskplan task add'.");
    } else {
        println!("{:<30} {:>7}  {:<10}  DEPENDS ON", "TITLE", "HOURS", "DUE");
        println!("{}", "-".repeat(72));
        for task in &tasks {
            println!(
                "{:<30} {:>7}  {:<10}  {}",
                task.title,
                task.estimated_hours,
                task.due_date.as_deref().unwrap_or("-"),
                task.dependencies.join(", ")
            );
        }
    }

    Ok(())
}

fn remove_task(output: &Output, title: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    if !store.remove(title)? {
        bail!("Task not found: {}", title);
    }

    let dependents: Vec<_> = store
        .read_all()?
        .into_iter()
        .filter(|t| t.dependencies.iter().any(|d| d == title))
        .map(|t| t.title)
        .collect();

    if !dependents.is_empty() {
        output.verbose_ctx(
            "task",
            &format!("Still referenced by: {}", dependents.join(", ")),
        );
    }

    output.success(&format!("Removed task '{}'", title));
    Ok(())
}
