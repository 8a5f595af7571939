//! Scheduling commands (schedule, check, last, show, history)

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use super::input::{self, TaskInput};
use super::output::Output;
use crate::domain::{ScheduleId, TaskGraph, ScheduleRequest, ScheduleResult, CYCLE_ERROR};
use crate::storage::{Config, Project, ScheduleRecord};

/// Options for the `schedule` command
pub struct ScheduleOptions<'a> {
    pub file: Option<&'a Path>,
    pub hours_per_day: Option<u32>,
    pub start: Option<NaiveDate>,
    pub no_save: bool,
    pub save_tasks: bool,
}

/// Loads tasks from a file, or from the current project's task store
fn load_tasks(output: &Output, file: Option<&Path>, project: Option<&Project>) -> Result<TaskInput> {
    match (file, project) {
        (Some(path), _) => {
            output.verbose_ctx("input", &format!("Reading tasks from {}", path.display()));
            input::load(path)
        }
        (None, Some(project)) => {
            let store = project.task_store();
            output.verbose_ctx("input", &format!("Reading tasks from {}", store.path().display()));
            Ok(store.read_all()?.into())
        }
        (None, None) => bail!("No task file given and not in a taskplan project. Pass --file or run 'taskplan init'."),
    }
}

/// Opens the current project if there is one
fn current_project() -> Result<Option<Project>> {
    match Config::find_project_root() {
        Some(root) => Ok(Some(Project::open(root)?)),
        None => Ok(None),
    }
}

/// Generate a schedule and save it to the project history
pub fn schedule(output: &Output, opts: ScheduleOptions<'_>) -> Result<()> {
    let project = current_project()?;
    let config = match &project {
        Some(project) => project.config().clone(),
        None => Config::load()?,
    };

    let input = load_tasks(output, opts.file, project.as_ref())?;
    let working_hours_per_day = opts
        .hours_per_day
        .or(input.working_hours_per_day)
        .unwrap_or_else(|| config.working_hours_per_day());

    let request = ScheduleRequest::new(input.tasks).with_working_hours(working_hours_per_day);
    request.validate()?;
    output.verbose_ctx(
        "schedule",
        &format!(
            "Scheduling {} tasks at {} hours/day",
            request.tasks.len(),
            working_hours_per_day
        ),
    );

    if opts.save_tasks {
        match (&project, opts.file) {
            (Some(project), Some(_)) => {
                let count = project.task_store().replace_all(&request.tasks)?;
                output.verbose_ctx("schedule", &format!("Saved {} tasks to the project", count));
            }
            _ => bail!("--save-tasks needs both --file and a taskplan project"),
        }
    }

    let result = match opts.start {
        Some(start) => request.run_from(start),
        None => request.run(),
    };

    print_result(output, &result);

    if result.is_rejected() {
        bail!("{}", result.errors.join("; "));
    }

    if let Some(project) = &project {
        if project.config().project.save_history && !opts.no_save {
            let history = project.history_store();
            let record = ScheduleRecord::new(result, working_hours_per_day)?;
            history.append(&record)?;
            let pruned = history.prune(project.config().project.history_limit)?;
            output.verbose_ctx(
                "schedule",
                &format!("Saved schedule {} (pruned {})", record.id, pruned),
            );
        }
    }

    Ok(())
}

/// Check tasks for dependency cycles and print the recommended order
pub fn check(output: &Output, file: Option<&Path>) -> Result<()> {
    let project = current_project()?;
    let input = load_tasks(output, file, project.as_ref())?;

    let graph = TaskGraph::from_tasks(&input.tasks);
    for title in graph.duplicate_titles() {
        output.verbose_ctx("check", &format!("Duplicate title: {}", title));
    }

    if graph.has_cycle() {
        if output.is_json() {
            output.data(&serde_json::json!({
                "acyclic": false,
                "errors": [CYCLE_ERROR],
            }));
        }
        bail!(CYCLE_ERROR);
    }

    let order: Vec<_> = graph
        .ordered_tasks()
        .into_iter()
        .map(|task| task.title.as_str())
        .collect();

    if output.is_json() {
        output.data(&serde_json::json!({
            "acyclic": true,
            "recommendedOrder": order,
        }));
    } else if order.is_empty() {
        println!("No tasks to check.");
    } else {
        println!("No dependency cycles ({} tasks).", order.len());
        println!("Recommended order: {}", order.join(" -> "));
    }

    Ok(())
}

/// Show the most recently saved schedule
pub fn last(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let latest = project.history_store().latest()?;

    match latest {
        Some(record) => print_record(output, &record),
        None if output.is_json() => output.data(&serde_json::Value::Null),
        None => println!("No schedule saved yet. Run 'taskplan schedule'."),
    }

    Ok(())
}

/// Show a saved schedule by ID
pub fn show(output: &Output, id: &ScheduleId) -> Result<()> {
    let project = Project::open_current()?;
    let record = project.history_store().get(id)?;

    match record {
        Some(record) => print_record(output, &record),
        None => bail!("Schedule not found: {}", id),
    }

    Ok(())
}

/// Prints a saved record with its header
fn print_record(output: &Output, record: &ScheduleRecord) {
    if output.is_json() {
        output.data(record);
        return;
    }

    println!(
        "Schedule {} (saved {}, {} hours/day)",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M UTC"),
        record.working_hours_per_day
    );
    println!();
    print_result(output, &record.result);
}

/// List saved schedules, newest first
pub fn history(output: &Output, limit: usize) -> Result<()> {
    let project = Project::open_current()?;
    let records = project
        .history_store()
        .read_all()
        .context("Failed to read schedule history")?;

    let newest: Vec<_> = records.iter().rev().take(limit).collect();

    if output.is_json() {
        let items: Vec<_> = newest
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "createdAt": r.created_at,
                    "workingHoursPerDay": r.working_hours_per_day,
                    "tasks": r.result.schedule.len(),
                    "warnings": r.result.warnings.len(),
                    "finishDate": r.result.finish_date(),
                })
            })
            .collect();
        output.data(&items);
    } else if newest.is_empty() {
        println!("No schedule saved yet.");
    } else {
        println!(
            "{:<10} {:<17} {:>5} {:>8}  FINISHES",
            "ID", "SAVED (UTC)", "TASKS", "WARNINGS"
        );
        println!("{}", "-".repeat(60));
        for r in newest {
            println!(
                "{:<10} {:<17} {:>5} {:>8}  {}",
                r.id.to_string(),
                r.created_at.format("%Y-%m-%d %H:%M").to_string(),
                r.result.schedule.len(),
                r.result.warnings.len(),
                r.result
                    .finish_date()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }

    Ok(())
}

/// Prints a schedule result in the current format
fn print_result(output: &Output, result: &ScheduleResult) {
    if output.is_json() {
        output.data(result);
        return;
    }

    // Rejections surface as the command's error
    if result.is_rejected() {
        return;
    }

    if result.schedule.is_empty() {
        println!("No tasks to schedule.");
        return;
    }

    println!("Recommended order: {}", result.recommended_order.join(" -> "));
    println!();
    println!(
        "{:<4} {:<30} {:<10}  {:<10}  {:>7}",
        "#", "TITLE", "START", "END", "HOURS"
    );
    println!("{}", "-".repeat(68));
    for (i, slot) in result.schedule.iter().enumerate() {
        println!(
            "{:<4} {:<30} {:<10}  {:<10}  {:>7}",
            i + 1,
            slot.title,
            slot.start_date.to_string(),
            slot.end_date.to_string(),
            slot.allocated_hours
        );
    }

    if !result.warnings.is_empty() {
        println!();
        println!("Warnings ({}):", result.warnings.len());
        for warning in &result.warnings {
            output.warning(warning);
        }
    }

    if let Some(finish) = result.finish_date() {
        println!();
        println!(
            "Finishes {} ({} hours across {} tasks)",
            finish,
            result.total_hours(),
            result.schedule.len()
        );
    }
}
