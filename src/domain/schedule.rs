//! Schedule generation
//!
//! Entry point of the engine: cycle check, then ordering, calendar
//! allocation and deadline evaluation. The engine is a pure function of its
//! input and the start day; every outcome is reported through
//! [`ScheduleResult`] rather than an error.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{allocate, ScheduledTask, DEFAULT_WORKING_HOURS_PER_DAY};
use super::graph::TaskGraph;
use super::task::TaskSpec;
use super::warnings::evaluate_deadlines;

/// The only hard failure the engine reports
pub const CYCLE_ERROR: &str = "Dependency cycle detected";

fn default_working_hours() -> u32 {
    DEFAULT_WORKING_HOURS_PER_DAY
}

/// A set of tasks to schedule with a daily capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,

    #[serde(default = "default_working_hours", alias = "working_hours_per_day")]
    pub working_hours_per_day: u32,
}

impl ScheduleRequest {
    pub fn new(tasks: Vec<TaskSpec>) -> Self {
        Self {
            tasks,
            working_hours_per_day: DEFAULT_WORKING_HOURS_PER_DAY,
        }
    }

    /// Sets the daily capacity (builder style)
    pub fn with_working_hours(mut self, working_hours_per_day: u32) -> Self {
        self.working_hours_per_day = working_hours_per_day;
        self
    }

    /// Schedules the request starting today
    pub fn run(&self) -> ScheduleResult {
        generate_schedule(&self.tasks, self.working_hours_per_day)
    }

    /// Schedules the request starting on `start`
    pub fn run_from(&self, start: NaiveDate) -> ScheduleResult {
        generate_schedule_from(&self.tasks, self.working_hours_per_day, start)
    }
}

/// Output of one engine run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// Task titles in dependency order
    #[serde(default)]
    pub recommended_order: Vec<String>,

    /// One interval per task, in the same order as `recommended_order`
    #[serde(default)]
    pub schedule: Vec<ScheduledTask>,

    /// Tasks that cannot meet their due date
    #[serde(default)]
    pub warnings: Vec<String>,

    /// Non-empty only when the input was rejected
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ScheduleResult {
    /// Result for input rejected because of a dependency cycle
    pub fn cycle_detected() -> Self {
        Self {
            errors: vec![CYCLE_ERROR.to_string()],
            ..Self::default()
        }
    }

    /// Returns true if the input was rejected
    pub fn is_rejected(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Last day of the schedule, if any task was allocated
    pub fn finish_date(&self) -> Option<NaiveDate> {
        self.schedule.last().map(|slot| slot.end_date)
    }

    /// Total hours allocated across all tasks
    pub fn total_hours(&self) -> f64 {
        self.schedule.iter().map(|slot| slot.allocated_hours).sum()
    }
}

/// Schedules `tasks` starting on the local calendar's current day
pub fn generate_schedule(tasks: &[TaskSpec], working_hours_per_day: u32) -> ScheduleResult {
    generate_schedule_from(tasks, working_hours_per_day, Local::now().date_naive())
}

/// Schedules `tasks` starting on `start`
pub fn generate_schedule_from(
    tasks: &[TaskSpec],
    working_hours_per_day: u32,
    start: NaiveDate,
) -> ScheduleResult {
    let graph = TaskGraph::from_tasks(tasks);
    tracing::debug!(tasks = graph.len(), working_hours_per_day, %start, "generating schedule");

    if graph.has_cycle() {
        tracing::debug!("rejecting input: {}", CYCLE_ERROR);
        return ScheduleResult::cycle_detected();
    }

    let ordered = graph.ordered_tasks();
    let schedule = allocate(ordered.iter().copied(), working_hours_per_day, start);
    let warnings = evaluate_deadlines(ordered.iter().copied(), &schedule);

    ScheduleResult {
        recommended_order: ordered.iter().map(|task| task.title.clone()).collect(),
        schedule,
        warnings,
        errors: Vec::new(),
    }
}
