//! Scheduling engine for taskplan
//!
//! Contains the core business logic without any I/O concerns.

mod task;
mod graph;
mod calendar;
mod warnings;
mod schedule;
mod validation;
mod id;

pub use task::{parse_due_date, parse_due_timestamp, TaskSpec};
pub use graph::{has_cycle, sequence, TaskGraph};
pub use calendar::{allocate, duration_days, ScheduledTask, DEFAULT_WORKING_HOURS_PER_DAY};
pub use warnings::{deadline_warning, evaluate_deadlines};
pub use schedule::{generate_schedule, generate_schedule_from, ScheduleRequest, ScheduleResult, CYCLE_ERROR};
pub use validation::{FieldError, ValidationError, MIN_ESTIMATED_HOURS};
pub use id::{IdError, ScheduleId};
