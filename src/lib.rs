//! taskplan - Dependency-aware task scheduling
//!
//! Given tasks with effort estimates, optional deadlines and named
//! dependencies, taskplan rejects dependency cycles, orders the tasks so
//! every dependency comes first, lays them out back to back on the calendar
//! for a single worker, and warns about tasks that will miss their due date.
//!
//! The engine in [`domain`] is pure; [`storage`] and [`cli`] wrap it in a
//! local-first command-line tool.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    generate_schedule, generate_schedule_from, ScheduleRequest, ScheduleResult, ScheduledTask,
    TaskSpec,
};
