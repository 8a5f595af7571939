//! Calendar allocation under a single serial resource
//!
//! Tasks are laid out back to back, one after another, starting on a given
//! day. Each task occupies a whole number of days derived from its effort
//! and the daily capacity. Intervals never overlap and leave no gaps.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::task::TaskSpec;

/// Daily capacity used when the caller does not supply one
pub const DEFAULT_WORKING_HOURS_PER_DAY: u32 = 8;

/// A task allocated to a contiguous block of calendar days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub title: String,

    /// First day of work (inclusive)
    pub start_date: NaiveDate,

    /// Last day of work (inclusive)
    pub end_date: NaiveDate,

    /// The full estimate, not split across days
    pub allocated_hours: f64,
}

impl ScheduledTask {
    /// Number of calendar days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Number of whole days a task occupies: `ceil(hours / capacity)`, at least 1
///
/// A capacity of zero is treated as one hour per day.
pub fn duration_days(estimated_hours: f64, working_hours_per_day: u32) -> u64 {
    let capacity = f64::from(working_hours_per_day.max(1));
    let days = (estimated_hours / capacity).ceil();

    if days.is_nan() || days < 1.0 {
        1
    } else {
        // Saturating float-to-int cast
        days as u64
    }
}

/// Adds days to a date, saturating at the end of the representable calendar
fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

/// Allocates ordered tasks to consecutive day ranges beginning at `start`
pub fn allocate<'a, I>(ordered: I, working_hours_per_day: u32, start: NaiveDate) -> Vec<ScheduledTask>
where
    I: IntoIterator<Item = &'a TaskSpec>,
{
    let mut cursor = start;

    ordered
        .into_iter()
        .map(|task| {
            let days = duration_days(task.estimated_hours, working_hours_per_day);
            let start_date = cursor;
            let end_date = add_days(start_date, days - 1);
            cursor = add_days(end_date, 1);

            tracing::debug!(
                task = %task.title,
                %start_date,
                %end_date,
                days,
                "allocated task"
            );

            ScheduledTask {
                title: task.title.clone(),
                start_date,
                end_date,
                allocated_hours: task.estimated_hours,
            }
        })
        .collect()
}
