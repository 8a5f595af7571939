//! Deadline checks against an allocated schedule

use super::calendar::ScheduledTask;
use super::task::TaskSpec;

/// Builds the diagnostic for a task that finishes after its due date
pub fn deadline_warning(title: &str) -> String {
    format!("Task '{}' cannot meet due date", title)
}

/// Returns one warning per task whose allocated end date is strictly after
/// its (parseable) due date, in schedule order
///
/// `tasks` and `schedule` are paired positionally.
pub fn evaluate_deadlines<'a, I>(tasks: I, schedule: &[ScheduledTask]) -> Vec<String>
where
    I: IntoIterator<Item = &'a TaskSpec>,
{
    tasks
        .into_iter()
        .zip(schedule)
        .filter(|(task, slot)| task.deadline().is_some_and(|due| slot.end_date > due))
        .map(|(task, _)| deadline_warning(&task.title))
        .collect()
}
