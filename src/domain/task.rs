//! Task descriptor
//!
//! A `TaskSpec` is the transient input unit of the scheduling engine. It has
//! no identity beyond its title, which other tasks use to name it as a
//! dependency.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A unit of work with effort, an optional deadline and named prerequisites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    /// Unique key used for lookups and dependency references
    pub title: String,

    /// Estimated effort in hours (> 0)
    #[serde(alias = "estimated_hours", alias = "hours")]
    pub estimated_hours: f64,

    /// Raw due date as supplied by the caller
    #[serde(default, alias = "due_date", alias = "due", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Titles of tasks that must precede this one
    #[serde(default, alias = "depends_on")]
    pub dependencies: Vec<String>,
}

impl TaskSpec {
    /// Creates a task with no deadline and no dependencies
    pub fn new(title: impl Into<String>, estimated_hours: f64) -> Self {
        Self {
            title: title.into(),
            estimated_hours,
            due_date: None,
            dependencies: Vec::new(),
        }
    }

    /// Sets the due date (builder style)
    pub fn due(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets the due date from a calendar date (builder style)
    pub fn due_on(self, date: NaiveDate) -> Self {
        self.due(date.format("%Y-%m-%d").to_string())
    }

    /// Adds a dependency by title (builder style)
    pub fn depends_on(mut self, title: impl Into<String>) -> Self {
        self.dependencies.push(title.into());
        self
    }

    /// Returns the due date if present and parseable
    ///
    /// An unparseable due date is indistinguishable from no deadline.
    pub fn deadline(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_due_date)
    }

    /// Key used to prioritize traversal roots: earlier deadlines first,
    /// including the time of day. Tasks without a deadline sort as
    /// `NaiveDateTime::MAX`.
    pub fn priority_key(&self) -> NaiveDateTime {
        self.due_date
            .as_deref()
            .and_then(parse_due_timestamp)
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// Parses a due date, returning `None` for anything unrecognized
///
/// Accepts plain ISO dates, RFC 3339 timestamps and naive timestamps. For
/// timestamps only the calendar date is kept.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    parse_due_timestamp(raw).map(|ts| ts.date())
}

/// Parses a due date with its time of day; plain dates fall at midnight
///
/// Offsets are not normalized: the wall-clock time as written is kept.
pub fn parse_due_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_date() {
        assert_eq!(parse_due_date("2026-10-20"), Some(date(2026, 10, 20)));
        assert_eq!(parse_due_date("  2026-10-20 "), Some(date(2026, 10, 20)));
    }

    #[test]
    fn parses_timestamps_as_dates() {
        assert_eq!(
            parse_due_date("2026-10-20T17:30:00Z"),
            Some(date(2026, 10, 20))
        );
        assert_eq!(
            parse_due_date("2026-10-20T09:00:00+02:00"),
            Some(date(2026, 10, 20))
        );
        assert_eq!(
            parse_due_date("2026-10-20T00:00:00"),
            Some(date(2026, 10, 20))
        );
        assert_eq!(
            parse_due_date("2026-10-20 08:15:00"),
            Some(date(2026, 10, 20))
        );
    }

    #[test]
    fn garbage_is_no_deadline() {
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("next tuesday"), None);
        assert_eq!(parse_due_date("2026-13-40"), None);
    }

    #[test]
    fn priority_key_sorts_missing_last() {
        let none = TaskSpec::new("A", 1.0);
        let bad = TaskSpec::new("B", 1.0).due("soon");
        let some = TaskSpec::new("C", 1.0).due("2030-01-01");

        assert_eq!(none.priority_key(), NaiveDateTime::MAX);
        assert_eq!(bad.priority_key(), NaiveDateTime::MAX);
        assert!(some.priority_key() < none.priority_key());
    }

    #[test]
    fn priority_key_keeps_time_of_day() {
        let morning = TaskSpec::new("A", 1.0).due("2026-10-20T09:00:00");
        let evening = TaskSpec::new("B", 1.0).due("2026-10-20T18:00:00");
        let plain = TaskSpec::new("C", 1.0).due("2026-10-20");

        assert!(plain.priority_key() < morning.priority_key());
        assert!(morning.priority_key() < evening.priority_key());
        assert_eq!(plain.priority_key(), date(2026, 10, 20).and_time(NaiveTime::MIN));
        assert_eq!(morning.deadline(), evening.deadline());
    }

    #[test]
    fn deserializes_camel_and_snake_case() {
        let camel: TaskSpec = serde_json::from_str(
            r#"{"title":"A","estimatedHours":4,"dueDate":"2026-10-20","dependencies":["B"]}"#,
        )
        .unwrap();
        let snake: TaskSpec = serde_json::from_str(
            r#"{"title":"A","estimated_hours":4,"due_date":"2026-10-20","depends_on":["B"]}"#,
        )
        .unwrap();

        assert_eq!(camel, snake);
        assert_eq!(camel.deadline(), Some(date(2026, 10, 20)));
    }

    #[test]
    fn optional_fields_default() {
        let task: TaskSpec = serde_json::from_str(r#"{"title":"A","estimatedHours":2.5}"#).unwrap();
        assert_eq!(task.due_date, None);
        assert!(task.dependencies.is_empty());

        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("dueDate"));
    }
}
