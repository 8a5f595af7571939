//! Structural validation of schedule requests
//!
//! The engine assumes well-formed input. Callers run [`ScheduleRequest::validate`]
//! first and refuse to schedule anything that fails it.

use std::fmt;

use thiserror::Error;

use super::schedule::ScheduleRequest;

/// Smallest accepted effort estimate, in hours
pub const MIN_ESTIMATED_HOURS: f64 = 0.1;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path to the field, e.g. `tasks[2].estimatedHours`
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid schedule request: {}", join(.0))]
    Invalid(Vec<FieldError>),
}

impl ValidationError {
    /// Returns every rejected field
    pub fn fields(&self) -> &[FieldError] {
        match self {
            ValidationError::Invalid(fields) => fields,
        }
    }
}

fn join(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ScheduleRequest {
    /// Checks the request is fit for the engine, collecting all violations
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.working_hours_per_day == 0 {
            errors.push(FieldError::new(
                "workingHoursPerDay",
                "must be greater than 0",
            ));
        }

        for (i, task) in self.tasks.iter().enumerate() {
            if task.title.trim().is_empty() {
                errors.push(FieldError::new(format!("tasks[{}].title", i), "is required"));
            }

            if !task.estimated_hours.is_finite() || task.estimated_hours < MIN_ESTIMATED_HOURS {
                errors.push(FieldError::new(
                    format!("tasks[{}].estimatedHours", i),
                    format!("must be at least {}", MIN_ESTIMATED_HOURS),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(errors))
        }
    }
}
