//! Task files given on the command line
//!
//! A task file is JSON, YAML or TOML, chosen by extension. JSON and YAML
//! files may hold either a bare list of tasks or a request object with
//! `tasks` and an optional `workingHoursPerDay`; TOML files are always a
//! request object (`[[tasks]]` tables).

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::domain::TaskSpec;

/// Tasks loaded from a file, plus the capacity the file asks for
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,

    #[serde(default, alias = "working_hours_per_day")]
    pub working_hours_per_day: Option<u32>,
}

impl From<Vec<TaskSpec>> for TaskInput {
    fn from(tasks: Vec<TaskSpec>) -> Self {
        Self {
            tasks,
            working_hours_per_day: None,
        }
    }
}

/// Supported task file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(FileFormat::Json),
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("toml") => Ok(FileFormat::Toml),
            _ => bail!(
                "Unsupported task file '{}': expected a .json, .yaml, .yml or .toml extension",
                path.display()
            ),
        }
    }
}

/// Loads a task file
pub fn load(path: &Path) -> Result<TaskInput> {
    let format = FileFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read task file: {}", path.display()))?;

    parse(&content, format).with_context(|| format!("Failed to parse task file: {}", path.display()))
}

fn parse(content: &str, format: FileFormat) -> Result<TaskInput> {
    let input: TaskInput = match format {
        FileFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(content)?;
            if value.is_array() {
                serde_json::from_value::<Vec<TaskSpec>>(value)?.into()
            } else {
                serde_json::from_value(value)?
            }
        }
        FileFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(content)?;
            if value.is_sequence() {
                serde_yaml::from_value::<Vec<TaskSpec>>(value)?.into()
            } else {
                serde_yaml::from_value(value)?
            }
        }
        FileFormat::Toml => toml::from_str(content)?,
    };

    Ok(input)
}
