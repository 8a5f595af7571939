//! Saved schedule history
//!
//! Successful schedules are appended to `.taskplan/schedules.jsonl`, oldest
//! first. The newest record is the project's current schedule.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::PROJECT_DIR;
use super::jsonl::{read_lines, write_lines};
use crate::domain::{ScheduleId, ScheduleResult};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Refusing to save a rejected schedule: {0}")]
    Rejected(String),
}

/// A schedule result as saved for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub id: ScheduleId,
    pub created_at: DateTime<Utc>,
    pub working_hours_per_day: u32,
    pub result: ScheduleResult,
}

impl ScheduleRecord {
    /// Wraps a result with a fresh ID and timestamp
    pub fn new(result: ScheduleResult, working_hours_per_day: u32) -> Result<Self> {
        let created_at = Utc::now();
        let content = serde_json::to_vec(&result).context("Failed to serialize schedule")?;

        Ok(Self {
            id: ScheduleId::new(&content, created_at),
            created_at,
            working_hours_per_day,
            result,
        })
    }
}

/// Store for saved schedules in JSONL format
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Creates a new history store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(PROJECT_DIR).join("schedules.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all records, oldest first
    pub fn read_all(&self) -> Result<Vec<ScheduleRecord>> {
        read_lines(&self.path, "schedule")
    }

    /// Returns the most recently saved record
    pub fn latest(&self) -> Result<Option<ScheduleRecord>> {
        Ok(self.read_all()?.pop())
    }

    /// Finds a record by ID
    pub fn get(&self, id: &ScheduleId) -> Result<Option<ScheduleRecord>> {
        Ok(self.read_all()?.into_iter().find(|r| &r.id == id))
    }

    /// Appends a record; rejected schedules are never saved
    pub fn append(&self, record: &ScheduleRecord) -> Result<()> {
        if record.result.is_rejected() {
            return Err(StoreError::Rejected(record.result.errors.join(", ")).into());
        }

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open schedule store: {}", self.path.display()))?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .context("Failed to acquire write lock on schedule store")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(record).context("Failed to serialize schedule")?;
        writeln!(writer, "{}", line).context("Failed to write schedule")?;

        writer.flush().context("Failed to flush schedule store")?;

        Ok(())
    }

    /// Keeps only the newest `limit` records (0 keeps everything)
    ///
    /// Returns the number of records removed.
    pub fn prune(&self, limit: usize) -> Result<usize> {
        if limit == 0 {
            return Ok(0);
        }

        let records = self.read_all()?;
        if records.len() <= limit {
            return Ok(0);
        }

        let removed = records.len() - limit;
        write_lines(&self.path, &records[removed..], "schedule")?;
        Ok(removed)
    }
}
