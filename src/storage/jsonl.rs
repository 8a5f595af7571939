//! JSONL storage for scheduler tasks
//!
//! Tasks are stored in `.taskplan/tasks.jsonl` with one JSON object per line,
//! in the order they were added. Titles are unique within the store.
//! Uses file locking for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::config::PROJECT_DIR;
use crate::domain::TaskSpec;

/// Reads a JSONL file under a shared lock, one `T` per non-empty line
pub(crate) fn read_lines<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open {} store: {}", what, path.display()))?;

    // Acquire shared lock for reading
    file.lock_shared()
        .with_context(|| format!("Failed to acquire read lock on {} store", what))?;

    let reader = BufReader::new(&file);
    let mut items = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

        if line.trim().is_empty() {
            continue;
        }

        let item: T = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse {} at line {}", what, line_num + 1))?;
        items.push(item);
    }

    // Lock is released when file is dropped
    Ok(items)
}

/// Rewrites a JSONL file atomically (temp file + rename) under an exclusive lock
pub(crate) fn write_lines<T: serde::Serialize>(path: &Path, items: &[T], what: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Write to temp file first
    let temp_path = path.with_extension("jsonl.tmp");

    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .with_context(|| format!("Failed to acquire write lock on {} store", what))?;

        let mut writer = BufWriter::new(&file);

        for item in items {
            let line = serde_json::to_string(item)
                .with_context(|| format!("Failed to serialize {}", what))?;
            writeln!(writer, "{}", line).with_context(|| format!("Failed to write {}", what))?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to flush {} store", what))?;
    }

    // Atomic rename
    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}

/// Store for scheduler task descriptors in JSONL format
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(PROJECT_DIR).join("tasks.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all tasks in stored order
    ///
    /// If a title occurs on several lines the last line wins, keeping the
    /// position of the first.
    pub fn read_all(&self) -> Result<Vec<TaskSpec>> {
        let lines: Vec<TaskSpec> = read_lines(&self.path, "task")?;

        let mut tasks: Vec<TaskSpec> = Vec::with_capacity(lines.len());
        for task in lines {
            match tasks.iter_mut().find(|t| t.title == task.title) {
                Some(existing) => *existing = task,
                None => tasks.push(task),
            }
        }

        Ok(tasks)
    }

    /// Writes all tasks to the store (full rewrite)
    pub fn write_all(&self, tasks: &[TaskSpec]) -> Result<()> {
        write_lines(&self.path, tasks, "task")
    }

    /// Replaces the whole task set, collapsing duplicate titles (last wins)
    pub fn replace_all(&self, tasks: &[TaskSpec]) -> Result<usize> {
        let mut unique: Vec<TaskSpec> = Vec::with_capacity(tasks.len());
        for task in tasks {
            match unique.iter_mut().find(|t| t.title == task.title) {
                Some(existing) => *existing = task.clone(),
                None => unique.push(task.clone()),
            }
        }

        self.write_all(&unique)?;
        Ok(unique.len())
    }

    /// Inserts a task, or replaces the task with the same title in place
    ///
    /// Returns true if an existing task was replaced.
    pub fn upsert(&self, task: &TaskSpec) -> Result<bool> {
        let mut tasks = self.read_all()?;

        let replaced = match tasks.iter_mut().find(|t| t.title == task.title) {
            Some(existing) => {
                *existing = task.clone();
                true
            }
            None => {
                tasks.push(task.clone());
                false
            }
        };

        self.write_all(&tasks)?;
        Ok(replaced)
    }

    /// Removes a task by title
    pub fn remove(&self, title: &str) -> Result<bool> {
        let mut tasks = self.read_all()?;
        let len_before = tasks.len();
        tasks.retain(|t| t.title != title);

        let removed = tasks.len() != len_before;
        if removed {
            self.write_all(&tasks)?;
        }
        Ok(removed)
    }
}
