//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::PROJECT_DIR;
use super::{Config, HistoryStore, TaskStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a taskplan project. Run 'taskplan init' first.")]
    NotInProject,
}

/// A taskplan project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&project_dir).with_context(|| {
            format!("Failed to create {} directory: {}", PROJECT_DIR, project_dir.display())
        })?;

        // Create default config
        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# taskplan configuration

# Hours of work per calendar day, used to turn estimates into days
working_hours_per_day = 8

# Save successful schedules to schedules.jsonl
save_history = true

# Number of saved schedules to keep (0 keeps everything)
history_limit = 20
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // Create .gitignore for the project directory
        let gitignore_path = project_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Schedules are regenerated from tasks.jsonl
schedules.jsonl

# Interrupted writes
*.tmp
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .taskplan directory path
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task store
    pub fn task_store(&self) -> TaskStore {
        TaskStore::for_project(&self.root)
    }

    /// Returns the schedule history store
    pub fn history_store(&self) -> HistoryStore {
        HistoryStore::for_project(&self.root)
    }
}
