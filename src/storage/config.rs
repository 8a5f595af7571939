//! Configuration handling for taskplan
//!
//! Configuration is stored in `.taskplan/config.toml` (project) and
//! `~/.config/taskplan/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DEFAULT_WORKING_HOURS_PER_DAY;

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".taskplan";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Daily capacity used to turn effort into days
    pub working_hours_per_day: u32,

    /// Save successful schedules to the history file
    pub save_history: bool,

    /// Number of saved schedules to keep (0 keeps everything)
    pub history_limit: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            working_hours_per_day: DEFAULT_WORKING_HOURS_PER_DAY,
            save_history: true,
            history_limit: 20,
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Daily capacity for directories outside any project
    pub working_hours_per_day: Option<u32>,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        let config = Self {
            project,
            global,
            project_root,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        let config = Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the scheduler cannot work with
    fn validate(&self) -> Result<(), ConfigError> {
        if self.project.working_hours_per_day == 0 {
            return Err(ConfigError::Invalid(
                "working_hours_per_day must be greater than 0".to_string(),
            ));
        }
        if self.global.working_hours_per_day == Some(0) {
            return Err(ConfigError::Invalid(
                "global working_hours_per_day must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Daily capacity: project setting inside a project, else the global
    /// setting, else the built-in default
    pub fn working_hours_per_day(&self) -> u32 {
        if self.is_in_project() {
            self.project.working_hours_per_day
        } else {
            self.global
                .working_hours_per_day
                .unwrap_or(DEFAULT_WORKING_HOURS_PER_DAY)
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "taskplan", "taskplan").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Finds and loads project configuration
    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for a `.taskplan/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if we're in a taskplan project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }
}
