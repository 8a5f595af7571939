//! # Storage Layer
//!
//! Persistence for taskplan with git-friendly file formats. The scheduling
//! engine never touches these; the CLI loads tasks from here, runs the
//! engine and saves the result.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one JSON per line) | `.taskplan/tasks.jsonl` |
//! | Schedules | JSONL (append-only) | `.taskplan/schedules.jsonl` |
//! | Config | TOML | `.taskplan/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - Both stores use file locking (`fs2`) for concurrent access
//! - Full rewrites are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a taskplan project
//! - [`TaskStore`] - Read/write task descriptors as JSONL
//! - [`HistoryStore`] - Append and query saved schedules
//! - [`Config`] - Project and global configuration

mod jsonl;
mod history;
mod config;
mod project;

pub use jsonl::TaskStore;
pub use history::{HistoryStore, ScheduleRecord, StoreError};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat as ConfigOutputFormat, ProjectConfig, PROJECT_DIR};
pub use project::{Project, ProjectError};
