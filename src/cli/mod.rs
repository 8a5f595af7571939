//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Task | Task descriptors | `task add`, `task list`, `task remove` |
//! | Schedule | Engine runs | `schedule`, `check` |
//! | History | Saved schedules | `last`, `show`, `history` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output, including engine events:
//! ```bash
//! taskplan --verbose schedule
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod input;
mod task;
mod schedule;

pub use app::{Cli, Commands, run};
pub use input::TaskInput;
pub use output::{Output, OutputFormat};
