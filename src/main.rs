//! taskplan - Dependency-aware task scheduling

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = taskplan::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
