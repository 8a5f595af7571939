//! CLI integration tests for taskplan
//!
//! These tests drive the binary end to end: project setup, task management,
//! schedule generation from files and from the project, and history.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const START: &str = "2026-10-18";

/// Get a command instance for the taskplan binary
fn taskplan_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("taskplan"));
    cmd.env_remove("TASKPLAN_HOURS_PER_DAY").env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory and initialize a taskplan project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    taskplan_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Writes a task file into `dir`
fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Runs a command in `dir` and parses its stdout as JSON
fn json_output(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = taskplan_cmd()
        .current_dir(dir)
        .args(args)
        .args(["--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(stdout.trim()).unwrap()
}

fn add_task(dir: &Path, args: &[&str]) {
    taskplan_cmd()
        .current_dir(dir)
        .args(["task", "add"])
        .args(args)
        .assert()
        .success();
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    taskplan_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized taskplan project"));

    assert!(dir.path().join(".taskplan").is_dir());
    assert!(dir.path().join(".taskplan/config.toml").is_file());
    assert!(dir.path().join(".taskplan/.gitignore").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    taskplan_cmd().arg("init").arg(dir.path()).assert().success();
    taskplan_cmd().arg("init").arg(dir.path()).assert().success();
}

// =============================================================================
// Task Tests
// =============================================================================

#[test]
fn test_task_add_and_list() {
    let dir = setup_project();

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Design", "--hours", "6", "--due", "2026-11-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task 'Design'"));

    add_task(dir.path(), &["Build", "--hours", "24", "--dep", "Design"]);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Design"))
        .stdout(predicate::str::contains("2026-11-02"))
        .stdout(predicate::str::contains("Build"));

    let tasks = json_output(dir.path(), &["task", "list"]);
    assert_eq!(tasks.as_array().unwrap().len(), 2);
    assert_eq!(tasks[1]["dependencies"][0], "Design");
}

#[test]
fn test_task_add_replaces_same_title() {
    let dir = setup_project();

    add_task(dir.path(), &["Design", "--hours", "6"]);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Design", "--hours", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task 'Design'"));

    let tasks = json_output(dir.path(), &["task", "list"]);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["estimatedHours"], 10.0);
}

#[test]
fn test_task_add_rejects_invalid_input() {
    let dir = setup_project();

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Design", "--hours", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("estimatedHours"));

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["task", "add", "Design", "--hours", "4", "--due", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid due date"));
}

#[test]
fn test_task_cycles_surface_at_check() {
    let dir = setup_project();
    add_task(dir.path(), &["Loop", "--hours", "4", "--dep", "Loop"]);
    add_task(dir.path(), &["A", "--hours", "4", "--dep", "B"]);
    add_task(dir.path(), &["B", "--hours", "4", "--dep", "A"]);

    let tasks = json_output(dir.path(), &["task", "list"]);
    assert_eq!(tasks.as_array().unwrap().len(), 3);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency cycle detected"));
}

#[test]
fn test_task_remove() {
    let dir = setup_project();
    add_task(dir.path(), &["Design", "--hours", "6"]);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["task", "remove", "Design"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed task 'Design'"));

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["task", "remove", "Design"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn test_task_commands_need_project() {
    let dir = TempDir::new().unwrap();

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("taskplan init"));
}

// =============================================================================
// Schedule Tests
// =============================================================================

#[test]
fn test_schedule_project_tasks() {
    let dir = setup_project();
    add_task(dir.path(), &["Build", "--hours", "16", "--dep", "Design"]);
    add_task(dir.path(), &["Design", "--hours", "8"]);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--start", START])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended order: Design -> Build"))
        .stdout(predicate::str::contains("2026-10-20"));

    let result = json_output(dir.path(), &["schedule", "--start", START, "--no-save"]);
    assert_eq!(result["recommendedOrder"], serde_json::json!(["Design", "Build"]));
    assert_eq!(result["schedule"][0]["startDate"], "2026-10-18");
    assert_eq!(result["schedule"][0]["endDate"], "2026-10-18");
    assert_eq!(result["schedule"][1]["startDate"], "2026-10-19");
    assert_eq!(result["schedule"][1]["endDate"], "2026-10-20");
    assert!(result["errors"].as_array().unwrap().is_empty());
}

#[test]
fn test_schedule_saves_history() {
    let dir = setup_project();
    add_task(dir.path(), &["Design", "--hours", "8"]);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["last"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No schedule saved yet"));

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--start", START])
        .assert()
        .success();

    let record = json_output(dir.path(), &["last"]);
    assert!(record["id"].as_str().unwrap().starts_with("s-"));
    assert_eq!(record["workingHoursPerDay"], 8);
    assert_eq!(record["result"]["recommendedOrder"][0], "Design");

    let history = json_output(dir.path(), &["history"]);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["id"], record["id"]);
}

#[test]
fn test_show_saved_schedule() {
    let dir = setup_project();
    add_task(dir.path(), &["Design", "--hours", "8"]);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--start", START])
        .assert()
        .success();

    let record = json_output(dir.path(), &["last"]);
    let id = record["id"].as_str().unwrap();

    let shown = json_output(dir.path(), &["show", id]);
    assert_eq!(shown, record);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["show", id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Schedule {}", id)))
        .stdout(predicate::str::contains("Recommended order: Design"));

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["show", "s-0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Schedule not found: s-0000000"));

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["show", "not-an-id"])
        .assert()
        .failure();
}

#[test]
fn test_schedule_no_save() {
    let dir = setup_project();
    add_task(dir.path(), &["Design", "--hours", "8"]);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--start", START, "--no-save"])
        .assert()
        .success();

    let record = json_output(dir.path(), &["last"]);
    assert!(record.is_null());
}

#[test]
fn test_schedule_cycle_fails() {
    let dir = setup_project();
    let file = write_file(
        dir.path(),
        "cycle.json",
        r#"[
            {"title": "A", "estimatedHours": 8, "dependencies": ["B"]},
            {"title": "B", "estimatedHours": 8, "dependencies": ["A"]}
        ]"#,
    );

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--start", START, "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency cycle detected"));

    let output = taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--start", START, "--format", "json", "--file"])
        .arg(&file)
        .assert()
        .failure();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let result: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(result["errors"], serde_json::json!(["Dependency cycle detected"]));
    assert!(result["schedule"].as_array().unwrap().is_empty());

    // Rejected schedules are never saved
    assert!(!dir.path().join(".taskplan/schedules.jsonl").exists());
}

#[test]
fn test_schedule_file_outside_project() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "tasks.json",
        r#"[
            {"title": "A", "estimatedHours": 4, "dueDate": "2026-10-28"},
            {"title": "B", "estimatedHours": 4, "dueDate": "2026-10-19"}
        ]"#,
    );

    let result = json_output(
        dir.path(),
        &["schedule", "--start", START, "--file", file.to_str().unwrap()],
    );
    assert_eq!(result["recommendedOrder"], serde_json::json!(["B", "A"]));
    assert!(result["warnings"].as_array().unwrap().is_empty());
    assert!(!dir.path().join(".taskplan").exists());
}

#[test]
fn test_schedule_warns_on_missed_due_date() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "tasks.yaml",
        "- title: A\n  estimatedHours: 40\n  dueDate: 2026-10-19\n",
    );

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--start", START, "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 'A' cannot meet due date"))
        .stdout(predicate::str::contains("2026-10-22"));
}

#[test]
fn test_schedule_dangling_dependency() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "tasks.toml",
        "[[tasks]]\ntitle = \"A\"\nestimated_hours = 8\ndependencies = [\"Nonexistent\"]\n",
    );

    let result = json_output(
        dir.path(),
        &["schedule", "--start", START, "--file", file.to_str().unwrap()],
    );
    assert_eq!(result["recommendedOrder"], serde_json::json!(["A"]));
    assert!(result["errors"].as_array().unwrap().is_empty());
}

#[test]
fn test_schedule_capacity_precedence() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "tasks.json",
        r#"{"workingHoursPerDay": 4, "tasks": [{"title": "A", "estimatedHours": 8}]}"#,
    );
    let path = file.to_str().unwrap();

    // File capacity: 8h at 4h/day is two days
    let result = json_output(dir.path(), &["schedule", "--start", START, "--file", path]);
    assert_eq!(result["schedule"][0]["endDate"], "2026-10-19");

    // Flag wins over the file
    let result = json_output(
        dir.path(),
        &["schedule", "--start", START, "--hours-per-day", "8", "--file", path],
    );
    assert_eq!(result["schedule"][0]["endDate"], "2026-10-18");
}

#[test]
fn test_schedule_rejects_zero_capacity() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "tasks.json",
        r#"[{"title": "A", "estimatedHours": 8}]"#,
    );

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--hours-per-day", "0", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("workingHoursPerDay"));
}

#[test]
fn test_schedule_save_tasks_replaces_store() {
    let dir = setup_project();
    add_task(dir.path(), &["Old", "--hours", "2"]);
    let file = write_file(
        dir.path(),
        "tasks.json",
        r#"[{"title": "New", "estimatedHours": 3}]"#,
    );

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule", "--start", START, "--save-tasks", "--file"])
        .arg(&file)
        .assert()
        .success();

    let tasks = json_output(dir.path(), &["task", "list"]);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "New");
}

#[test]
fn test_schedule_needs_input() {
    let dir = TempDir::new().unwrap();

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["schedule"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_acyclic_and_cyclic() {
    let dir = TempDir::new().unwrap();
    let ok = write_file(
        dir.path(),
        "ok.json",
        r#"[
            {"title": "Ship", "estimatedHours": 1, "dependencies": ["Test"]},
            {"title": "Test", "estimatedHours": 1}
        ]"#,
    );
    let bad = write_file(
        dir.path(),
        "bad.json",
        r#"[{"title": "Loop", "estimatedHours": 1, "dependencies": ["Loop"]}]"#,
    );

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["check", "--file"])
        .arg(&ok)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended order: Test -> Ship"));

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["check", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency cycle detected"));
}

#[test]
fn test_engine_warnings_reach_stderr_without_verbose() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "tasks.json",
        r#"[{"title": "A", "estimatedHours": 1}, {"title": "A", "estimatedHours": 2}]"#,
    );

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["check", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate task titles"))
        .stderr(predicate::str::contains("[verbose").not());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "tasks.json", r#"[{"title": "A", "estimatedHours": 1}]"#);

    taskplan_cmd()
        .current_dir(dir.path())
        .args(["--verbose", "check", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:input]"));
}
