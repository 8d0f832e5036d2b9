//! Tests for the offline `shiftboard render` command

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

const RESULT: &str = r#"{
  "schedules": [
    {
      "workerId": "W001",
      "workerName": "Aiko",
      "skills": [{"skillId": 200, "skillName": "Pick Paperless", "skillLevel": 4}],
      "shifts": [{"shiftId": 1, "shiftName": "Night", "startTime": "22:00", "endTime": "06:00"}],
      "assignments": [
        {"id": 1, "taskId": "8000", "taskName": "Pick Paperless",
         "startTime": "2025-03-10T22:00:00", "endTime": "2025-03-11T01:00:00", "unitsAssigned": 120},
        {"id": 2, "taskId": "8002", "taskName": "Pack",
         "startTime": "2025-03-10T23:00:00", "endTime": "2025-03-11T02:00:00", "unitsAssigned": 60},
        {"taskName": "Break", "isBreak": true,
         "startTime": "2025-03-11T02:00:00", "endTime": "2025-03-11T02:30:00"}
      ]
    }
  ],
  "unassignedTasks": [{"id": 8001, "task_name": "Rebin", "remaining_units": 40}]
}"#;

fn shiftboard(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shiftboard"))
        .current_dir(dir)
        .env_remove("SHIFTBOARD_BASE_URL")
        .env_remove("SHIFTBOARD_TIMEOUT")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn render_table_from_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("result.json"), RESULT).unwrap();

    let output = shiftboard(dir.path(), &["render", "--input", "result.json", "--format", "table"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Aiko (W001)  Pick Paperless  2025-03-10 22:00  2025-03-11 01:00  120"));
    assert!(stdout.contains("Units Unassigned"));
    assert!(stdout.contains("8001"));
}

#[test]
fn render_text_timeline_with_night_shift() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("result.json"), RESULT).unwrap();

    let output = shiftboard(dir.path(), &["render", "-i", "result.json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Assignment Timeline 2025-03-10 08:00"));
    assert!(stdout.contains("Shift: Night: 22:00–06:00+1"));
    assert!(stdout.contains("● 22:00-01:00+1  Pick Paperless (120)"));
    assert!(stdout.contains("   2 |"), "overlapping tasks need two lanes");
}

#[test]
fn render_svg_to_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("result.json"), RESULT).unwrap();

    let output = shiftboard(
        dir.path(),
        &["render", "-i", "result.json", "-f", "svg", "-o", "board.svg", "--no-now"],
    );

    assert!(output.status.success());
    let svg = fs::read_to_string(dir.path().join("board.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Aiko (W001)"));
    assert!(!svg.contains("class=\"now\""));
}

#[test]
fn empty_result_prints_placeholder() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty.json"), "{}").unwrap();

    let output = shiftboard(dir.path(), &["render", "-i", "empty.json", "-f", "svg"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "No assignments");
}

#[test]
fn invalid_json_fails_with_context() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "not json").unwrap();

    let output = shiftboard(dir.path(), &["render", "-i", "bad.json"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid optimization result"));
}

#[test]
fn config_file_moves_the_window() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("result.json"), RESULT).unwrap();
    fs::write(dir.path().join("shiftboard.toml"), "window_start_hour = 20\n").unwrap();

    let output = shiftboard(dir.path(), &["render", "-i", "result.json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Assignment Timeline 2025-03-10 20:00"));
}

#[test]
fn bad_config_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("result.json"), RESULT).unwrap();
    fs::write(dir.path().join("custom.toml"), "window_start_hour = 30\n").unwrap();

    let output = shiftboard(dir.path(), &["--config", "custom.toml", "render", "-i", "result.json"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid config file"));
}
