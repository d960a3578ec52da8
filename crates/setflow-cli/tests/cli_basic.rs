//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! (SETFLOW_ENV=dev) and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "setflow-cli", "--"])
        .args(args)
        .env("SETFLOW_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Routine names unique per test run, so repeated runs don't collide.
fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", std::process::id())
}

#[test]
fn test_routine_create_and_list() {
    let name = unique("e2e-list");
    let (stdout, _, code) = run_cli(&["routine", "create", &name]);
    assert_eq!(code, 0, "routine create failed");
    assert!(stdout.contains("created"));

    let (stdout, _, code) = run_cli(&["routine", "list"]);
    assert_eq!(code, 0, "routine list failed");
    assert!(stdout.contains(&name));
}

#[test]
fn test_routine_list_json_is_an_array() {
    let (stdout, _, code) = run_cli(&["routine", "list", "--json"]);
    assert_eq!(code, 0, "routine list --json failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("list output is not JSON");
    assert!(parsed.is_array());
}

#[test]
fn test_routine_add_and_show() {
    let name = unique("e2e-show");
    run_cli(&["routine", "create", &name]);
    let (_, _, code) = run_cli(&[
        "routine", "add", &name, "Plank", "--sets", "2", "--duration", "30", "--rest", "10",
    ]);
    assert_eq!(code, 0, "routine add failed");

    let (stdout, _, code) = run_cli(&["routine", "show", &name, "--json"]);
    assert_eq!(code, 0, "routine show failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let exercises = parsed["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0]["name"], "Plank");
    assert_eq!(exercises[0]["duration_secs"], 30);
}

#[test]
fn test_routine_export_import_round_trip() {
    let name = unique("e2e-export");
    run_cli(&["routine", "create", &name]);
    run_cli(&["routine", "add", &name, "Push-ups", "--sets", "3"]);

    let dir = std::env::temp_dir();
    let path = dir.join(format!("{name}.json"));
    let path_str = path.to_str().unwrap();

    let (_, _, code) = run_cli(&["routine", "export", &name, path_str]);
    assert_eq!(code, 0, "routine export failed");

    let reimported = unique("e2e-import");
    let (stdout, _, code) =
        run_cli(&["routine", "import", path_str, "--name", &reimported]);
    assert_eq!(code, 0, "routine import failed");
    assert!(stdout.contains("1 exercises"));
}

#[test]
fn test_run_unknown_routine_fails() {
    let (_, stderr, code) = run_cli(&["run", "no-such-routine-xyz", "--json"]);
    assert!(code != 0, "run unexpectedly succeeded");
    assert!(stderr.contains("no routine matching"));
}

#[test]
fn test_run_completes_a_short_timed_routine() {
    let name = unique("e2e-run");
    run_cli(&["routine", "create", &name]);
    run_cli(&[
        "routine", "add", &name, "Sprint", "--sets", "1", "--duration", "1", "--rest", "0",
    ]);

    let (stdout, _, code) = run_cli(&["run", &name, "--json"]);
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("\"type\":\"SessionStarted\""));
    assert!(stdout.contains("\"type\":\"SessionCompleted\""));
}

#[test]
fn test_config_get() {
    let (_, _, code) = run_cli(&["config", "get", "session.tick_interval_ms"]);
    assert_eq!(code, 0, "config get failed");
}

#[test]
fn test_config_set() {
    let (stdout, _, code) = run_cli(&["config", "set", "ui.show_progress_dots", "true"]);
    assert_eq!(code, 0, "config set failed");
    assert!(stdout.contains("ok"));
}

#[test]
fn test_config_list() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    assert!(stdout.contains("tick_interval_ms"));
}

#[test]
fn test_completions_generate() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0, "completions failed");
    assert!(stdout.contains("setflow-cli"));
}
