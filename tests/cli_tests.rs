mod common;

use std::path::Path;
use std::process::Command;

use common::*;
use serde_json::json;

fn cli_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_api-harness"))
}

const HEALTH_SUITE: &str = r#"
name: health
cases:
  - name: test_health
    endpoint: /health
  - name: test_login
    method: POST
    endpoint: /login
    request:
      json:
        username: u
        password: hunter2
"#;

/// Config aimed at a closed local port so every request fails fast
fn write_unreachable_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("harness.json");
    let config = json!({
        "base_url": "http://127.0.0.1:1",
        "timeout": 2.0,
        "retry_attempts": 0,
        "retry_delay": 0.0,
        "log_file": dir.join("api.log"),
    });
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let output = cli_command().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Run API test suites"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("init-config"));
    assert!(stdout.contains("validate"));
}

#[test]
fn test_cli_version() {
    let output = cli_command().arg("--version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("api-harness"));
}

#[test]
fn test_cli_run_help() {
    let output = cli_command().args(["run", "--help"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--env"));
    assert!(stdout.contains("--config-dir"));
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--fail-fast"));
}

#[test]
fn test_cli_validate_file() {
    let dir = create_test_dir();
    write_suite(dir.path(), "health.yaml", HEALTH_SUITE);

    let output = cli_command()
        .args(["validate", dir.path().join("health.yaml").to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("is valid, 2 cases"));
}

#[test]
fn test_cli_validate_directory() {
    let dir = create_test_dir();
    write_suite(dir.path(), "health.yaml", HEALTH_SUITE);
    write_suite(
        dir.path(),
        "users.yml",
        "name: users\ncases:\n  - name: t\n    endpoint: /users\n",
    );

    let output = cli_command()
        .args(["validate", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 suites validated, 3 cases"));
}

#[test]
fn test_cli_validate_invalid_suite() {
    let dir = create_test_dir();
    write_suite(
        dir.path(),
        "bad.yaml",
        "name: bad\ncases:\n  - name: t\n    endpoint: /x\n    method: FETCH\n",
    );

    let output = cli_command()
        .args(["validate", dir.path().join("bad.yaml").to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_validate_missing_path() {
    let output = cli_command()
        .args(["validate", "/nonexistent/suites"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Path not found"));
}

#[test]
fn test_cli_init_config() {
    let dir = create_test_dir();
    let config_dir = dir.path().join("config");

    let output = cli_command()
        .args([
            "init-config",
            "--env",
            "qa",
            "--config-dir",
            config_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let written = std::fs::read_to_string(config_dir.join("qa.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["base_url"], "http://localhost:8000");

    let output = cli_command()
        .args([
            "init-config",
            "--env",
            "qa",
            "--config-dir",
            config_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("already exists"));
}

#[test]
fn test_cli_run_records_errors_and_exports_reports() {
    let dir = create_test_dir();
    write_suite(dir.path(), "health.yaml", HEALTH_SUITE);
    let config = write_unreachable_config(dir.path());
    let reports = dir.path().join("reports");

    let output = cli_command()
        .args([
            "run",
            dir.path().join("health.yaml").to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--output-dir",
            reports.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total: 2"));
    assert!(stdout.contains("Errors: 2"));

    let csv = std::fs::read_to_string(reports.join("test_report.csv")).unwrap();
    assert_eq!(csv.split("\r\n").filter(|l| !l.is_empty()).count(), 3);
    assert!(csv.contains("test_health,health,ERROR,"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(reports.join("test_report.json")).unwrap())
            .unwrap();
    assert_eq!(report["metrics"]["error_tests"], 2);
    assert_eq!(report["results"].as_array().unwrap().len(), 2);

    let log = std::fs::read_to_string(dir.path().join("api.log")).unwrap();
    assert_eq!(log.matches("REQUEST:").count(), 2);
    assert!(!log.contains("hunter2"));
}

#[test]
fn test_cli_run_with_bad_config() {
    let dir = create_test_dir();
    write_suite(dir.path(), "health.yaml", HEALTH_SUITE);
    let config = dir.path().join("bad.json");
    std::fs::write(&config, r#"{"timeout": -1}"#).unwrap();

    let output = cli_command()
        .args([
            "run",
            dir.path().join("health.yaml").to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("timeout"));
}
