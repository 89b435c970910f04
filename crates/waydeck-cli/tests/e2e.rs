//! End-to-end tests for the Waydeck CLI.
//!
//! Tests invoke the `waydeck` binary as a subprocess and check its output.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const NOW: &str = "2025-12-10T12:00:00Z";

fn waydeck() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_waydeck"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    waydeck().args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn write_file(dir: &Path, name: &str, len: usize) -> String {
    let path = dir.join(name);
    fs::write(&path, vec![b'x'; len]).unwrap();
    path.to_string_lossy().into_owned()
}

// === Dates ===

#[test]
fn e2e_date_styles() {
    let output = run(&["date", "2025-12-01"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1 Dec 2025");

    let output = run(&["date", "2025-12-01T14:30:00Z", "--style", "datetime"]);
    assert_eq!(stdout(&output), "1 Dec 2025 at 14:30");

    let output = run(&["date", "2025-12-01", "--style", "short"]);
    assert_eq!(stdout(&output), "1 Dec");
}

#[test]
fn e2e_malformed_date_fails() {
    let output = run(&["date", "the day after tomorrow"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ISO-8601"), "stderr: {stderr}");
}

#[test]
fn e2e_range_variants() {
    let both = run(&["range", "--start", "2025-12-01", "--end", "2025-12-15"]);
    assert_eq!(stdout(&both), "1 Dec – 15 Dec 2025");

    let from = run(&["range", "--start", "2025-12-01"]);
    assert_eq!(stdout(&from), "From 1 Dec 2025");

    let unset = run(&["range"]);
    assert_eq!(stdout(&unset), "Dates not set");
}

#[test]
fn e2e_duration_json() {
    let output = run(&[
        "--json", "duration", "--start", "2025-12-01", "--end", "2025-12-15",
    ]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["duration_days"], 15);

    let output = run(&["--json", "duration", "--start", "2025-12-01"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["duration_days"].is_null());
}

#[test]
fn e2e_active_and_status_with_fixed_now() {
    let active = run(&[
        "--now", NOW, "active", "--start", "2025-12-09", "--end", "2025-12-11",
    ]);
    assert_eq!(stdout(&active), "true");

    let past = run(&[
        "--now", NOW, "status", "--start", "2025-11-01", "--end", "2025-11-08",
    ]);
    assert_eq!(stdout(&past), "completed");

    let archived = run(&[
        "--now", NOW, "status", "--start", "2025-12-09", "--end", "2025-12-11", "--archived",
    ]);
    assert_eq!(stdout(&archived), "archived");
}

#[test]
fn e2e_status_json_summary() {
    let output = run(&[
        "--now", NOW, "--json", "status", "--start", "2025-12-08", "--end", "2025-12-12",
    ]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "active");
    assert_eq!(value["duration_days"], 5);
    assert_eq!(value["date_range"], "8 Dec – 12 Dec 2025");
}

#[test]
fn e2e_relative_time() {
    let output = run(&["--now", NOW, "relative", "2025-12-10T09:00:00Z"]);
    assert_eq!(stdout(&output), "about 3 hours ago");

    let output = run(&["relative", "2020-01-01"]);
    assert!(stdout(&output).ends_with("ago"));
}

#[test]
fn e2e_rejects_bad_now() {
    let output = run(&["--now", "yesterday", "active"]);
    assert!(!output.status.success());
}

// === Uploads ===

#[test]
fn e2e_validate_accepts_small_pdf() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "ticket.pdf", 2048);

    let output = run(&["validate", &path]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "ok");
}

#[test]
fn e2e_validate_rejects_wrong_type() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "animation.gif", 10);

    let output = run(&["validate", &path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Invalid file type"));
}

#[test]
fn e2e_validate_declared_mime_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "scan.bin", 10);

    let output = run(&["validate", &path, "--mime", "image/png"]);
    assert!(output.status.success());
}

#[test]
fn e2e_validate_size_limit_flag() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "photo.png", 3 * 1024 * 1024);

    let output = run(&["--json", "validate", &path, "--max-size-mb", "2"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["valid"], false);
    assert_eq!(value["size"], "3.0 MB");
    assert!(value["error"]
        .as_str()
        .unwrap()
        .contains("Maximum size: 2MB"));
}

#[test]
fn e2e_validate_rejects_nonsense_size_limit() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "t.pdf", 0);

    for limit in ["NaN", "inf"] {
        let output = run(&["validate", &path, "--max-size-mb", limit]);
        assert_eq!(output.status.code(), Some(2), "limit {limit}");
        assert!(stdout(&output).is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("--max-size-mb"), "stderr: {stderr}");
    }
}

#[test]
fn e2e_validate_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "photo.png", 4096);
    let config = dir.path().join("waydeck.toml");
    fs::write(&config, "[avatar]\nmax_size_mb = 0.001\n").unwrap();
    let config = config.to_string_lossy().into_owned();

    let doc = run(&["--config", &config, "validate", &path]);
    assert!(doc.status.success());

    let avatar = run(&["--config", &config, "validate", &path, "--avatar"]);
    assert_eq!(avatar.status.code(), Some(1));
    assert!(stdout(&avatar).contains("Maximum size: 0.001MB"));
}

#[test]
fn e2e_validate_missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "ticket.pdf", 10);
    let missing = dir.path().join("nope.toml");

    let output = run(&[
        "--config",
        missing.to_str().unwrap(),
        "validate",
        &path,
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn e2e_size_formatting() {
    assert_eq!(stdout(&run(&["size", "512"])), "512 B");
    assert_eq!(stdout(&run(&["size", "2048"])), "2.0 KB");
    assert_eq!(stdout(&run(&["size", "2621440"])), "2.5 MB");
}

// === Airports ===

#[test]
fn e2e_airport_lookup() {
    let output = run(&["airport", "Changi Airport"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "SIN");

    let output = run(&["--json", "airport", "Nowhere Regional"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["code"].is_null());
}
