//! CLI integration tests
//!
//! These tests verify the command-line interface behavior, including:
//! - Command parsing and validation
//! - Registry files written to disk
//! - Output formatting
//! - Exit codes

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn scanner_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_service-scanner"))
}

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/plugin-project")
}

/// Runs the binary with scanner environment variables cleared.
fn run(args: &[&str]) -> Output {
    Command::new(scanner_bin())
        .args(args)
        .env_remove("SERVICE_SCANNER_SERVICES")
        .env_remove("SERVICE_SCANNER_OUTPUT_DIR")
        .env_remove("SERVICE_SCANNER_KEEP_GOING")
        .env_remove("SERVICE_SCANNER_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute service-scanner")
}

fn path_arg(path: &std::path::Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("service-scanner"));
    assert!(stdout.contains("scan"));
    assert!(stdout.contains("check"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("service-scanner"));
}

#[test]
fn test_scan_writes_registry_files() {
    let out = TempDir::new().unwrap();
    let root = fixture_dir();

    let output = run(&[
        "scan",
        &path_arg(&root.join("src")),
        "--classpath",
        &path_arg(&root.join("api")),
        "--services",
        "com.acme.Plugin,com.acme.Codec",
        "--output-dir",
        &path_arg(out.path()),
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let services = out.path().join("META-INF/services");
    assert_eq!(
        fs::read_to_string(services.join("com.acme.Plugin")).unwrap(),
        "com.acme.impl.FooPlugin\ncom.acme.impl.Outer$Inner\n"
    );
    assert_eq!(
        fs::read_to_string(services.join("com.acme.Codec")).unwrap(),
        "com.acme.codec.GzipCodec\n"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Service Scan Result"));
    assert!(stdout.contains("com.acme.Plugin (2)"));
}

#[test]
fn test_scan_json_output() {
    let out = TempDir::new().unwrap();
    let root = fixture_dir();

    let output = run(&[
        "scan",
        &path_arg(&root.join("src")),
        "--classpath",
        &path_arg(&root.join("api")),
        "--services=com.acme.Plugin",
        "-o",
        &path_arg(out.path()),
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["services"]["com.acme.Plugin"],
        serde_json::json!(["com.acme.impl.FooPlugin", "com.acme.impl.Outer$Inner"])
    );
    assert_eq!(report["files"]["written"].as_array().unwrap().len(), 1);
    assert_eq!(report["diagnostic_counts"]["errors"], 0);
}

#[test]
fn test_scan_dry_run_writes_nothing() {
    let out = TempDir::new().unwrap();
    let root = fixture_dir();

    let output = run(&[
        "scan",
        &path_arg(&root.join("src")),
        "--services",
        "com.acme.Plugin",
        "-o",
        &path_arg(out.path()),
        "--dry-run",
    ]);

    assert!(output.status.success());
    assert!(!out.path().join("META-INF").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(Dry Run)"));
    assert!(stdout.contains("Would write: 1"));
}

#[test]
fn test_scan_without_services_warns_and_writes_nothing() {
    let out = TempDir::new().unwrap();

    let output = run(&[
        "scan",
        &path_arg(&fixture_dir().join("src")),
        "-o",
        &path_arg(out.path()),
    ]);

    assert!(output.status.success());
    assert!(!out.path().join("META-INF").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No services added"));
    assert!(stderr.contains("--services=com.example.Service1,com.example.Service2"));
}

#[test]
fn test_scan_services_from_environment() {
    let out = TempDir::new().unwrap();

    let output = Command::new(scanner_bin())
        .args([
            "scan",
            &path_arg(&fixture_dir().join("src")),
            "-o",
            &path_arg(out.path()),
        ])
        .env("SERVICE_SCANNER_SERVICES", "com.acme.Codec")
        .env_remove("SERVICE_SCANNER_OUTPUT_DIR")
        .output()
        .expect("Failed to execute service-scanner");

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(out.path().join("META-INF/services/com.acme.Codec")).unwrap(),
        "com.acme.codec.GzipCodec\n"
    );
}

#[test]
fn test_scan_reports_write_failure_with_exit_code() {
    let out = TempDir::new().unwrap();
    // A plain file where the META-INF directory must go.
    fs::write(out.path().join("META-INF"), "in the way").unwrap();

    let output = run(&[
        "scan",
        &path_arg(&fixture_dir().join("src")),
        "--services",
        "com.acme.Plugin",
        "-o",
        &path_arg(out.path()),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Emission Failed"));
}

#[test]
fn test_scan_invalid_service_name() {
    let output = run(&[
        "scan",
        &path_arg(&fixture_dir().join("src")),
        "--services",
        "com..Broken",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid service name"));
}

#[test]
fn test_scan_missing_input() {
    let output = run(&["scan", "/definitely/not/a/real/path", "--services", "a.B"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_scan_malformed_declaration_file() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("broken.json");
    fs::write(&bad, "{ not json").unwrap();

    let output = run(&["scan", &path_arg(&bad), "--services", "a.B"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_scan_show_config() {
    let output = run(&[
        "scan",
        "--services",
        "com.acme.Plugin",
        "--show-config",
        "--format",
        "json",
    ]);

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["services"], "com.acme.Plugin");
    assert_eq!(config["keep_going"], "false");
}

#[test]
fn test_check_reports_unresolved_references() {
    let output = run(&["check", &path_arg(&fixture_dir().join("src"))]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Declaration Check"));
    assert!(stdout.contains("com.acme.impl.FooPlugin -> com.acme.BasePlugin"));
}

#[test]
fn test_check_with_classpath_yaml() {
    let root = fixture_dir();
    let output = run(&[
        "check",
        &path_arg(&root.join("src")),
        "--classpath",
        &path_arg(&root.join("api")),
        "--format",
        "yaml",
    ]);

    assert!(output.status.success());
    let report: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(report["classpath_types"].as_u64(), Some(3));
    assert_eq!(report["source_types"].as_u64(), Some(7));
    assert!(!report["unresolved"]
        .as_sequence()
        .unwrap()
        .iter()
        .any(|u| u["reference"].as_str() == Some("com.acme.BasePlugin")));
}
