//! End-to-end tests of the fxpack binary.

#[cfg(unix)]
mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fxpack(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fxpack").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("FXPACK_CONFIG")
        .env_remove("FXPACK_BUILD_ROOT")
        .env_remove("FXPACK_JPACKAGE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn lists_targets() {
    let dir = TempDir::new().unwrap();
    fxpack(&dir)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("build-all"))
        .stdout(predicate::str::contains("clean-and-build-all"))
        .stdout(predicate::str::contains("[runtime-image]"));
}

#[test]
fn requires_a_target() {
    let dir = TempDir::new().unwrap();
    fxpack(&dir).assert().failure();
}

#[test]
fn unknown_target_fails_before_running_anything() {
    let dir = TempDir::new().unwrap();
    fxpack(&dir)
        .args(["build-exe", "build-deb"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown target `build-deb`"))
        .stderr(predicate::str::contains("fxpack --list"));
    assert!(!dir.path().join("build").exists());
}

#[test]
fn missing_archive_reports_input_not_found() {
    let dir = TempDir::new().unwrap();
    fxpack(&dir)
        .args(["--jpackage", "/nonexistent/jpackage", "build-all"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("input not found"))
        .stderr(predicate::str::contains("3 of 3 task(s) failed"));
}

#[test]
fn invalid_manifest_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("fxpack.toml"),
        "[package]\nversion = \"1.0-SNAPSHOT\"\n",
    )
    .unwrap();
    fxpack(&dir)
        .arg("build-portable")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn clean_outputs_runs_without_a_jdk() {
    let dir = TempDir::new().unwrap();
    let leftover = dir.path().join("build/installer/TradingAnalytics.exe");
    std::fs::create_dir_all(leftover.parent().unwrap()).unwrap();
    std::fs::write(&leftover, b"MZ").unwrap();

    fxpack(&dir)
        .env("JAVA_HOME", dir.path().join("no-jdk"))
        .env("PATH", "/nonexistent")
        .arg("clean-outputs")
        .assert()
        .success();
    assert!(!dir.path().join("build/installer").exists());
}

#[test]
fn unwritable_report_path_names_the_report() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("missing-dir/report.json");

    fxpack(&dir)
        .env("JAVA_HOME", dir.path().join("no-jdk"))
        .env("PATH", "/nonexistent")
        .arg("--report-json")
        .arg(&report)
        .arg("clean-outputs")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("writing report to"));
}

#[cfg(unix)]
#[test]
fn writes_json_report() {
    let project = common::Project::new();
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.json");

    fxpack(&dir)
        .arg("--build-root")
        .arg(project.root())
        .arg("--jpackage")
        .arg(common::fake_tool())
        .arg("--report-json")
        .arg(&report)
        .arg("build-portable")
        .assert()
        .success()
        .stdout(predicate::str::contains("All 1 task(s) succeeded"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["tasks"][0]["name"], "build-portable");
    assert_eq!(json["tasks"][0]["status"], "succeeded");
}
