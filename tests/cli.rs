use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("askdb").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: askdb <COMMAND>"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("Options:"))
        .stdout(predicate::str::contains("--help"))
        .stdout(predicate::str::contains("--version"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("askdb").unwrap();
    cmd.arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: askdb serve"))
        .stdout(predicate::str::contains("--port <PORT>"))
        .stdout(predicate::str::contains("--db <DB>"))
        .stdout(predicate::str::contains("--log-dir <LOG_DIR>"));
}

#[test]
fn test_cli_ask_help() {
    let mut cmd = Command::cargo_bin("askdb").unwrap();
    cmd.arg("ask")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: askdb ask"))
        .stdout(predicate::str::contains("<QUESTION>"))
        .stdout(predicate::str::contains("--db <DB>"));
}

#[test]
fn test_cli_no_command() {
    // Running without a command shows usage on stderr and exits non-zero.
    let mut cmd = Command::cargo_bin("askdb").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage: askdb <COMMAND>"));
}

#[test]
fn test_cli_serve_missing_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("askdb").unwrap();
    cmd.arg("serve")
        .arg("--db")
        .arg(dir.path().join("does_not_exist.db"))
        .arg("--log-dir")
        .arg(dir.path().join("logs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open database"));
}
