//! End-to-end checks of the `sheet-cli` binary that need no network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn sheet_cli() -> Command {
    let mut cmd = Command::cargo_bin("sheet-cli").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    sheet_cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("normalize"))
        .stdout(predicate::str::contains("listen"))
        .stdout(predicate::str::contains("public"));
}

#[test]
fn init_writes_profile() {
    let dir = tempdir().unwrap();

    sheet_cli()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["init", "--access-key", "ak_live_123", "--user-id", "u-1"])
        .assert()
        .success();

    let profile = std::fs::read_to_string(dir.path().join("profile.json")).unwrap();
    let profile: serde_json::Value = serde_json::from_str(&profile).unwrap();
    assert_eq!(profile["access_key"], "ak_live_123");
    assert_eq!(profile["user_id"], "u-1");
}

#[test]
fn init_twice_needs_force() {
    let dir = tempdir().unwrap();
    let init = |force: bool| {
        let mut cmd = sheet_cli();
        cmd.arg("--data-dir")
            .arg(dir.path())
            .args(["init", "--access-key", "ak"]);
        if force {
            cmd.arg("--force");
        }
        cmd.assert()
    };

    init(false).success();
    init(false).failure();
    init(true).success();
}

#[test]
fn row_commands_need_a_profile() {
    let dir = tempdir().unwrap();

    sheet_cli()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["row", "list", "orders"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sheet-cli init"));
}

#[test]
fn status_reports_missing_profile() {
    let dir = tempdir().unwrap();

    sheet_cli()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("NOT INITIALIZED"));
}

#[test]
fn status_redacts_access_key() {
    let dir = tempdir().unwrap();
    sheet_cli()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["init", "--access-key", "ak_live_secret"])
        .assert()
        .success();

    sheet_cli()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.gshell.cloud"))
        .stdout(predicate::str::contains("ak_live_secret").not());
}

#[test]
fn normalize_reads_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("rows.json");
    std::fs::write(&file, r#"[{"tags":"a, b","name":"x"}]"#).unwrap();

    sheet_cli()
        .args(["normalize", "--list", "tags", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""a""#))
        .stdout(predicate::str::contains(r#""b""#))
        .stdout(predicate::str::contains(r#""name": "x""#));
}

#[test]
fn normalize_reads_stdin() {
    sheet_cli()
        .args(["normalize", "--types", r#"{"friends":"list"}"#, "--file", "-"])
        .write_stdin(r#"[{"friends":"[\"ann\"]"}]"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("ann"));
}
