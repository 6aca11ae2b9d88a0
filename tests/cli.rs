use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn yarrow_run_quickstart() {
    let mut cmd = Command::cargo_bin("yarrow").expect("binary exists");
    cmd.arg("run").arg("demos/quickstart.yr");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3.5"))
        .stdout(predicate::str::contains("4"));
}

#[test]
fn yarrow_eval_snippet() {
    let mut cmd = Command::cargo_bin("yarrow").expect("binary exists");
    cmd.arg("eval").arg("3 + 4 * 2");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("11"));
}

#[test]
fn yarrow_runs_script_from_another_directory() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("sums.yr");
    fs::write(&script, "# running totals\n2 ^ 10;\n1 + 1\n").expect("write script");

    let mut cmd = Command::cargo_bin("yarrow").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1024"))
        .stdout(predicate::str::contains("2"));
}

#[test]
fn yarrow_reports_unmatched_paren_with_position() {
    let mut cmd = Command::cargo_bin("yarrow").expect("binary exists");
    cmd.arg("eval").arg("2 + 2)");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unmatched closing parenthesis"))
        .stderr(predicate::str::contains("line 1"));
}
