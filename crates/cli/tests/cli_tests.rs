use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("onyx-ext").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Custom backend extensions for Onyx"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("onyx-ext").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_rates_lists_every_tier() {
    let mut cmd = Command::cargo_bin("onyx-ext").unwrap();
    cmd.arg("rates")
        .assert()
        .success()
        .stdout(predicate::str::contains("Basic").and(predicate::str::contains("150%")))
        .stdout(predicate::str::contains("Immersive").and(predicate::str::contains("400%")));
}

#[test]
fn test_cli_rates_json() {
    let mut cmd = Command::cargo_bin("onyx-ext").unwrap();
    let output = cmd.args(["rates", "--json"]).output().unwrap();
    assert!(output.status.success());
    let rates: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rates.as_array().map(Vec::len), Some(4));
    assert_eq!(rates[2]["tier"], "advanced");
    assert_eq!(rates[2]["rate_percent"], 300);
}

#[test]
fn test_cli_report_rejects_unknown_format() {
    let mut cmd = Command::cargo_bin("onyx-ext").unwrap();
    cmd.args(["report", "user-1", "--format", "docx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_pdf_report_requires_output() {
    let mut cmd = Command::cargo_bin("onyx-ext").unwrap();
    cmd.args(["report", "user-1", "--format", "pdf"])
        .env("DATABASE_URL", "postgres://nobody@127.0.0.1:1/none")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}
