//! CLI behavior tests: exit codes, output formats, failure signals.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn prepost_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_prepost"))
}

/// Two uploads sharing respondent 101; 102 and 103 are one-sided.
fn write_uploads(dir: &TempDir) -> (PathBuf, PathBuf) {
    let pre = dir.path().join("pre.csv");
    let post = dir.path().join("post.csv");
    fs::write(
        &pre,
        ",101,102\n1,はい,いいえ\n2,いいえ,はい\n3,はい,はい\n",
    )
    .unwrap();
    fs::write(
        &post,
        ",101,103\n1,いいえ,はい\n2,はい,いいえ\n3,はい,いいえ\n",
    )
    .unwrap();
    (pre, post)
}

#[test]
fn no_args_returns_error_not_panic() {
    let mut cmd = prepost_cmd();
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("INITIAL"));
}

#[test]
fn happy_path_prints_cohort_views() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cohort factor trend"))
        .stdout(predicate::str::contains("Cohort total trend"))
        .stdout(predicate::str::contains("Cohort item trend"));
}

#[test]
fn respondent_flag_adds_per_respondent_views() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post).arg("--respondent").arg("101");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Factor scores - respondent 101"))
        .stdout(predicate::str::contains("Item scores - respondent 101"));
}

#[test]
fn json_output_valid() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post).arg("--json").arg("-r").arg("101");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let s = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(s.trim()).expect("valid JSON");
    assert_eq!(parsed["respondents"][0], "101");
    assert!(parsed.get("factorTrend").is_some());
    assert_eq!(parsed["itemComparison"].as_array().unwrap().len(), 16);
}

#[test]
fn list_prints_common_ids() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post).arg("--list");
    cmd.assert()
        .success()
        .stdout(predicate::eq("101\n"));
}

#[test]
fn non_integer_row_label_is_fatal_exit_2() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    fs::write(&pre, ",101\nQ1,はい\n").unwrap();
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("integer"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn no_common_respondents_is_a_neutral_empty_state() {
    let dir = TempDir::new().unwrap();
    let pre = dir.path().join("pre.csv");
    let post = dir.path().join("post.csv");
    fs::write(&pre, ",101\n1,はい\n").unwrap();
    fs::write(&post, ",202\n1,はい\n").unwrap();
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("No common respondents"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn unknown_respondent_exit_2() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post).arg("--respondent").arg("999");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not present"));
}

#[test]
fn missing_file_exit_2() {
    let dir = TempDir::new().unwrap();
    let (_, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(dir.path().join("nonexistent.csv")).arg(&post);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn quiet_mode_prints_totals_only() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post).arg("--quiet");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("101:"))
        .stdout(predicate::str::contains("Cohort").not());
}

#[test]
fn verbose_mode_lists_common_respondents() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post).arg("--verbose");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Common respondents:"));
}

#[test]
fn config_supplies_default_respondent() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    fs::write(
        dir.path().join(".prepostrc.json"),
        r#"{ "respondent": "101" }"#,
    )
    .unwrap();
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Factor scores - respondent 101"));
}

#[test]
fn custom_yes_token_via_config() {
    let dir = TempDir::new().unwrap();
    let pre = dir.path().join("pre.csv");
    let post = dir.path().join("post.csv");
    // English-language uploads with a configured affirmative token.
    fs::write(&pre, ",101\n1,yes\n").unwrap();
    fs::write(&post, ",101\n1,no\n").unwrap();
    fs::write(
        dir.path().join(".prepostrc.json"),
        r#"{ "yesToken": "yes" }"#,
    )
    .unwrap();
    let mut cmd = prepost_cmd();
    cmd.arg(&pre).arg(&post).arg("--json").arg("-r").arg("101");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    let item1 = &parsed["itemComparison"][0];
    assert_eq!(item1["pre"], 1);
    assert_eq!(item1["post"], 0);
    assert_eq!(item1["delta"], -1);
}

#[test]
fn explicit_config_path_not_found_exit_2() {
    let dir = TempDir::new().unwrap();
    let (pre, post) = write_uploads(&dir);
    let mut cmd = prepost_cmd();
    cmd.arg(&pre)
        .arg(&post)
        .arg("--config")
        .arg(dir.path().join("missing.json"));
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}
