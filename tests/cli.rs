use std::fs;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn tonegrader() -> Command {
    let mut cmd = Command::cargo_bin("tonegrader").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn phrases_lists_builtin_bank_with_grades() -> Result<()> {
    let output = tonegrader().arg("phrases").assert().success().get_output().clone();
    let listed: Value = serde_json::from_slice(&output.stdout)?;
    let grades: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["grade"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(grades, vec!["B", "C", "B"]);
    assert_eq!(listed[0]["text"], "你好");
    Ok(())
}

#[test]
fn simulate_prints_a_graded_result() -> Result<()> {
    let output = tonegrader()
        .args(["simulate", "--delay-ms", "0", "--seed", "1"])
        .assert()
        .success()
        .get_output()
        .clone();
    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["listening"], false);
    assert_eq!(report["generation"], 1);
    assert!(!report["spoken_text"].as_str().unwrap().is_empty());
    let grade = report["grade"].as_str().unwrap();
    assert!(grade == "B" || grade == "C", "unexpected grade {grade}");
    let characters = report["rows"]["characters"].as_array().unwrap();
    let pinyin = report["rows"]["pinyin"].as_array().unwrap();
    assert!(characters.len() <= pinyin.len());
    assert!(report["mean_score"].as_f64().unwrap() > 0.0);
    Ok(())
}

#[test]
fn simulate_uses_custom_phrase_bank() -> Result<()> {
    let temp = tempdir()?;
    let bank = temp.path().join("bank.json");
    fs::write(
        &bank,
        r#"[{"text": "谢谢", "pinyin": "xiè xie", "scores": [0.3, 0.4]}]"#,
    )?;
    tonegrader()
        .args(["simulate", "--delay-ms", "0", "--phrases"])
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("谢谢").and(predicate::str::contains("\"F\"")));
    Ok(())
}

#[test]
fn unreadable_config_fails_with_context() {
    tonegrader()
        .args(["phrases", "--config", "/definitely/missing/tonegrader.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn device_without_capture_is_a_usage_error() {
    tonegrader()
        .args(["session", "--device", "USB Mic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--capture"));
}
