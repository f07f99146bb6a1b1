use assert_cmd::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::tempdir;

fn stepwright() -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("stepwright");
    let mut cmd = Command::new(bin);
    cmd.args(["--config", "demos/config.yaml"]);
    cmd
}

#[test]
fn validate_accepts_demo_plan() {
    let assert = stepwright()
        .args(["validate", "--plan", "demos/search-plan.json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    assert!(stdout.contains("9 steps, no issues"), "stdout: {}", stdout);
}

#[test]
fn validate_reports_structural_issues() {
    let tmp = tempdir().unwrap();
    let plan = tmp.path().join("plan.json");
    std::fs::write(
        &plan,
        r#"[{
            "intent": "Type without text",
            "action": "fill",
            "locator": {"strategy": "role", "value": "oops"},
            "wait": {"type": "domReady", "timeoutMs": 1000},
            "confidence": 0.0,
            "domReference": 0,
            "screenReference": 0
        }]"#,
    )
    .unwrap();

    let assert = stepwright()
        .args(["validate", "--plan", plan.to_str().unwrap()])
        .assert()
        .failure();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    assert!(stdout.contains("step 1:"), "stdout: {}", stdout);
    assert!(stdout.contains("step 1 (primary locator):"), "stdout: {}", stdout);
}

#[test]
fn export_prints_one_line_per_step() {
    let assert = stepwright()
        .args(["export", "--plan", "demos/search-plan.json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0]["method"], "goto");
    assert_eq!(lines[0]["args"][0], "https://shop.example.test/login");
    assert_eq!(lines[1]["input"], "asha@example.com");
    assert_eq!(lines[8]["expect"]["type"], "toHaveTitle");
}

#[test]
fn run_writes_outputs_under_out_dir() {
    let tmp = tempdir().unwrap();
    let assert = stepwright()
        .args([
            "run",
            "--plan",
            "demos/search-plan.json",
            "--fixture",
            "demos/shop-site.yaml",
            "--out-dir",
            tmp.path().to_str().unwrap(),
            "--strict",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    assert!(stdout.contains("9 passed, 0 failed"), "stdout: {}", stdout);

    let run_dir = std::fs::read_dir(tmp.path())
        .unwrap()
        .next()
        .expect("run directory")
        .unwrap()
        .path();
    for file in ["plan.json", "artifacts.json", "run_log.json", "steps.jsonl"] {
        assert!(run_dir.join(file).exists(), "{} missing", file);
    }
}

#[test]
fn config_show_prints_effective_yaml() {
    let assert = stepwright().args(["config", "show"]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    assert!(stdout.contains("maxAltLocatorsPerStep: 3"), "stdout: {}", stdout);
    assert!(stdout.contains("outputDir: runs"), "stdout: {}", stdout);
}
