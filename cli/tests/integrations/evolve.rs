use crate::phonodrift;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_evolve_with_rules_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("vowels.rules"),
        "# raise open vowels\na -> i\n\no -> u # rounding stays\n",
    )
    .unwrap();

    let output = phonodrift()
        .arg("evolve")
        .args(["aba", "bob"])
        .arg("--rules-dir")
        .arg(temp_dir.path())
        .args(["--generations", "4", "--seed", "7", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["generations"].as_array().unwrap().len(), 4);
    assert_eq!(report["words"][0]["before"], "aba");
}

#[test]
fn test_evolve_without_rules() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = phonodrift();
    cmd.args(["evolve", "aba", "--generations", "2", "--rules-dir"])
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No applicable rules"));
}

#[test]
fn test_evolve_reports_bad_rule_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("bad.rules"), "a -> i\nq -> a\n").unwrap();

    let mut cmd = phonodrift();
    cmd.args(["evolve", "aba", "--rules-dir"]).arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown phoneme 'q'"))
        .stderr(predicate::str::contains("bad.rules:2"));
}
