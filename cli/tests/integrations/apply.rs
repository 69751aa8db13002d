use crate::phonodrift;
use predicates::prelude::*;

#[test]
fn test_apply_rewrites_words_and_affixes() {
    let mut cmd = phonodrift();
    cmd.arg("apply")
        .arg("a -> i / _")
        .args(["aba", "bacab", "bob"])
        .args(["--suffix", "ab", "--prefix", "ac"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Applied 'a -> i / _'"))
        .stdout(predicate::str::contains("bicib"))
        .stdout(predicate::str::contains("icbobib"));
}

#[test]
fn test_apply_json_report() {
    let output = phonodrift()
        .arg("apply")
        .arg("b -> t / _ $")
        .args(["aba", "bob", "bac", "--suffix", "ob", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["rules"][0], "b -> t / _ $");
    assert_eq!(report["words"][1]["before"], "bob");
    assert_eq!(report["words"][1]["after"], "bob");
    let forms: Vec<&str> = report["forms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["form"].as_str().unwrap())
        .collect();
    assert!(forms.contains(&"bot"));
    assert!(forms.contains(&"bobot"));
}

#[test]
fn test_apply_reports_reverted_words() {
    let mut cmd = phonodrift();
    cmd.args(["apply", "V -> - / $C _ CV", "bata"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Reverted 'bata'"))
        .stdout(predicate::str::contains("has no effect"));
}

#[test]
fn test_apply_rejects_malformed_rule() {
    let mut cmd = phonodrift();
    cmd.args(["apply", "a => i", "aba"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_apply_rejects_unknown_symbols_in_words() {
    let mut cmd = phonodrift();
    cmd.args(["apply", "a -> i", "aqa"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown phoneme 'q'"));
}
