use crate::phonodrift;
use predicates::prelude::*;

#[test]
fn test_show_rule_parts() {
    let mut cmd = phonodrift();
    cmd.args(["show", "|ts| -> s / _ V"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("|ts|"))
        .stdout(predicate::str::contains("Mirror"))
        .stdout(predicate::str::contains("not allowed"));
}
