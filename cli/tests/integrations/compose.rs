use crate::phonodrift;
use predicates::prelude::*;

#[test]
fn test_compose_chains_rules() {
    let mut cmd = phonodrift();
    cmd.args(["compose", "a -> e", "e -> i"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("a -> i / _"));
}
