use assert_fs::TempDir;
use predicates::prelude::*;

use super::rippling;

#[test]
fn it_explains_a_code() {
    let home = TempDir::new().unwrap();

    rippling(&home)
        .args(["explain", "E002"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("**E002**"));
}

#[test]
fn it_rejects_unknown_codes() {
    let home = TempDir::new().unwrap();

    rippling(&home).args(["explain", "E999"]).assert().failure();
}
