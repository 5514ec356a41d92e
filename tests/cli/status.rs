use assert_fs::TempDir;
use predicates::prelude::*;

use super::{rippling, token_store};

#[test]
fn it_asks_you_to_log_in_without_a_token() {
    let home = TempDir::new().unwrap();

    rippling(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("rippling login"));
}

#[test]
fn it_shows_how_long_the_token_lasts() {
    let home = TempDir::new().unwrap();
    token_store(&home).save("tok1", 7200).unwrap();

    rippling(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in").and(predicate::str::contains("1h 59m")));
}
