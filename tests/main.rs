mod cli;
mod e2e;

use assert_cmd::Command;
use predicates::prelude::*;
use rippling::PKG_VERSION;

#[test]
fn its_executable() {
    let mut cmd = Command::cargo_bin("rippling").unwrap();

    // running the CLI with no command prints usage to stderr
    let result = cmd.assert().failure();
    result.stderr(predicate::str::contains("Usage"));
}

#[test]
fn it_prints_its_version() {
    let mut cmd = Command::cargo_bin("rippling").unwrap();
    let result = cmd.arg("--version").assert().success();
    result.stdout(predicate::str::contains(PKG_VERSION));
}
