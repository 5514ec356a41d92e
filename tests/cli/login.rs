use assert_fs::TempDir;
use predicates::prelude::*;
use rippling::utils::env::RipplingEnvKey;

use super::{rippling, token_store};

#[test]
fn it_is_a_no_op_when_already_logged_in() {
    let home = TempDir::new().unwrap();
    token_store(&home).save("tok1", 3600).unwrap();

    // an unroutable auth server proves nothing goes over the network
    rippling(&home)
        .env(RipplingEnvKey::AuthUrl.to_string(), "http://127.0.0.1:1")
        .env(RipplingEnvKey::ApiUrl.to_string(), "http://127.0.0.1:1")
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already logged in"));

    assert_eq!(token_store(&home).load().unwrap().token, "tok1");
}

#[test]
fn an_empty_client_id_is_e001() {
    let home = TempDir::new().unwrap();

    rippling(&home)
        .env(RipplingEnvKey::ClientId.to_string(), "")
        .arg("login")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[E001]:"));

    assert!(token_store(&home).load().is_none());
}
