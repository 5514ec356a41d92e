use assert_fs::TempDir;
use httpmock::prelude::*;
use predicates::prelude::*;
use rippling::utils::env::RipplingEnvKey;
use rippling_config::TokenRecord;
use serde_json::json;

use super::{rippling, token_store};

#[test]
fn it_reports_when_not_logged_in() {
    let home = TempDir::new().unwrap();

    rippling(&home)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("You are not logged in"));
}

#[test]
fn it_removes_an_expired_token_without_calling_the_server() {
    let home = TempDir::new().unwrap();
    let store = token_store(&home);
    store
        .write(&TokenRecord {
            token: "stale".to_string(),
            expiration_timestamp: 1_700_000_000.123456,
        })
        .unwrap();

    rippling(&home)
        .env(RipplingEnvKey::ApiUrl.to_string(), "http://127.0.0.1:1")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("You are not logged in"));

    assert!(!store.path().exists());
}

#[test]
fn it_revokes_then_deletes_the_token() {
    let server = MockServer::start();
    let revoke = server.mock(|when, then| {
        when.method(POST)
            .path("/auth_ext/logout/")
            .header("authorization", "Bearer tok1");
        then.status(200).json_body(json!({"logout": true}));
    });

    let home = TempDir::new().unwrap();
    let store = token_store(&home);
    store.save("tok1", 3600).unwrap();

    rippling(&home)
        .env(RipplingEnvKey::ApiUrl.to_string(), server.base_url())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logout successful!"));

    revoke.assert();
    assert!(!store.path().exists());
}

#[test]
fn an_unconfirmed_logout_keeps_the_token() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/auth_ext/logout/");
        then.status(200).json_body(json!({"logout": false}));
    });

    let home = TempDir::new().unwrap();
    let store = token_store(&home);
    store.save("tok1", 3600).unwrap();

    rippling(&home)
        .env(RipplingEnvKey::ApiUrl.to_string(), server.base_url())
        .arg("logout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E008]:"));

    assert_eq!(store.load().unwrap().token, "tok1");
}
