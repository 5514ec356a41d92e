use std::{sync::Arc, time::Duration};

use assert_fs::TempDir;
use camino::Utf8PathBuf;
use chrono::Utc;
use httpmock::prelude::*;
use serde_json::{json, Value};
use url::Url;

use rippling::command::{Login, RipplingOutput};
use rippling_config::{Config, TokenStore};
use rippling_oauth::{AuthorizationFlow, OAuthClientConfig, OAuthError, UrlLauncher};

/// Approves the login as soon as the authorization page is opened.
struct ApprovingBrowser {
    port: u16,
    code: &'static str,
}

impl UrlLauncher for ApprovingBrowser {
    fn launch(&self, url: &Url) -> Result<(), OAuthError> {
        assert!(url.query().unwrap_or_default().contains("codeChallengeMethod=S256"));
        let redirect = format!("http://127.0.0.1:{}/?code={}", self.port, self.code);
        tokio::spawn(async move {
            let _ = reqwest::get(redirect).await;
        });
        Ok(())
    }
}

fn fresh_store() -> (TempDir, TokenStore) {
    let tmp = TempDir::new().unwrap();
    let home = Utf8PathBuf::try_from(tmp.path().join("config-home")).unwrap();
    let config = Config::new(Some(&home)).unwrap();
    (tmp, TokenStore::new(&config))
}

fn flow_against(server: &MockServer) -> AuthorizationFlow {
    let port = portpicker::pick_unused_port().unwrap();
    let config = OAuthClientConfig {
        api_url: server.base_url(),
        redirect_port: port,
        timeout: Duration::from_secs(10),
        ..Default::default()
    };
    AuthorizationFlow::with_launcher(config, Arc::new(ApprovingBrowser { port, code: "abc" }))
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn a_login_saves_the_token_to_the_config_home() {
    let server = MockServer::start_async().await;
    let token_endpoint = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/o/token/")
                .body_includes("code=abc")
                .body_includes("code_verifier=");
            then.status(200)
                .json_body(json!({"access_token": "tok1", "expires_in": 3600}));
        })
        .await;
    let (_tmp, store) = fresh_store();

    let output = Login::default()
        .run_with(&store, &flow_against(&server))
        .await
        .unwrap();

    assert_eq!(output, RipplingOutput::LoginSuccessful);
    token_endpoint.assert_async().await;

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(saved["token"], "tok1");
    let expiration = saved["expiration_timestamp"].as_f64().unwrap();
    let expected = Utc::now().timestamp() as f64 + 3600.0;
    assert!((expiration - expected).abs() < 5.0, "expiration {expiration} vs {expected}");
    assert!(!store.is_expired());

    // a second login is a no-op
    let again = Login::default()
        .run_with(&store, &flow_against(&server))
        .await
        .unwrap();
    assert_eq!(again, RipplingOutput::AlreadyLoggedIn);
    token_endpoint.assert_hits_async(1).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn a_failed_exchange_saves_nothing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/o/token/");
            then.status(400).body("invalid_grant");
        })
        .await;
    let (_tmp, store) = fresh_store();

    let error = Login::default()
        .run_with(&store, &flow_against(&server))
        .await
        .unwrap_err();

    assert_eq!(error.code(), Some(rippling::RipplingErrorCode::E003));
    assert!(!store.path().exists());
    assert!(store.is_expired());
}

#[tokio::test(flavor = "multi_thread")]
async fn a_token_that_cannot_be_saved_is_not_a_success() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/o/token/");
            then.status(200)
                .json_body(json!({"access_token": "tok1", "expires_in": 3600}));
        })
        .await;

    // the config home is a plain file, so nothing can be written under it
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("not-a-directory");
    std::fs::write(&blocker, "").unwrap();
    let store = TokenStore::with_path(
        Utf8PathBuf::try_from(blocker.join("oauth_token.json")).unwrap(),
    );

    let error = Login::default()
        .run_with(&store, &flow_against(&server))
        .await
        .unwrap_err();

    assert_eq!(error.code(), Some(rippling::RipplingErrorCode::E004));
    assert!(store.load().is_none());
}
