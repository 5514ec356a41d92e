use std::time::Duration;

use reqwest::{header, redirect::Policy, Client};
use url::Url;

use crate::{IssuedToken, LogoutResponse, OAuthClientConfig, OAuthError, TokenResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Back-channel calls to the authorization server: trading a code for a
/// token, and revoking that token again.
#[derive(Debug, Clone)]
pub struct TokenExchangeClient {
    client: Client,
    token_endpoint: Url,
    logout_endpoint: Url,
}

impl TokenExchangeClient {
    pub fn new(config: &OAuthClientConfig) -> Result<Self, OAuthError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("rippling-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            token_endpoint: config.token_endpoint()?,
            logout_endpoint: config.logout_endpoint()?,
        })
    }

    /// Exchanges a single-use authorization code for an access token.
    ///
    /// Any non-2xx answer fails with [`OAuthError::TokenExchangeFailed`]
    /// carrying the server's body. Nothing is retried: the code can't be
    /// used twice, so the caller has to start a new login.
    pub async fn exchange(
        &self,
        authorization_code: &str,
        code_verifier: &str,
        client_id: &str,
        client_secret: Option<&str>,
    ) -> Result<IssuedToken, OAuthError> {
        if authorization_code.is_empty() {
            return Err(OAuthError::MissingParameters("code"));
        }
        if code_verifier.is_empty() {
            return Err(OAuthError::MissingParameters("code_verifier"));
        }
        if client_id.is_empty() {
            return Err(OAuthError::MissingParameters("client_id"));
        }

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", authorization_code),
            ("code_verifier", code_verifier),
        ];
        if let Some(client_secret) = client_secret {
            form.push(("client_secret", client_secret));
        }

        tracing::debug!(endpoint = %self.token_endpoint, "exchanging authorization code");
        let response = self
            .client
            .post(self.token_endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "token endpoint rejected the exchange");
            return Err(OAuthError::TokenExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(OAuthError::InvalidTokenResponse)?;
        let token = IssuedToken::from(token);
        tracing::debug!(expires_in = token.expires_in, "received access token");
        Ok(token)
    }

    /// Asks the server to revoke `access_token`. Succeeds only when the
    /// server confirms with `{"logout": true}`.
    pub async fn revoke(&self, access_token: &str) -> Result<(), OAuthError> {
        let response = self
            .client
            .post(self.logout_endpoint.clone())
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let confirmed = status.is_success()
            && response
                .json::<LogoutResponse>()
                .await
                .map(|body| body.logout)
                .unwrap_or(false);
        if confirmed {
            Ok(())
        } else {
            Err(OAuthError::LogoutRejected {
                status: status.as_u16(),
            })
        }
    }
}
