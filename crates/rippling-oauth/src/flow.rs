use std::sync::Arc;

use rippling_std::{hintln, hyperlink, warnln};
use url::Url;

use crate::{
    callback::CallbackListener, pkce, AuthorizationSession, ChallengeMethod, IssuedToken,
    OAuthClientConfig, OAuthError, SystemBrowser, TokenExchangeClient, UrlLauncher,
};

/// Drives one interactive login from start to finish:
/// bind the callback listener, send the user to the authorization page,
/// wait for the redirect, then trade the code for a token.
pub struct AuthorizationFlow {
    config: OAuthClientConfig,
    launcher: Arc<dyn UrlLauncher>,
    exchange: TokenExchangeClient,
}

impl AuthorizationFlow {
    /// A flow that opens the user's real browser.
    pub fn new(config: OAuthClientConfig) -> Result<Self, OAuthError> {
        Self::with_launcher(config, Arc::new(SystemBrowser))
    }

    pub fn with_launcher(
        config: OAuthClientConfig,
        launcher: Arc<dyn UrlLauncher>,
    ) -> Result<Self, OAuthError> {
        let exchange = TokenExchangeClient::new(&config)?;
        Ok(Self {
            config,
            launcher,
            exchange,
        })
    }

    pub const fn config(&self) -> &OAuthClientConfig {
        &self.config
    }

    /// Runs the browser half of the login and returns the authorization code.
    pub async fn start_authorization_flow(
        &self,
        client_id: &str,
        code_challenge: &str,
        method: &str,
    ) -> Result<String, OAuthError> {
        let session = self.authorize(client_id, code_challenge, method).await?;
        session
            .authorization_code()
            .map(str::to_string)
            .ok_or(OAuthError::ListenerClosed)
    }

    /// Like [`AuthorizationFlow::start_authorization_flow`], but hands back
    /// the whole session, which is in `CodeReceived` on success.
    pub async fn authorize(
        &self,
        client_id: &str,
        code_challenge: &str,
        method: &str,
    ) -> Result<AuthorizationSession, OAuthError> {
        let (mut session, sink) =
            AuthorizationSession::new(client_id, code_challenge, method, self.config.timeout)?;
        let url = self.authorization_url(&session)?;

        // bound before the browser opens so a taken port fails fast
        let listener = CallbackListener::new(self.config.redirect_port)
            .bind(sink)
            .await?;
        tracing::debug!(addr = %listener.local_addr(), "waiting for the authorization redirect");
        session.attach(listener);

        self.open_browser(&url);
        hintln!(
            "Waiting up to {} seconds for you to approve the request.",
            self.config.timeout.as_secs()
        );

        session.wait_for_redirect().await?;
        Ok(session)
    }

    /// The complete login: a fresh PKCE pair, the browser round trip, and
    /// the token exchange. Persisting the token is left to the caller.
    pub async fn login(&self) -> Result<IssuedToken, OAuthError> {
        let pkce = pkce::generate_with(
            self.config.verifier_length,
            ChallengeMethod::S256.as_str(),
        )?;
        let mut session = self
            .authorize(
                &self.config.client_id,
                &pkce.code_challenge,
                pkce.method.as_str(),
            )
            .await?;
        let code = session
            .authorization_code()
            .ok_or(OAuthError::ListenerClosed)?;

        let token = self
            .exchange
            .exchange(
                code,
                &pkce.code_verifier,
                &self.config.client_id,
                self.config.client_secret.as_deref(),
            )
            .await?;
        session.mark_exchanged();
        Ok(token)
    }

    /// Revokes a previously issued token with the authorization server.
    pub async fn logout(&self, access_token: &str) -> Result<(), OAuthError> {
        self.exchange.revoke(access_token).await
    }

    /// `{auth}/oauth?clientId=..&codeChallenge=..&codeChallengeMethod=S256`
    pub fn authorization_url(&self, session: &AuthorizationSession) -> Result<Url, OAuthError> {
        let mut url = self.config.authorization_endpoint()?;
        url.query_pairs_mut()
            .append_pair("clientId", session.client_id())
            .append_pair("codeChallenge", session.code_challenge())
            .append_pair("codeChallengeMethod", session.method().as_str());
        Ok(url)
    }

    fn open_browser(&self, url: &Url) {
        eprintln!(
            "Complete the login in your browser. If it doesn't open, visit:\n\n    {}\n",
            hyperlink(url.as_str())
        );
        if let Err(e) = self.launcher.launch(url) {
            tracing::debug!(error = %e, "browser launch failed");
            warnln!("{e}. Open the link above to continue.");
        }
    }
}
