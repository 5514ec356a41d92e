use std::{fmt, str::FromStr, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::OAuthError;

/// The public client id the Rippling CLI is registered under.
pub const DEFAULT_CLIENT_ID: &str = "AgvGDwoBRb0BJAnL2CQ8dNbE6J2fgCFIchEOyr5S";
pub const DEFAULT_AUTHORIZATION_SERVER_URL: &str = "https://app.rippling.com";
pub const DEFAULT_API_URL: &str = "https://app.rippling.com/api";

/// Must match the redirect URI registered with the identity provider.
pub const DEFAULT_REDIRECT_PORT: u16 = 2000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_VERIFIER_LENGTH: usize = 43;

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// PKCE code challenge transform. S256 is the only one supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengeMethod {
    #[default]
    S256,
}

impl ChallengeMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::S256 => "S256",
        }
    }
}

impl fmt::Display for ChallengeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeMethod {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S256" => Ok(Self::S256),
            other => Err(OAuthError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A verifier and the challenge derived from it. Lives for one
/// authorization attempt and is never persisted.
#[derive(Clone)]
pub struct PkcePair {
    pub code_verifier: String,
    pub code_challenge: String,
    pub method: ChallengeMethod,
}

impl fmt::Debug for PkcePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PkcePair")
            .field("code_verifier", &"<redacted>")
            .field("code_challenge", &self.code_challenge)
            .field("method", &self.method)
            .finish()
    }
}

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// What a successful exchange yields: the access token and how many
/// seconds the server says it stays valid.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

impl From<TokenResponse> for IssuedToken {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            expires_in: response.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
        }
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Body of `POST /auth_ext/logout/`.
#[derive(Debug, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub logout: bool,
}

/// Client configuration for OAuth, built once by the CLI and handed to
/// the flow explicitly.
#[derive(Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub authorization_server_url: String,
    pub api_url: String,
    pub redirect_port: u16,
    pub timeout: Duration,
    pub verifier_length: usize,
}

impl Default for OAuthClientConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: None,
            authorization_server_url: DEFAULT_AUTHORIZATION_SERVER_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            redirect_port: DEFAULT_REDIRECT_PORT,
            timeout: DEFAULT_TIMEOUT,
            verifier_length: DEFAULT_VERIFIER_LENGTH,
        }
    }
}

impl OAuthClientConfig {
    /// The browser-facing authorization page.
    pub fn authorization_endpoint(&self) -> Result<Url, OAuthError> {
        join(&self.authorization_server_url, "oauth")
    }

    pub fn token_endpoint(&self) -> Result<Url, OAuthError> {
        join(&self.api_url, "o/token/")
    }

    pub fn logout_endpoint(&self) -> Result<Url, OAuthError> {
        join(&self.api_url, "auth_ext/logout/")
    }

    /// Where the identity provider sends the browser back to.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/", self.redirect_port)
    }
}

impl fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("authorization_server_url", &self.authorization_server_url)
            .field("api_url", &self.api_url)
            .field("redirect_port", &self.redirect_port)
            .field("timeout", &self.timeout)
            .field("verifier_length", &self.verifier_length)
            .finish()
    }
}

fn join(base: &str, path: &str) -> Result<Url, OAuthError> {
    Ok(Url::parse(&format!("{}/{}", base.trim_end_matches('/'), path))?)
}
