use std::time::Duration;

use thiserror::Error;

use crate::pkce::{MAX_VERIFIER_LENGTH, MIN_VERIFIER_LENGTH};

#[derive(Error, Debug)]
pub enum OAuthError {
    /// A required input to the flow was empty; names the first one found.
    #[error("Missing required parameter '{0}'.")]
    MissingParameters(&'static str),

    #[error("Unsupported code challenge method '{0}'. Only S256 is supported.")]
    UnsupportedMethod(String),

    #[error(
        "A code verifier must be between {min} and {max} characters long, {0} were requested.",
        min = MIN_VERIFIER_LENGTH,
        max = MAX_VERIFIER_LENGTH
    )]
    InvalidVerifierLength(usize),

    #[error("Port {port} is already in use, so the authorization redirect can't be received.")]
    PortInUse { port: u16 },

    #[error("Could not listen for the authorization redirect on port {port}.")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "No authorization redirect was received within {} seconds.",
        .0.as_secs()
    )]
    AuthorizationTimeout(Duration),

    #[error("{}", denied_message(.error, .description))]
    AccessDenied {
        error: String,
        description: Option<String>,
    },

    #[error("The callback listener stopped before an authorization redirect arrived.")]
    ListenerClosed,

    #[error("The token endpoint rejected the authorization code with HTTP {status}: {body}")]
    TokenExchangeFailed { status: u16, body: String },

    #[error("The token endpoint returned an unexpected response: {0}")]
    InvalidTokenResponse(#[source] serde_json::Error),

    #[error("The server did not confirm the logout (HTTP {status}).")]
    LogoutRejected { status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to open browser: {0}")]
    Browser(String),
}

fn denied_message(error: &str, description: &Option<String>) -> String {
    match description {
        Some(description) => format!("Authorization was denied ({error}): {description}"),
        None => format!("Authorization was denied ({error})."),
    }
}
