//! OAuth 2.0 Authorization Code flow with PKCE (RFC 7636) for the
//! Rippling CLI.
//!
//! A login binds a one-shot callback listener on the loopback interface,
//! sends the user's browser to the authorization page, waits for the
//! redirect carrying the authorization code, and exchanges that code for
//! an access token on the back channel.

mod browser;
mod callback;
mod error;
mod exchange;
mod flow;
pub mod pkce;
mod session;
mod types;

pub use browser::{SystemBrowser, UrlLauncher};
pub use callback::{CallbackListener, ListenerHandle};
pub use error::OAuthError;
pub use exchange::TokenExchangeClient;
pub use flow::AuthorizationFlow;
pub use session::{AuthorizationSession, FlowState, Redirect, RedirectSink};
pub use types::*;
