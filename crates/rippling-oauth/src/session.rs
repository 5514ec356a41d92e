use std::{
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::sync::oneshot;

use crate::{callback::ListenerHandle, ChallengeMethod, OAuthError};

/// Where a login attempt is in its lifecycle.
///
/// ```text
/// Idle -> AwaitingBrowserRedirect -> CodeReceived -> Exchanged
///                                 \-> TimedOut
///                                 \-> Denied
///                                 \-> Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingBrowserRedirect,
    CodeReceived,
    Exchanged,
    TimedOut,
    Denied,
    Aborted,
}

/// What the identity provider sent the browser back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Code(String),
    Denied {
        error: String,
        description: Option<String>,
    },
}

impl Redirect {
    /// Reads a redirect out of a query string. `None` when it carries
    /// neither a non-empty `code` nor an `error`.
    pub fn from_query(query: Option<&str>) -> Option<Self> {
        let mut code = None;
        let mut error = None;
        let mut description = None;
        for (key, value) in url::form_urlencoded::parse(query?.as_bytes()) {
            match key.as_ref() {
                "code" if code.is_none() && !value.is_empty() => code = Some(value.into_owned()),
                "error" if error.is_none() && !value.is_empty() => error = Some(value.into_owned()),
                "error_description" => description = Some(value.into_owned()),
                _ => {}
            }
        }
        match (code, error) {
            (Some(code), _) => Some(Self::Code(code)),
            (None, Some(error)) => Some(Self::Denied { error, description }),
            (None, None) => None,
        }
    }
}

/// The listener's non-owning view of a session: it can fill in the
/// redirect exactly once and nothing else.
#[derive(Clone)]
pub struct RedirectSink {
    sender: Arc<Mutex<Option<oneshot::Sender<Redirect>>>>,
}

impl RedirectSink {
    /// Hands the redirect to the waiting session. Returns `false` if one
    /// was already delivered, in which case `redirect` is dropped.
    pub fn deliver(&self, redirect: Redirect) -> bool {
        let sender = match self.sender.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match sender {
            // a send error only means the session stopped waiting
            Some(sender) => {
                let _ = sender.send(redirect);
                true
            }
            None => false,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self.sender.lock() {
            Ok(slot) => slot.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

impl fmt::Debug for RedirectSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedirectSink")
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// One authorization attempt, owned by the flow that started it.
#[derive(Debug)]
pub struct AuthorizationSession {
    client_id: String,
    code_challenge: String,
    method: ChallengeMethod,
    timeout: Duration,
    state: FlowState,
    authorization_code: Option<String>,
    completion: Option<oneshot::Receiver<Redirect>>,
    listener: Option<ListenerHandle>,
}

impl AuthorizationSession {
    /// Creates an idle session along with the sink its callback listener
    /// writes the redirect into.
    pub fn new(
        client_id: &str,
        code_challenge: &str,
        method: &str,
        timeout: Duration,
    ) -> Result<(Self, RedirectSink), OAuthError> {
        if client_id.is_empty() {
            return Err(OAuthError::MissingParameters("client_id"));
        }
        if code_challenge.is_empty() {
            return Err(OAuthError::MissingParameters("code_challenge"));
        }
        if method.is_empty() {
            return Err(OAuthError::MissingParameters("code_challenge_method"));
        }
        let method: ChallengeMethod = method.parse()?;

        let (sender, receiver) = oneshot::channel();
        let session = Self {
            client_id: client_id.to_string(),
            code_challenge: code_challenge.to_string(),
            method,
            timeout,
            state: FlowState::Idle,
            authorization_code: None,
            completion: Some(receiver),
            listener: None,
        };
        let sink = RedirectSink {
            sender: Arc::new(Mutex::new(Some(sender))),
        };
        Ok((session, sink))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn code_challenge(&self) -> &str {
        &self.code_challenge
    }

    pub const fn method(&self) -> ChallengeMethod {
        self.method
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn state(&self) -> FlowState {
        self.state
    }

    /// Only available once the session reached `CodeReceived`.
    pub fn authorization_code(&self) -> Option<&str> {
        self.authorization_code.as_deref()
    }

    /// Takes ownership of the running listener so it can be torn down
    /// from this side once waiting is over.
    pub(crate) fn attach(&mut self, listener: ListenerHandle) {
        self.listener = Some(listener);
        self.state = FlowState::AwaitingBrowserRedirect;
    }

    /// Waits at most the session timeout for the redirect, then shuts the
    /// listener down whatever the outcome.
    pub async fn wait_for_redirect(&mut self) -> Result<&str, OAuthError> {
        let outcome = match self.completion.take() {
            Some(receiver) => tokio::time::timeout(self.timeout, receiver)
                .await
                .map(Result::ok),
            None => Ok(None),
        };

        if let Some(listener) = self.listener.take() {
            listener.shutdown().await;
        }

        match outcome {
            Ok(Some(Redirect::Code(code))) => {
                tracing::debug!(client_id = %self.client_id, "authorization code received");
                self.state = FlowState::CodeReceived;
                Ok(self.authorization_code.insert(code).as_str())
            }
            Ok(Some(Redirect::Denied { error, description })) => {
                tracing::debug!(%error, "authorization denied in the browser");
                self.state = FlowState::Denied;
                Err(OAuthError::AccessDenied { error, description })
            }
            Ok(None) => {
                self.state = FlowState::Aborted;
                Err(OAuthError::ListenerClosed)
            }
            Err(_) => {
                tracing::debug!(timeout = ?self.timeout, "gave up waiting for the redirect");
                self.state = FlowState::TimedOut;
                Err(OAuthError::AuthorizationTimeout(self.timeout))
            }
        }
    }

    /// Records that the code was traded for a token.
    pub fn mark_exchanged(&mut self) {
        if self.state == FlowState::CodeReceived {
            self.state = FlowState::Exchanged;
        }
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    fn session() -> (AuthorizationSession, RedirectSink) {
        AuthorizationSession::new("client", "challenge", "S256", Duration::from_millis(200))
            .unwrap()
    }

    #[test]
    fn it_requires_every_parameter() {
        let cases = [
            ("", "challenge", "S256"),
            ("client", "", "S256"),
            ("client", "challenge", ""),
        ];
        for (client_id, challenge, method) in cases {
            assert!(matches!(
                AuthorizationSession::new(client_id, challenge, method, Duration::from_secs(1)),
                Err(OAuthError::MissingParameters(_))
            ));
        }
        assert!(matches!(
            AuthorizationSession::new("client", "challenge", "plain", Duration::from_secs(1)),
            Err(OAuthError::UnsupportedMethod(_))
        ));
    }

    #[test]
    fn it_parses_redirect_queries() {
        assert_eq!(
            Redirect::from_query(Some("code=XYZ123&state=ignored")),
            Some(Redirect::Code("XYZ123".to_string()))
        );
        assert_eq!(
            Redirect::from_query(Some("code=a%2Bb%3D")),
            Some(Redirect::Code("a+b=".to_string()))
        );
        assert_eq!(
            Redirect::from_query(Some("error=access_denied&error_description=User+said+no")),
            Some(Redirect::Denied {
                error: "access_denied".to_string(),
                description: Some("User said no".to_string()),
            })
        );
        assert_eq!(Redirect::from_query(Some("code=")), None);
        assert_eq!(Redirect::from_query(Some("foo=bar")), None);
        assert_eq!(Redirect::from_query(None), None);
    }

    #[test]
    fn a_sink_delivers_once() {
        let (_session, sink) = session();
        assert!(!sink.is_completed());
        assert!(sink.deliver(Redirect::Code("first".to_string())));
        assert!(sink.is_completed());
        assert!(!sink.clone().deliver(Redirect::Code("second".to_string())));
    }

    #[tokio::test]
    async fn the_code_is_read_after_the_signal() {
        let (mut session, sink) = session();
        assert_eq!(session.state(), FlowState::Idle);

        sink.deliver(Redirect::Code("XYZ123".to_string()));

        assert_that!(session.wait_for_redirect().await.unwrap()).is_equal_to("XYZ123");
        assert_eq!(session.state(), FlowState::CodeReceived);
        assert_eq!(session.authorization_code(), Some("XYZ123"));

        session.mark_exchanged();
        assert_eq!(session.state(), FlowState::Exchanged);
    }

    #[tokio::test]
    async fn waiting_without_a_redirect_times_out() {
        let (mut session, _sink) = session();

        let result = session.wait_for_redirect().await;

        assert!(matches!(result, Err(OAuthError::AuthorizationTimeout(_))));
        assert_eq!(session.state(), FlowState::TimedOut);
        assert_that!(session.authorization_code()).is_none();

        session.mark_exchanged();
        assert_eq!(session.state(), FlowState::TimedOut);
    }

    #[tokio::test]
    async fn a_dropped_sink_aborts_the_wait() {
        let (mut session, sink) = session();
        drop(sink);

        assert!(matches!(
            session.wait_for_redirect().await,
            Err(OAuthError::ListenerClosed)
        ));
        assert_eq!(session.state(), FlowState::Aborted);
    }
}
