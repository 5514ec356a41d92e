mod code;
mod suggestion;

pub use code::RipplingErrorCode;
pub use suggestion::RipplingErrorSuggestion;

use rippling_config::ConfigError;
use rippling_oauth::OAuthError;
use rippling_std::RipplingStdError;

/// Metadata contains extra information about specific errors
/// Currently this includes an optional error `Code`
/// and an optional `Suggestion`
#[derive(Default, Debug, Clone)]
pub struct RipplingErrorMetadata {
    pub suggestion: Option<RipplingErrorSuggestion>,
    pub code: Option<RipplingErrorCode>,
}

/// `Metadata` structs can be created from an `anyhow::Error`
/// This works by downcasting the errors to their underlying types
/// and creating `Suggestion`s and `Code`s where applicable
impl From<&mut anyhow::Error> for RipplingErrorMetadata {
    fn from(error: &mut anyhow::Error) -> Self {
        use RipplingErrorCode as Code;
        use RipplingErrorSuggestion as Suggestion;

        if let Some(oauth_error) = error.downcast_ref::<OAuthError>() {
            let (suggestion, code) = match oauth_error {
                OAuthError::MissingParameters(_) => (Some(Suggestion::SetClientId), Code::E001),
                OAuthError::AuthorizationTimeout(timeout) => (
                    Some(Suggestion::RerunLogin { timeout: *timeout }),
                    Code::E002,
                ),
                OAuthError::TokenExchangeFailed { .. } | OAuthError::InvalidTokenResponse(_) => {
                    (Some(Suggestion::RestartLogin), Code::E003)
                }
                OAuthError::PortInUse { port } | OAuthError::Bind { port, .. } => {
                    (Some(Suggestion::FreeCallbackPort { port: *port }), Code::E005)
                }
                OAuthError::AccessDenied { .. } => (Some(Suggestion::ApproveInBrowser), Code::E006),
                OAuthError::UnsupportedMethod(_) | OAuthError::InvalidVerifierLength(_) => {
                    (Some(Suggestion::SubmitIssue), Code::E007)
                }
                OAuthError::LogoutRejected { .. } => (Some(Suggestion::RetryLogout), Code::E008),
                OAuthError::Http(_) | OAuthError::Url(_) => {
                    (Some(Suggestion::CheckConnection), Code::E008)
                }
                OAuthError::ListenerClosed | OAuthError::Browser(_) => {
                    (Some(Suggestion::SubmitIssue), Code::E008)
                }
            };
            return Self {
                suggestion,
                code: Some(code),
            };
        }

        if let Some(config_error) = error.downcast_ref::<ConfigError>() {
            let (suggestion, code) = match config_error {
                ConfigError::TokenPersistence { .. } => {
                    (Suggestion::CheckConfigHomePermissions, Code::E004)
                }
                ConfigError::DefaultConfigDirNotFound
                | ConfigError::InvalidOverrideConfigDir(_)
                | ConfigError::NoConfigFound(_) => (Suggestion::SetConfigHome, Code::E008),
                ConfigError::PathNotUtf8(_)
                | ConfigError::JsonSerialization(_)
                | ConfigError::IoError(_)
                | ConfigError::RipplingStdError(_) => (Suggestion::SubmitIssue, Code::E008),
            };
            return Self {
                suggestion: Some(suggestion),
                code: Some(code),
            };
        }

        if error.downcast_ref::<RipplingStdError>().is_some() {
            return Self {
                suggestion: Some(Suggestion::SubmitIssue),
                code: Some(Code::E008),
            };
        }

        Self::default()
    }
}
