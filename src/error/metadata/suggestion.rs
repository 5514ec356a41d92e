use std::fmt::{self, Display};
use std::time::Duration;

use rippling_std::Style;

use crate::utils::env::RipplingEnvKey;

/// `RipplingErrorSuggestion` contains possible suggestions for remedying specific errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RipplingErrorSuggestion {
    SetClientId,
    RerunLogin { timeout: Duration },
    RestartLogin,
    CheckConfigHomePermissions,
    SetConfigHome,
    FreeCallbackPort { port: u16 },
    ApproveInBrowser,
    CheckConnection,
    RetryLogout,
    SubmitIssue,
    Adhoc(String),
}

impl Display for RipplingErrorSuggestion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RipplingErrorSuggestion::*;

        let suggestion = match self {
            SetClientId => format!(
                "Unset {} to use the built-in client, or set it to the client ID you were issued.",
                Style::Command.paint(format!("${}", RipplingEnvKey::ClientId))
            ),
            RerunLogin { timeout } => format!(
                "Run {} again and finish signing in within {} seconds.",
                Style::Command.paint("`rippling login`"),
                timeout.as_secs()
            ),
            RestartLogin => format!(
                "Authorization codes can only be used once. Run {} to start over.",
                Style::Command.paint("`rippling login`")
            ),
            CheckConfigHomePermissions => format!(
                "Make sure the configuration directory is writable, or point {} at one that is.",
                Style::Command.paint(format!("${}", RipplingEnvKey::ConfigHome))
            ),
            SetConfigHome => format!(
                "You can override the location of the configuration directory by setting {}.",
                Style::Command.paint(format!("${}", RipplingEnvKey::ConfigHome))
            ),
            FreeCallbackPort { port } => format!(
                "Another program is listening on port {port}. Stop it, or finish the other {} that is already running, and try again.",
                Style::Command.paint("`rippling login`")
            ),
            ApproveInBrowser => format!(
                "Run {} again and approve the request in your browser.",
                Style::Command.paint("`rippling login`")
            ),
            CheckConnection => format!(
                "Check your network connection and the values of {} and {}.",
                Style::Command.paint(format!("${}", RipplingEnvKey::AuthUrl)),
                Style::Command.paint(format!("${}", RipplingEnvKey::ApiUrl))
            ),
            RetryLogout => format!(
                "Your token is still saved. Run {} again once the server is reachable.",
                Style::Command.paint("`rippling logout`")
            ),
            SubmitIssue => format!(
                "This error was unexpected! Re-run with {} and include the output when you report it.",
                Style::Command.paint("`--log debug`")
            ),
            Adhoc(msg) => msg.to_string(),
        };
        write!(formatter, "{}", &suggestion)
    }
}
