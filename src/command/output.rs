use std::io;

use calm_io::stdoutln;
use chrono::{DateTime, Duration, Utc};
use humantime::format_duration;
use rippling_std::Style;

/// RipplingOutput defines all of the different types of data that are printed
/// to `stdout`. Every command returns `RipplingResult<RipplingOutput>`, and
/// its print logic is handled in `RipplingOutput::print`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RipplingOutput {
    AlreadyLoggedIn,
    LoginSuccessful,
    NotLoggedIn,
    LogoutSuccessful,
    LoggedIn {
        expires_at: DateTime<Utc>,
        remaining: Duration,
    },
    ErrorExplanation(String),
}

impl RipplingOutput {
    pub fn get_stdout(&self) -> String {
        match self {
            Self::AlreadyLoggedIn => "Already logged in".to_string(),
            Self::LoginSuccessful => {
                format!("{} Login successful!", Style::SuccessPrefix.paint("✓"))
            }
            Self::NotLoggedIn => format!(
                "You are not logged in. Run {} to sign in.",
                Style::Command.paint("`rippling login`")
            ),
            Self::LogoutSuccessful => {
                format!("{} Logout successful!", Style::SuccessPrefix.paint("✓"))
            }
            Self::LoggedIn {
                expires_at,
                remaining,
            } => format!(
                "Logged in. The access token expires in {} (at {}).",
                humanize(*remaining),
                expires_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::ErrorExplanation(explanation) => explanation.clone(),
        }
    }

    pub fn print(&self) -> io::Result<()> {
        stdoutln!("{}", self.get_stdout())
    }
}

fn humanize(duration: Duration) -> String {
    // whole seconds are plenty for a token lifetime
    let seconds = duration.to_std().map(|d| d.as_secs()).unwrap_or_default();
    format_duration(std::time::Duration::from_secs(seconds)).to_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Duration::seconds(42), "42s")]
    #[case(Duration::seconds(125), "2m 5s")]
    #[case(Duration::seconds(3600), "1h")]
    #[case(Duration::milliseconds(7_199_900), "1h 59m 59s")]
    #[case(Duration::seconds(-5), "0s")]
    fn it_humanizes_remaining_time(#[case] remaining: Duration, #[case] expected: &str) {
        assert_eq!(humanize(remaining), expected);
    }

    #[test]
    fn login_messages_match_what_users_see() {
        assert_eq!(RipplingOutput::AlreadyLoggedIn.get_stdout(), "Already logged in");
        assert!(
            RipplingOutput::LoginSuccessful
                .get_stdout()
                .ends_with("Login successful!")
        );
        assert!(
            RipplingOutput::LogoutSuccessful
                .get_stdout()
                .ends_with("Logout successful!")
        );
    }
}
