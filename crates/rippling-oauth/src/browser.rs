use std::process::Command;

use rippling_std::Style;
use url::Url;

use crate::OAuthError;

/// Opens the authorization page for the user. Swapped out in tests for
/// something that plays the browser's part.
pub trait UrlLauncher: Send + Sync {
    fn launch(&self, url: &Url) -> Result<(), OAuthError>;
}

/// The user's browser: whatever `$BROWSER` names, or the platform default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl UrlLauncher for SystemBrowser {
    fn launch(&self, url: &Url) -> Result<(), OAuthError> {
        let browser_override = std::env::var_os("BROWSER");
        eprintln!("{}", launch_message(browser_override.is_some()));

        if let Some(browser_override) = browser_override {
            // don't wait on the browser, the redirect is what we're after
            Command::new(&browser_override)
                .arg(url.as_str())
                .spawn()
                .map(|_| ())
                .map_err(|e| {
                    OAuthError::Browser(format!(
                        "couldn't open {}: {e}",
                        browser_override.to_string_lossy()
                    ))
                })
        } else {
            opener::open(url.as_str()).map_err(|e| OAuthError::Browser(e.to_string()))
        }
    }
}

/// The link itself is printed by the flow, so this only says how it is opened.
fn launch_message(has_override: bool) -> String {
    let browser_var = Style::Command.paint("$BROWSER");
    if has_override {
        format!("Opening the link with the application specified by {browser_var}.")
    } else {
        format!(
            "Opening the link with your default browser. This can be overridden by setting the {browser_var} environment variable."
        )
    }
}
