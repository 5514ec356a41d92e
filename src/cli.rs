use camino::Utf8PathBuf;
use clap::{
    Parser, Subcommand,
    builder::{PossibleValuesParser, TypedValueParser},
};
use std::str::FromStr;

use rippling_config::{Config, TokenStore};
use rippling_oauth::{AuthorizationFlow, OAuthClientConfig, TokenExchangeClient};
use timber::{LEVELS, Level};

use crate::RipplingResult;
use crate::command::{self, RipplingOutput};
use crate::utils::env::{RipplingEnv, RipplingEnvKey};

#[derive(Debug, Parser)]
#[command(
    name = "rippling",
    author,
    version,
    about = "
Rippling CLI - sign in to Rippling from your terminal.

To authenticate, run:

    $ rippling login

This opens your browser at the Rippling sign-in page. Once you approve the
request, the access token is saved to ~/.rippling/oauth_token.json.
"
)]
pub struct Rippling {
    #[command(subcommand)]
    pub command: Command,

    /// Specify the log level
    #[arg(
        long = "log",
        short = 'l',
        global = true,
        ignore_case = true,
        value_parser = PossibleValuesParser::new(LEVELS).try_map(|s| Level::from_str(&s))
    )]
    pub log_level: Option<Level>,

    #[arg(skip)]
    pub env_store: RipplingEnv,
}

impl Rippling {
    pub async fn run(&self) -> RipplingResult<RipplingOutput> {
        match &self.command {
            Command::Login(command) => {
                let store = self.get_token_store()?;
                let flow = AuthorizationFlow::new(self.get_oauth_config()?)?;
                command.run_with(&store, &flow).await
            }
            Command::Logout(command) => {
                let store = self.get_token_store()?;
                let client = TokenExchangeClient::new(&self.get_oauth_config()?)?;
                command.run_with(&store, &client).await
            }
            Command::Status(command) => command.run(&self.get_token_store()?),
            Command::Explain(command) => command.run(),
        }
    }

    pub(crate) fn get_rippling_config(&self) -> RipplingResult<Config> {
        let override_home: Option<Utf8PathBuf> = self
            .env_store
            .get(RipplingEnvKey::ConfigHome)?
            .map(|p| Utf8PathBuf::from(&p));
        Ok(Config::new(override_home.as_ref())?)
    }

    pub(crate) fn get_token_store(&self) -> RipplingResult<TokenStore> {
        Ok(TokenStore::new(&self.get_rippling_config()?))
    }

    /// Builds the OAuth client settings once, layering environment
    /// overrides over the built-in defaults.
    pub(crate) fn get_oauth_config(&self) -> RipplingResult<OAuthClientConfig> {
        let mut config = OAuthClientConfig::default();
        if let Some(client_id) = self.env_store.get(RipplingEnvKey::ClientId)? {
            config.client_id = client_id;
        }
        config.client_secret = self.env_store.get(RipplingEnvKey::ClientSecret)?;
        if let Some(auth_url) = self.env_store.get(RipplingEnvKey::AuthUrl)? {
            config.authorization_server_url = auth_url;
        }
        if let Some(api_url) = self.env_store.get(RipplingEnvKey::ApiUrl)? {
            config.api_url = api_url;
        }
        tracing::debug!(?config);
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in through your browser and save an access token
    Login(command::Login),

    /// Revoke the saved access token and remove it
    Logout(command::Logout),

    /// Show whether you are signed in
    Status(command::Status),

    /// Explain error codes
    Explain(command::Explain),
}
