use clap::Parser;
use rippling_config::TokenStore;
use rippling_oauth::AuthorizationFlow;
use rippling_std::infoln;

use crate::{RipplingOutput, RipplingResult};

#[derive(Debug, Default, Parser)]
pub struct Login {}

impl Login {
    /// Signs in unless a usable token is already stored.
    ///
    /// Success is only reported once the new token is on disk. A failed
    /// exchange leaves the store untouched.
    pub async fn run_with(
        &self,
        store: &TokenStore,
        flow: &AuthorizationFlow,
    ) -> RipplingResult<RipplingOutput> {
        if let Some(record) = store.valid_token() {
            tracing::debug!(
                path = %store.path(),
                expiration_timestamp = record.expiration_timestamp,
                "found a valid access token"
            );
            return Ok(RipplingOutput::AlreadyLoggedIn);
        }

        infoln!("Signing in to Rippling.");
        let token = flow.login().await?;
        store.save(&token.access_token, token.expires_in)?;
        Ok(RipplingOutput::LoginSuccessful)
    }
}
