use clap::Parser;
use rippling_config::TokenStore;
use rippling_oauth::TokenExchangeClient;

use crate::{RipplingOutput, RipplingResult};

#[derive(Debug, Default, Parser)]
pub struct Logout {}

impl Logout {
    /// Revokes the stored token and removes it. The file is only deleted
    /// after the server confirmed the revocation.
    pub async fn run_with(
        &self,
        store: &TokenStore,
        client: &TokenExchangeClient,
    ) -> RipplingResult<RipplingOutput> {
        let Some(record) = store.valid_token() else {
            // an expired or unreadable file is of no use to anyone
            if store.delete()? {
                tracing::debug!(path = %store.path(), "removed a stale access token");
            }
            return Ok(RipplingOutput::NotLoggedIn);
        };

        client.revoke(&record.token).await?;
        store.delete()?;
        Ok(RipplingOutput::LogoutSuccessful)
    }
}
