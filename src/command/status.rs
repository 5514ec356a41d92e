use chrono::Utc;
use clap::Parser;
use rippling_config::TokenStore;

use crate::{RipplingOutput, RipplingResult};

#[derive(Debug, Default, Parser)]
pub struct Status {}

impl Status {
    /// Reports on the stored token without contacting the server.
    pub fn run(&self, store: &TokenStore) -> RipplingResult<RipplingOutput> {
        let now = Utc::now();
        let status = store.load().and_then(|record| {
            let remaining = record.remaining_at(now)?;
            let expires_at = record.expires_at()?;
            Some(RipplingOutput::LoggedIn {
                expires_at,
                remaining,
            })
        });
        Ok(status.unwrap_or(RipplingOutput::NotLoggedIn))
    }
}
