#![cfg_attr(not(test), deny(clippy::panic,))]
#![deny(missing_docs)]

//! Utilities for configuring the rippling CLI tool: where its per-user
//! state lives, and the persisted OAuth access token.

mod config;
mod error;
mod mask;
mod token;

pub use config::Config;
pub use error::ConfigError;
pub use mask::mask_secret;
pub use token::{TokenRecord, TokenStore, TOKEN_FILE_NAME};
