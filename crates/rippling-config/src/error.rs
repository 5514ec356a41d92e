use std::io;

use camino::Utf8PathBuf;
use rippling_std::RipplingStdError;
use thiserror::Error;

/// ConfigError is the type of Error that occured.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// DefaultConfigDirNotFound occurs when the user's home directory can't be found.
    #[error("Could not determine the default configuration directory.")]
    DefaultConfigDirNotFound,

    /// InvalidOverrideConfigDir occurs when a user provides a path to a non-directory.
    #[error("'{0}' already exists and is not a directory.")]
    InvalidOverrideConfigDir(String),

    /// NoConfigFound occurs when the configuration directory can't be found.
    #[error("Could not find a configuration directory at '{0}'.")]
    NoConfigFound(String),

    /// TokenPersistence occurs when an access token could not be durably written.
    #[error("Could not save the access token to '{path}'.")]
    TokenPersistence {
        /// where the token was being written
        path: Utf8PathBuf,
        /// what went wrong
        #[source]
        source: RipplingStdError,
    },

    /// PathNotUtf8 occurs when a file path that is not valid UTF-8 is encountered
    #[error(transparent)]
    PathNotUtf8(#[from] camino::FromPathBufError),

    /// JsonSerialization occurs when a token record can't be serialized to a String.
    #[error(transparent)]
    JsonSerialization(#[from] serde_json::Error),

    /// io::Error occurs when any given std::io::Error arises.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// RipplingStdError comes from RipplingStdError
    #[error(transparent)]
    RipplingStdError(#[from] RipplingStdError),
}
