use camino::{Utf8Path, Utf8PathBuf};
use directories_next::BaseDirs;

use crate::ConfigError;

use std::fs;

/// Name of the directory, under the user's home directory, that holds
/// all of rippling's local state.
const DEFAULT_DIR_NAME: &str = ".rippling";

/// Config allows end users to override default settings
/// usually determined by this crate. It is intended to
/// give library consumers a way to support environment variable
/// overrides for end users.
#[derive(Debug, Clone)]
pub struct Config {
    /// home is the path to the user's global config directory
    pub home: Utf8PathBuf,
}

impl Config {
    /// Creates a new instance of `Config`
    pub fn new(override_home: Option<&impl AsRef<Utf8Path>>) -> Result<Config, ConfigError> {
        let home = match override_home {
            Some(home) => {
                let home = home.as_ref();
                if home.exists() && !home.is_dir() {
                    return Err(ConfigError::InvalidOverrideConfigDir(home.to_string()));
                }
                home.to_path_buf()
            }
            None => {
                // Lin: /home/alice/.rippling
                // Win: C:\Users\Alice\.rippling
                // Mac: /Users/Alice/.rippling
                let home_dir = BaseDirs::new()
                    .ok_or(ConfigError::DefaultConfigDirNotFound)?
                    .home_dir()
                    .join(DEFAULT_DIR_NAME);
                Utf8PathBuf::try_from(home_dir)?
            }
        };

        tracing::debug!(config_home = %home);
        Ok(Config { home })
    }

    /// Removes all configuration files from filesystem
    pub fn clear(&self) -> Result<(), ConfigError> {
        tracing::debug!(home_dir = ?self.home);
        fs::remove_dir_all(&self.home).map_err(|_| ConfigError::NoConfigFound(self.home.to_string()))
    }
}
