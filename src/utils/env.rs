use std::collections::HashMap;
use std::{env, fmt, io};

use heck::ToShoutySnakeCase;
use rippling_config::mask_secret;

/// RipplingEnv allows us to mock environment variables while
/// running tests. That way we can run our tests in parallel,
/// and our local development environment will not have unintended
/// side effects on our tests.
#[derive(Debug, Clone)]
pub struct RipplingEnv {
    mock_store: Option<HashMap<String, String>>,
}

impl Default for RipplingEnv {
    fn default() -> RipplingEnv {
        RipplingEnv::new()
    }
}

impl RipplingEnv {
    /// creates a new environment variable store
    pub fn new() -> RipplingEnv {
        let mock_store = if cfg!(test) {
            Some(HashMap::new())
        } else {
            None
        };

        RipplingEnv { mock_store }
    }

    /// returns the value of the environment variable if it exists
    pub fn get(&self, key: RipplingEnvKey) -> io::Result<Option<String>> {
        let key_str = key.to_string();
        tracing::trace!("Checking for ${}", &key_str);
        let result = match &self.mock_store {
            Some(mock_store) => Ok(mock_store.get(&key_str).map(|v| v.to_owned())),
            None => match env::var(&key_str) {
                Ok(data) => Ok(Some(data)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(env::VarError::NotUnicode(_)) => Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "The value of the environment variable \"{}\" is not valid Unicode.",
                        &key_str
                    ),
                )),
            },
        }?;

        if let Some(result) = &result {
            tracing::debug!("read {}", self.get_debug_value(key, result));
        } else {
            tracing::trace!("could not find ${}", &key_str);
        }

        Ok(result)
    }

    fn get_debug_value(&self, key: RipplingEnvKey, value: &str) -> String {
        let value = if let RipplingEnvKey::ClientSecret = key {
            mask_secret(value)
        } else {
            value.to_string()
        };

        format!("environment variable ${} = {}", key, value)
    }

    /// sets a mocked environment variable to a value
    #[cfg(test)]
    pub fn insert(&mut self, key: RipplingEnvKey, value: &str) {
        tracing::debug!("writing {}", self.get_debug_value(key, value));
        if let Some(mock_store) = &mut self.mock_store {
            mock_store.insert(key.to_string(), value.into());
        }
    }

    /// unsets a mocked environment variable
    #[cfg(test)]
    pub fn remove(&mut self, key: RipplingEnvKey) {
        tracing::debug!("removing {}", key);
        if let Some(mock_store) = &mut self.mock_store {
            mock_store.remove(&key.to_string());
        }
    }
}

/// RipplingEnvKey defines all of the environment variables
/// that are respected by rippling. Any time a new environment variable
/// is added to the public contract, it should be defined here.
/// Each environment variable is prefixed with `RIPPLING_` and
/// the suffix is the name of the key defined here. It will automatically
/// be converted from CamelCase to SHOUTY_SNAKE_CASE.
/// For example, `RipplingEnvKey::ConfigHome.to_string()` becomes `RIPPLING_CONFIG_HOME`
#[derive(Debug, Copy, Clone)]
pub enum RipplingEnvKey {
    ConfigHome,
    ClientId,
    ClientSecret,
    AuthUrl,
    ApiUrl,
    Log,
}

impl fmt::Display for RipplingEnvKey {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let dbg = format!("{:?}", self).to_shouty_snake_case();
        write!(fmt, "RIPPLING_{}", &dbg)
    }
}
