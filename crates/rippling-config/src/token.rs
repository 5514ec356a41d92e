use camino::Utf8PathBuf;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rippling_std::Fs;
use serde::{Deserialize, Serialize};

use crate::{mask_secret, Config, ConfigError};

/// File name of the persisted token, relative to the config home.
pub const TOKEN_FILE_NAME: &str = "oauth_token.json";

/// An access token together with the absolute point in time it stops being valid.
///
/// Serialized as `{ "token": string, "expiration_timestamp": float }`, the
/// timestamp being Unix epoch seconds. Expiry is derived from these two
/// stored fields alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// the opaque access token
    pub token: String,

    /// Unix epoch seconds after which `token` must no longer be used
    pub expiration_timestamp: f64,
}

impl TokenRecord {
    /// Builds a record for a token the authorization server said is valid
    /// for `expires_in` seconds, counted from `issued_at`.
    pub fn issue(token: impl Into<String>, expires_in: u64, issued_at: DateTime<Utc>) -> Self {
        let expires_at = i64::try_from(expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            token: token.into(),
            expiration_timestamp: epoch_seconds(expires_at),
        }
    }

    /// `true` once `now` is past the expiration timestamp, or when the
    /// stored timestamp isn't a usable number.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.expiration_timestamp.is_finite() || epoch_seconds(now) > self.expiration_timestamp
    }

    /// The expiration timestamp as a point in time.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if !self.expiration_timestamp.is_finite() {
            return None;
        }
        let millis = (self.expiration_timestamp * 1000.0).round() as i64;
        Utc.timestamp_millis_opt(millis).single()
    }

    /// How long the token remains valid, if it is still valid at `now`.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.is_expired_at(now) {
            return None;
        }
        self.expires_at().map(|expires_at| expires_at - now)
    }
}

fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

/// File-based token storage at `$RIPPLING_CONFIG_HOME/oauth_token.json`.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: Utf8PathBuf,
}

impl TokenStore {
    /// Token storage inside the given configuration home.
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.home.join(TOKEN_FILE_NAME),
        }
    }

    /// Token storage at a specific path.
    pub fn with_path(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the token file lives.
    pub const fn path(&self) -> &Utf8PathBuf {
        &self.path
    }

    /// Persists `token` with an expiration `expires_in` seconds from now,
    /// creating the config home if it is missing.
    pub fn save(&self, token: &str, expires_in: u64) -> Result<TokenRecord, ConfigError> {
        let record = TokenRecord::issue(token, expires_in, Utc::now());
        self.write(&record)?;
        Ok(record)
    }

    /// Persists an already-built record, replacing whatever was stored before.
    pub fn write(&self, record: &TokenRecord) -> Result<(), ConfigError> {
        let data = serde_json::to_string(record)?;
        Fs::write_file_owner_only(&self.path, data).map_err(|source| {
            ConfigError::TokenPersistence {
                path: self.path.clone(),
                source,
            }
        })?;
        tracing::debug!(
            path = %self.path,
            token = %mask_secret(&record.token),
            expiration_timestamp = record.expiration_timestamp,
            "saved access token"
        );
        Ok(())
    }

    /// Loads the stored token. A missing, unreadable or corrupt file all
    /// yield `None`.
    pub fn load(&self) -> Option<TokenRecord> {
        let contents = match Fs::read_file(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::trace!(path = %self.path, error = %e, "no token file");
                return None;
            }
        };
        match serde_json::from_str::<TokenRecord>(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(path = %self.path, error = %e, "ignoring unreadable token file");
                None
            }
        }
    }

    /// `true` whenever no expiration timestamp can be found, or the
    /// current time is past it.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`TokenStore::is_expired`], measured against `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.load().is_none_or(|record| record.is_expired_at(now))
    }

    /// The stored token, provided it has not expired.
    pub fn valid_token(&self) -> Option<TokenRecord> {
        let now = Utc::now();
        self.load().filter(|record| !record.is_expired_at(now))
    }

    /// Removes the token file. Returns whether there was anything to remove.
    pub fn delete(&self) -> Result<bool, ConfigError> {
        let existed = Fs::path_is_file(&self.path);
        Fs::remove_file(&self.path)?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;
    use chrono::{Duration, Utc};
    use rstest::rstest;
    use speculoos::prelude::*;

    use super::*;

    fn temp_store() -> (TempDir, TokenStore) {
        let tmp = TempDir::new().unwrap();
        let home = Utf8PathBuf::try_from(tmp.path().join("home")).unwrap();
        let config = Config::new(Some(&home)).unwrap();
        (tmp, TokenStore::new(&config))
    }

    fn record_expiring_in(seconds: i64) -> TokenRecord {
        let at = Utc::now() + Duration::seconds(seconds);
        TokenRecord {
            token: "abc".to_string(),
            expiration_timestamp: epoch_seconds(at),
        }
    }

    #[rstest]
    #[case::long_past(-3600, true)]
    #[case::just_past(-10, true)]
    #[case::one_second_left(2, false)]
    #[case::an_hour_left(3600, false)]
    fn it_reports_expiry_from_the_stored_timestamp(#[case] offset: i64, #[case] expired: bool) {
        let (_tmp, store) = temp_store();
        store.write(&record_expiring_in(offset)).unwrap();

        assert_eq!(store.is_expired(), expired);
    }

    #[test]
    fn it_treats_a_missing_file_as_expired() {
        let (_tmp, store) = temp_store();

        assert_that!(store.load()).is_none();
        assert!(store.is_expired());
        assert_that!(store.valid_token()).is_none();
    }

    #[rstest]
    #[case::not_json("this is not json")]
    #[case::no_timestamp(r#"{"token":"abc"}"#)]
    #[case::null_timestamp(r#"{"token":"abc","expiration_timestamp":null}"#)]
    #[case::wrong_type(r#"{"token":"abc","expiration_timestamp":"tomorrow"}"#)]
    fn it_treats_a_corrupt_file_as_absent(#[case] contents: &str) {
        let (_tmp, store) = temp_store();
        Fs::write_file(store.path(), contents).unwrap();

        assert_that!(store.load()).is_none();
        assert!(store.is_expired());
    }

    #[test]
    fn save_creates_the_config_home_and_writes_the_documented_shape() {
        let (_tmp, store) = temp_store();
        let before = epoch_seconds(Utc::now());

        let record = store.save("tok1", 3600).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["token"], "tok1");
        let stored = json["expiration_timestamp"].as_f64().unwrap();
        assert_eq!(stored, record.expiration_timestamp);
        assert!(stored >= before + 3600.0);
        assert!(stored <= epoch_seconds(Utc::now()) + 3600.0);
        assert!(!store.is_expired());
    }

    #[cfg(unix)]
    #[test]
    fn save_writes_a_file_only_the_owner_can_read() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, store) = temp_store();
        store.save("tok1", 3600).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn save_overwrites_a_previous_login() {
        let (_tmp, store) = temp_store();
        store.write(&record_expiring_in(-10)).unwrap();

        store.save("fresh", 60).unwrap();

        assert_that!(store.valid_token().map(|r| r.token)).contains_value("fresh".to_string());
    }

    #[test]
    fn delete_reports_whether_a_token_existed() {
        let (_tmp, store) = temp_store();
        assert!(!store.delete().unwrap());

        store.save("tok", 60).unwrap();
        assert!(store.delete().unwrap());
        assert!(store.is_expired());
    }

    #[test]
    fn remaining_is_only_reported_for_live_tokens() {
        let now = Utc::now();
        let live = TokenRecord::issue("tok", 120, now);
        let remaining = live.remaining_at(now).unwrap();
        assert!(remaining <= Duration::seconds(120));
        assert!(remaining >= Duration::seconds(119));

        let dead = TokenRecord::issue("tok", 0, now - Duration::seconds(5));
        assert_that!(dead.remaining_at(now)).is_none();
    }

    #[test]
    fn non_finite_timestamps_are_expired() {
        let record = TokenRecord {
            token: "abc".to_string(),
            expiration_timestamp: f64::NAN,
        };
        assert!(record.is_expired_at(Utc::now()));
        assert_that!(record.expires_at()).is_none();
    }
}
