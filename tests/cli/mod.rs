mod explain;
mod login;
mod logout;
mod status;

use assert_cmd::Command;
use assert_fs::TempDir;
use camino::Utf8PathBuf;
use rippling::utils::env::RipplingEnvKey;
use rippling_config::TokenStore;

/// A `rippling` invocation isolated in its own config home, with colors off.
fn rippling(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rippling").unwrap();
    cmd.env(RipplingEnvKey::ConfigHome.to_string(), home.path())
        .env("NO_COLOR", "1")
        .env_remove(RipplingEnvKey::ClientId.to_string())
        .env_remove(RipplingEnvKey::ClientSecret.to_string())
        .env_remove(RipplingEnvKey::Log.to_string());
    cmd
}

fn token_store(home: &TempDir) -> TokenStore {
    let path = Utf8PathBuf::try_from(home.path().join("oauth_token.json")).unwrap();
    TokenStore::with_path(path)
}
