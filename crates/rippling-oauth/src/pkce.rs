//! Proof Key for Code Exchange (RFC 7636) verifier and challenge generation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::{ChallengeMethod, OAuthError, PkcePair, DEFAULT_VERIFIER_LENGTH};

pub const MIN_VERIFIER_LENGTH: usize = 43;
pub const MAX_VERIFIER_LENGTH: usize = 128;

/// The unreserved URL characters a verifier may contain.
const UNRESERVED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Generates a fresh S256 pair with a verifier of the default length.
pub fn generate() -> PkcePair {
    pair(DEFAULT_VERIFIER_LENGTH, ChallengeMethod::S256)
}

/// Generates a fresh pair, rejecting any method other than S256 and
/// verifier lengths outside 43..=128.
pub fn generate_with(verifier_length: usize, method: &str) -> Result<PkcePair, OAuthError> {
    let method: ChallengeMethod = method.parse()?;
    if !(MIN_VERIFIER_LENGTH..=MAX_VERIFIER_LENGTH).contains(&verifier_length) {
        return Err(OAuthError::InvalidVerifierLength(verifier_length));
    }
    Ok(pair(verifier_length, method))
}

/// Derives the challenge sent on the front channel from a verifier.
pub fn code_challenge(code_verifier: &str, method: ChallengeMethod) -> String {
    match method {
        ChallengeMethod::S256 => URL_SAFE_NO_PAD.encode(Sha256::digest(code_verifier.as_bytes())),
    }
}

fn pair(verifier_length: usize, method: ChallengeMethod) -> PkcePair {
    let code_verifier = random_verifier(verifier_length);
    let code_challenge = code_challenge(&code_verifier, method);
    PkcePair {
        code_verifier,
        code_challenge,
        method,
    }
}

fn random_verifier(length: usize) -> String {
    // ThreadRng is a CSPRNG seeded from the OS.
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(UNRESERVED[rng.random_range(0..UNRESERVED.len())]))
        .collect()
}
