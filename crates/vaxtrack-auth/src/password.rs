//! Password policy and salted hashing.
//!
//! Plaintext passwords exist only transiently inside registration and
//! sign-in flows. What the record store keeps is a `salt$digest` string:
//! a per-user random salt and the SHA-256 digest of salt plus password,
//! both hex-encoded.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Minimum accepted password length.
pub const MIN_LENGTH: usize = 5;

/// Characters of which at least one must appear in a password.
pub const SPECIAL_CHARACTERS: [char; 8] = ['!', '@', '#', '$', '%', '^', '&', '*'];

/// Bytes of salt generated per password.
const SALT_LENGTH: usize = 16;

/// Whether a candidate password satisfies the policy.
#[must_use]
pub fn meets_policy(password: &str) -> bool {
    password.chars().count() >= MIN_LENGTH
        && password.chars().any(|c| SPECIAL_CHARACTERS.contains(&c))
}

/// Derive a fresh `salt$digest` hash for a password.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    hash_with_salt(&salt, password)
}

/// Check a candidate password against a stored `salt$digest` hash.
///
/// A malformed stored value simply fails the check.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, _)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    hash_with_salt(&salt, password) == stored
}

fn hash_with_salt(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    format!("{}${}", hex::encode(salt), hex::encode(hasher.finalize()))
}
