//! Argon2id password hashing, verification, and strength validation.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.
//!
//! Pre-migration customer tables may still hold plaintext passwords. Those
//! records never authenticate unless the legacy flag is set, and a successful
//! legacy login is expected to re-hash immediately (see [`verify_stored`]).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Outcome of verifying a password against a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMatch {
    /// Matched a PHC-formatted Argon2id hash.
    Hash,
    /// Matched a legacy plaintext-stored password (flag-gated). The caller
    /// must re-hash and persist before completing the login.
    Legacy,
    /// No match.
    NoMatch,
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Verify a password against whatever is stored for the customer.
///
/// A stored value that parses as a PHC string is verified with Argon2id. Any
/// other stored value is a legacy plaintext record: it matches (as
/// [`PasswordMatch::Legacy`]) only when `allow_legacy` is set, and is
/// otherwise rejected with a warning so the operator knows a migration is
/// outstanding.
pub fn verify_stored(
    password: &str,
    stored: &str,
    allow_legacy: bool,
) -> Result<PasswordMatch, argon2::password_hash::Error> {
    if stored.starts_with("$argon2") {
        return Ok(if verify_password(password, stored)? {
            PasswordMatch::Hash
        } else {
            PasswordMatch::NoMatch
        });
    }

    if !allow_legacy {
        tracing::warn!(
            "login attempt against a non-PHC stored credential; \
             run the password migration or set LEGACY_PLAINTEXT_LOGIN"
        );
        return Ok(PasswordMatch::NoMatch);
    }

    // Constant-time comparison; both sides are short strings.
    let matches = stored.len() == password.len()
        && stored
            .bytes()
            .zip(password.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0;

    Ok(if matches {
        PasswordMatch::Legacy
    } else {
        PasswordMatch::NoMatch
    })
}

/// Validate that a password meets minimum strength requirements.
///
/// Currently enforces a minimum character length. Returns `Ok(())` when the
/// password is acceptable, or `Err` with a human-readable explanation.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.len() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}
