use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hashes a password into a PHC string (`$argon2id$v=19$m=..,t=..,p=..$salt$digest`).
/// Algorithm, cost parameters and salt travel inside the string.
pub fn hash_password(plaintext: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CryptoError::Hash(e.to_string()))
}

/// Well-formed hash with default cost parameters that matches no password.
/// Verified against when the account does not exist, so a login for an
/// unknown email costs the same as one with a wrong password.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$iAoshGnP8NoucXg4EnhK/A$KOmEiW69+Uf/LqR2AlRGVAHnFNLmwBqSqjC/TeTEOYE";

/// Checks a password against a stored PHC string.
/// A malformed or unsupported stored hash is a mismatch, not an error.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
