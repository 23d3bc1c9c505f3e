use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

fn credential_error(op: &'static str, e: argon2::password_hash::Error) -> anyhow::Error {
    error!(error = %e, op, "password hashing failure");
    anyhow::anyhow!("{op} password: {e}")
}

/// Argon2id with a fresh random salt per password. Only the PHC hash
/// string is ever stored.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| credential_error("hash", e))
}

/// A mismatch costs the same argon2 evaluation as a match, so login
/// timing reveals nothing about stored credentials.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| credential_error("parse", e))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_the_original_password() {
        let hash = hash_password("n0-dues-2026!").expect("hash");
        assert!(verify_password("n0-dues-2026!", &hash).expect("verify"));
        assert!(!verify_password("n0-dues-2025!", &hash).expect("verify"));
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let first = hash_password("repeatable").expect("hash");
        let second = hash_password("repeatable").expect("hash");
        assert_ne!(first, second);
        assert!(verify_password("repeatable", &second).expect("verify"));
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_mismatch() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
