use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::error::ApiError;

pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

/// Checks a submitted password against the stored PHC-format hash. A mismatch
/// is `Unauthorized` so credential failures stay on one uniform path; a hash
/// that cannot be parsed is a server-side fault, never a client error.
pub fn check_password(plain: &str, stored_hash: &str) -> Result<(), ApiError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("stored password hash unreadable: {e}")))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(()),
        Err(HashError::Password) => Err(ApiError::Unauthorized),
        Err(e) => Err(ApiError::Internal(anyhow::anyhow!(
            "password verification failed: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_passes() {
        let hash = hash_password("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(check_password("Secur3P@ssw0rd!", &hash).is_ok());
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        let err = check_password("wrong-password", &hash).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn unparseable_stored_hash_is_an_internal_fault() {
        let err = check_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
