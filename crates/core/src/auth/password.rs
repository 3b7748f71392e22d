//! Password hashing with Argon2id.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use omnigest_shared::AppError;
use thiserror::Error;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password does not meet the minimum length.
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,

    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => Self::Validation(err.to_string()),
            PasswordError::HashError(_) | PasswordError::VerifyError(_) | PasswordError::InvalidHash => {
                Self::Internal(err.to_string())
            }
        }
    }
}

/// Hashes a password using Argon2id and returns the PHC string.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` for passwords under the minimum length
/// and `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use omnigest_core::auth::hash_password;
///
/// let hash = hash_password("clave-segura").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored hash.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("contraseña-123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("contraseña-123", &hash).unwrap());
        assert!(!verify_password("otra-clave-123", &hash).unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(hash_password("corta"), Err(PasswordError::TooShort)));
    }

    #[test]
    fn test_salted_hashes_differ() {
        assert_ne!(
            hash_password("password1").unwrap(),
            hash_password("password1").unwrap()
        );
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "pbkdf2_sha256$legacy");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }
}
