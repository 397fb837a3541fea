//! Admin authentication.
//!
//! There is a single configured admin. The password is checked against an
//! argon2 hash; the plaintext is never stored or compared.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use crate::config::AdminAuthConfig;

/// Message shown for any failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Minimum password length accepted by [`hash_password`].
const MIN_PASSWORD_LENGTH: usize = 8;

/// The configured admin login.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: SecretString,
}

impl AdminCredentials {
    #[must_use]
    pub fn new(config: &AdminAuthConfig) -> Self {
        Self {
            username: config.username.clone(),
            password_hash: config.password_hash.clone(),
        }
    }

    /// The admin username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a login attempt.
    ///
    /// The password is always verified, even when the username is wrong.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if either field is wrong, and
    /// `AuthError::PasswordHash` if the configured hash cannot be parsed.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let password_ok = verify_password(password, self.password_hash.expose_secret())?;
        if password_ok && username.trim() == self.username {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if the password is shorter than
/// eight characters or hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordHash);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC hash string.
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn credentials(password: &str) -> AdminCredentials {
        AdminCredentials::new(&AdminAuthConfig {
            username: "baker".to_string(),
            password_hash: SecretString::from(hash_password(password).unwrap()),
        })
    }

    #[test]
    fn test_hash_and_verify() {
        let creds = credentials("mousse-n-melts");
        assert!(creds.verify("baker", "mousse-n-melts").is_ok());
        assert!(creds.verify(" baker ", "mousse-n-melts").is_ok());
    }

    #[test]
    fn test_wrong_password_or_username() {
        let creds = credentials("mousse-n-melts");
        assert!(matches!(
            creds.verify("baker", "wrong-password"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            creds.verify("intruder", "mousse-n-melts"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(hash_password("short"), Err(AuthError::PasswordHash)));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("mousse-n-melts").unwrap();
        let second = hash_password("mousse-n-melts").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let output = format!("{:?}", credentials("mousse-n-melts"));
        assert!(output.contains("baker"));
        assert!(!output.contains("argon2"));
    }
}
