//! Admin login management.
//!
//! # Usage
//!
//! ```bash
//! # Prints an Argon2 PHC string for ADMIN_PASSWORD_HASH
//! echo 'correct horse battery staple' | mm-cli admin hash-password
//! ```

use std::io::BufRead;

use thiserror::Error;

use mousse_melts_storefront::services::auth::{self, AuthError};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The password could not be read.
    #[error("Failed to read password: {0}")]
    Io(#[from] std::io::Error),

    /// No password was given.
    #[error("Password must not be empty")]
    EmptyPassword,

    /// Hashing failed or the password was too short.
    #[error("Could not hash password (at least 8 characters required): {0}")]
    Hash(#[from] AuthError),
}

/// Read a password from stdin and print its hash.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, the password is empty, or
/// hashing fails.
pub fn hash_password() -> Result<(), AdminError> {
    tracing::info!("Reading password from stdin...");

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(AdminError::EmptyPassword);
    }

    let hash = auth::hash_password(password)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{hash}");
    }
    tracing::info!("Set ADMIN_PASSWORD_HASH to the value above");
    Ok(())
}
