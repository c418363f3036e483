//! Password policy and Argon2id hashing for stored accounts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Deserialize;

use crate::error::{ContactsError, Result};

/// Composition rules a password must satisfy before it is hashed.
///
/// Defaults match the usual identity-framework defaults: six characters with
/// at least one digit, one lowercase, one uppercase and one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordPolicy {
    #[serde(default = "default_required_length")]
    pub required_length: usize,
    #[serde(default = "default_true")]
    pub require_digit: bool,
    #[serde(default = "default_true")]
    pub require_lowercase: bool,
    #[serde(default = "default_true")]
    pub require_uppercase: bool,
    #[serde(default = "default_true")]
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            required_length: default_required_length(),
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

fn default_required_length() -> usize { 6 }
fn default_true() -> bool { true }

impl PasswordPolicy {
    /// A policy that accepts any non-empty password.
    pub fn permissive() -> Self {
        Self {
            required_length: 1,
            require_digit: false,
            require_lowercase: false,
            require_uppercase: false,
            require_non_alphanumeric: false,
        }
    }

    /// Check `password` against the policy.
    pub fn validate(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.required_length.max(1) {
            return Err(ContactsError::password_rejected(format!(
                "Password must be at least {} characters",
                self.required_length.max(1)
            )));
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ContactsError::password_rejected(
                "Password must contain at least one digit",
            ));
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            return Err(ContactsError::password_rejected(
                "Password must contain at least one lowercase letter",
            ));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(ContactsError::password_rejected(
                "Password must contain at least one uppercase letter",
            ));
        }

        if self.require_non_alphanumeric && password.chars().all(|c| c.is_alphanumeric()) {
            return Err(ContactsError::password_rejected(
                "Password must contain at least one non-alphanumeric character",
            ));
        }

        Ok(())
    }
}

/// Hash a password with Argon2id and a random salt. Returns a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC hash produced by [`hash_password`].
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
