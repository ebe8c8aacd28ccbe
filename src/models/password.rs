//! This file defines types that handle password validation and hashing.
//! `ValidatedPassword` wraps a string and ensures it is a strong password.
//! `PasswordHash` converts a `ValidatedPassword` into a salted and hashed password.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that has been validated, but not yet hashed.
///
/// This struct can be used to construct a [PasswordHash].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password is considered too weak.
    /// The error message will explain why the password is considered too weak and suggest how to make it stronger.
    pub fn new(raw_password_string: &str) -> Result<Self, Error> {
        let password_analysis = zxcvbn(raw_password_string, &[]);

        match password_analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password_string.to_string())),
            _ => Err(Error::TooWeak(
                password_analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Create a new `ValidatedPassword` without any validation.
    ///
    /// The caller should ensure that `raw_password_string` is a valid and secure password.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid password is provided it may cause incorrect behaviour but will not affect memory safety.
    pub fn new_unchecked(raw_password_string: &str) -> Self {
        Self(raw_password_string.to_string())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a validated password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        match hash(&password.0, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` from an already hashed string without any checks.
    ///
    /// The caller should ensure the string is a valid bcrypt hash.
    pub fn new_unchecked(password_hash: &str) -> Self {
        Self(password_hash.to_string())
    }

    /// Check whether `password` matches this hash.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the underlying hashing library fails,
    /// e.g. because the stored hash is malformed.
    pub fn matches(&self, password: &str) -> Result<bool, Error> {
        verify(password, &self.0).map_err(|e| Error::HashingError(e.to_string()))
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
