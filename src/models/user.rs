//! This file defines the `User` type and its ID newtype.

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::PasswordHash;

/// The integer ID of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from a database row ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// A registered user of the application.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: UserID,
    name: String,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl User {
    /// Create a new user.
    pub fn new(
        id: UserID,
        name: String,
        email: EmailAddress,
        password_hash: PasswordHash,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            created_at,
        }
    }

    /// The ID of the user.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The display name the user registered with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user's email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's salted and hashed password.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// When the user registered.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

#[cfg(test)]
mod user_tests {
    use time::OffsetDateTime;

    use crate::models::{PasswordHash, UserID};

    use super::User;

    #[test]
    fn serialization_omits_password_hash() {
        let user = User::new(
            UserID::new(1),
            "Alice".to_string(),
            "alice@example.com".parse().unwrap(),
            PasswordHash::new_unchecked("averysecrethash"),
            OffsetDateTime::UNIX_EPOCH,
        );

        let serialized = serde_json::to_string(&user).unwrap();

        assert!(!serialized.contains("password"));
        assert!(!serialized.contains("averysecrethash"));
        assert!(serialized.contains("alice@example.com"));
    }
}
