//! Implements a struct that holds the state of the REST server.

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::stores::{CategoryStore, TransactionStore, UserStore};

/// The key pair used for signing and verifying JSON Web Tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Derive a signing key pair from a secret string.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// The key used for signing tokens.
    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    /// The key used for verifying tokens.
    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState<C, T, U>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    jwt_keys: JwtKeys,
    timezone: String,
    category_store: C,
    transaction_store: T,
    user_store: U,
}

impl<C, T, U> AppState<C, T, U>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    /// Create a new [AppState].
    ///
    /// `timezone` should be a valid, canonical timezone name, e.g.
    /// "Asia/Jakarta". It sets the day boundaries for dashboard aggregation.
    pub fn new(
        jwt_secret: &str,
        timezone: &str,
        category_store: C,
        transaction_store: T,
        user_store: U,
    ) -> Self {
        Self {
            jwt_keys: JwtKeys::from_secret(jwt_secret),
            timezone: timezone.to_owned(),
            category_store,
            transaction_store,
            user_store,
        }
    }

    /// The key used for signing JSON Web Tokens.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding
    }

    /// The key used for verifying JSON Web Tokens.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding
    }

    /// The canonical timezone name used for dashboard day boundaries.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// The store for managing [categories](crate::models::Category).
    pub fn category_store(&self) -> &C {
        &self.category_store
    }

    /// The store for managing [transactions](crate::models::Transaction).
    pub fn transaction_store(&self) -> &T {
        &self.transaction_store
    }

    /// The store for managing [users](crate::models::User).
    pub fn user_store(&self) -> &U {
        &self.user_store
    }
}
