//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore: Clone + Send + Sync + 'static {
    /// Create a new user in the store.
    fn create(
        &self,
        name: &str,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<User, Error>;

    /// Get the user that has the specified `id`.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get the user that has the specified `email` address.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;
}
