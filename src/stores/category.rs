//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryName, DatabaseID, UserID},
};

/// Creates and retrieves transaction categories.
pub trait CategoryStore: Clone + Send + Sync + 'static {
    /// Create a new category owned by `user_id` and add it to the store.
    fn create(&self, name: CategoryName, user_id: UserID) -> Result<Category, Error>;

    /// Get a category by its ID.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error>;

    /// Get all categories visible to `user_id`: the user's own categories
    /// plus the default categories that have no owner.
    fn get_visible_to(&self, user_id: UserID) -> Result<Vec<Category>, Error>;

    /// Delete a category owned by `user_id`.
    ///
    /// Default categories have no owner and cannot be deleted this way.
    fn delete(&self, category_id: DatabaseID, user_id: UserID) -> Result<(), Error>;
}
