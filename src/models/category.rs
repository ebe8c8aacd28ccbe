//! This file defines the `Category` type and the types needed to create a category.
//!
//! A category labels transactions, e.g. 'Rent' or 'Salary'. A category with no
//! owner is a default category visible to every user; a user-owned category is
//! visible only to its owner.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// This function will return an error if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for expenses and income, e.g., 'Groceries', 'Eating Out', 'Wages'.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    id: DatabaseID,
    user_id: Option<UserID>,
    name: CategoryName,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Category {
    /// Create a new category.
    pub fn new(
        id: DatabaseID,
        user_id: Option<UserID>,
        name: CategoryName,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            created_at,
        }
    }

    /// The id of the category.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The id of the user that owns the category, or `None` for a default
    /// category shared by all users.
    pub fn user_id(&self) -> Option<UserID> {
        self.user_id
    }

    /// The name of the category.
    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    /// When the category was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::Error;

    use super::CategoryName;

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_whitespace_only_string() {
        let category_name = CategoryName::new("   ");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let category_name = CategoryName::new("🔥");

        assert!(category_name.is_ok())
    }
}
