//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseID, UserID},
    stores::CategoryStore,
    stores::sqlite::{format_datetime, normalize_utc, parse_datetime},
};

/// Handles the creation and retrieval of [Category] objects.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create and insert a new category into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateCategoryName] if the user already has a
    /// category with this name, or [Error::SqlError] if an SQL related error
    /// occurred.
    fn create(&self, name: CategoryName, user_id: UserID) -> Result<Category, Error> {
        let created_at = normalize_utc(OffsetDateTime::now_utc());
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO category (user_id, name, created_at) VALUES (?1, ?2, ?3)",
            (
                user_id.as_i64(),
                name.as_ref(),
                format_datetime(created_at),
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Category::new(id, Some(user_id), name, created_at))
    }

    /// Get a category by its ID.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if `category_id` does not refer to a valid
    /// category or [Error::SqlError] if there are SQL related errors.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, user_id, name, created_at FROM category WHERE id = :id")?
            .query_row(&[(":id", &category_id)], SQLiteCategoryStore::map_row)
            .map_err(|e| e.into())
    }

    /// Get the categories visible to `user_id`: their own plus the default
    /// categories without an owner.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if there are SQL related errors.
    fn get_visible_to(&self, user_id: UserID) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, created_at FROM category \
                WHERE user_id = :user_id OR user_id IS NULL \
                ORDER BY name ASC",
            )?
            .query_map(
                &[(":user_id", &user_id.as_i64())],
                SQLiteCategoryStore::map_row,
            )?
            .map(|maybe_category| maybe_category.map_err(Error::SqlError))
            .collect()
    }

    /// Delete a category owned by `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if `category_id` does not refer to a
    /// category owned by `user_id` (default categories cannot be deleted), or
    /// [Error::SqlError] if there are SQL related errors.
    fn delete(&self, category_id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER,
                    name TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    UNIQUE(user_id, name),
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
        let user_id: Option<i64> = row.get(offset + 1)?;
        let name: String = row.get(offset + 2)?;

        Ok(Category::new(
            row.get(offset)?,
            user_id.map(UserID::new),
            CategoryName::new_unchecked(&name),
            parse_datetime(offset + 3, row.get(offset + 3)?)?,
        ))
    }
}

#[cfg(test)]
mod category_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{CategoryName, PasswordHash, User},
        stores::{CategoryStore, UserStore, sqlite::SQLiteUserStore},
    };

    use super::SQLiteCategoryStore;

    fn get_test_store_and_user() -> (SQLiteCategoryStore, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let connection = Arc::new(Mutex::new(connection));
        let user = SQLiteUserStore::new(connection.clone())
            .create(
                "Alice",
                "alice@example.com".parse().unwrap(),
                PasswordHash::new_unchecked("notahash"),
            )
            .unwrap();

        (SQLiteCategoryStore::new(connection), user)
    }

    #[test]
    fn create_and_get_category() {
        let (store, user) = get_test_store_and_user();

        let inserted = store
            .create(CategoryName::new_unchecked("Groceries"), user.id())
            .unwrap();

        let selected = store.get(inserted.id()).unwrap();

        assert_eq!(inserted, selected);
        assert_eq!(selected.user_id(), Some(user.id()));
    }

    #[test]
    fn get_visible_includes_defaults_and_own_categories() {
        let (store, user) = get_test_store_and_user();

        let own = store
            .create(CategoryName::new_unchecked("Groceries"), user.id())
            .unwrap();

        let visible = store.get_visible_to(user.id()).unwrap();

        assert!(visible.contains(&own));
        assert!(
            visible
                .iter()
                .any(|category| category.user_id().is_none() && category.name().as_ref() == "Rent")
        );
    }

    #[test]
    fn get_visible_excludes_other_users_categories() {
        let (store, user) = get_test_store_and_user();

        store
            .create(CategoryName::new_unchecked("Secret"), user.id())
            .unwrap();
        let visible = store.get_visible_to(crate::models::UserID::new(user.id().as_i64() + 1));

        assert!(
            visible
                .unwrap()
                .iter()
                .all(|category| category.name().as_ref() != "Secret")
        );
    }

    #[test]
    fn create_fails_on_duplicate_name_for_same_user() {
        let (store, user) = get_test_store_and_user();

        store
            .create(CategoryName::new_unchecked("Groceries"), user.id())
            .unwrap();
        let result = store.create(CategoryName::new_unchecked("Groceries"), user.id());

        assert_eq!(result, Err(Error::DuplicateCategoryName));
    }

    #[test]
    fn delete_removes_owned_category() {
        let (store, user) = get_test_store_and_user();

        let category = store
            .create(CategoryName::new_unchecked("Groceries"), user.id())
            .unwrap();

        store.delete(category.id(), user.id()).unwrap();

        assert_eq!(store.get(category.id()), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_default_category() {
        let (store, user) = get_test_store_and_user();

        let default_category = store
            .get_visible_to(user.id())
            .unwrap()
            .into_iter()
            .find(|category| category.user_id().is_none())
            .unwrap();

        let result = store.delete(default_category.id(), user.id());

        assert_eq!(result, Err(Error::NotFound));
    }
}
