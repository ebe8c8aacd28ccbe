/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Error, Row};
use time::OffsetDateTime;

use crate::stores::sqlite::{
    SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore, format_datetime,
};

/// The default categories every user can see.
///
/// Seeded once into the category table with no owner.
const DEFAULT_CATEGORIES: [&str; 13] = [
    "Salary",
    "Freelance",
    "Investment",
    "Gift",
    "Bonus",
    "Food & Beverage",
    "Transportation",
    "Shopping",
    "Rent",
    "Utilities",
    "Entertainment",
    "Health",
    "Education",
];

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type that the trait will map rows to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// # Errors
    /// Returns an error if a row is missing an expected column or a column
    /// contains an unexpected type.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, starting from the column `offset`.
    ///
    /// This is useful for tables that include joins with other tables.
    ///
    /// # Errors
    /// Returns an error if a row is missing an expected column or a column
    /// contains an unexpected type.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for the domain models and seed the default categories.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    SQLiteUserStore::create_table(connection)?;
    SQLiteCategoryStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;

    seed_default_categories(connection)?;

    Ok(())
}

/// Insert the default, user-less categories if they are not already present.
///
/// UNIQUE(user_id, name) does not catch duplicates here because SQLite treats
/// NULL owners as distinct, so each name is checked explicitly.
fn seed_default_categories(connection: &Connection) -> Result<(), Error> {
    let created_at = format_datetime(OffsetDateTime::now_utc());

    for name in DEFAULT_CATEGORIES {
        let count: i64 = connection.query_row(
            "SELECT COUNT(id) FROM category WHERE name = ?1 AND user_id IS NULL",
            [name],
            |row| row.get(0),
        )?;

        if count == 0 {
            connection.execute(
                "INSERT INTO category (user_id, name, created_at) VALUES (NULL, ?1, ?2)",
                (name, &created_at),
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::{DEFAULT_CATEGORIES, initialize};

    #[test]
    fn creates_tables_and_seeds_categories() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let category_count: i64 = connection
            .query_row(
                "SELECT COUNT(id) FROM category WHERE user_id IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(category_count, DEFAULT_CATEGORIES.len() as i64);
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();

        let category_count: i64 = connection
            .query_row(
                "SELECT COUNT(id) FROM category WHERE user_id IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(category_count, DEFAULT_CATEGORIES.len() as i64);
    }
}
