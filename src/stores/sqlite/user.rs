//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID},
    stores::UserStore,
    stores::sqlite::{format_datetime, normalize_utc, parse_datetime},
};

/// Handles the creation and retrieval of [User] objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateEmail] if the email is already registered, or
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(
        &self,
        name: &str,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        let created_at = normalize_utc(OffsetDateTime::now_utc());
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO user (name, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
            (
                name,
                &email.to_string(),
                password_hash.to_string(),
                format_datetime(created_at),
            ),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(
            id,
            name.to_string(),
            email,
            password_hash,
            created_at,
        ))
    }

    /// Get the user from the database that has the specified `id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no user with the specified ID or
    /// [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, email, password, created_at FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], SQLiteUserStore::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user from the database that has the specified `email` address.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no user with the specified email
    /// or [Error::SqlError] if there are SQL related errors.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, email, password, created_at FROM user WHERE email = :email")?
            .query_row(&[(":email", &email.to_string())], SQLiteUserStore::map_row)
            .map_err(|e| e.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<User, rusqlite::Error> {
        let email: String = row.get(offset + 2)?;
        let email = email.parse().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 2,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        let password_hash: String = row.get(offset + 3)?;

        Ok(User::new(
            UserID::new(row.get(offset)?),
            row.get(offset + 1)?,
            email,
            PasswordHash::new_unchecked(&password_hash),
            parse_datetime(offset + 4, row.get(offset + 4)?)?,
        ))
    }
}
