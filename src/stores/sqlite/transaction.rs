//! Implements a SQLite backed transaction store, including the aggregation
//! queries the dashboard is built from.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Amount, DatabaseID, Transaction, TransactionKind, UserID},
    stores::sqlite::{format_datetime, normalize_utc, parse_datetime},
    stores::{CategorySum, DailySum, Interval, KindTotals, NewTransaction, TransactionQuery,
        TransactionStore},
};

const SELECT_COLUMNS: &str = "SELECT t.id, t.user_id, t.kind, t.category_id, c.name, t.amount, \
    t.description, t.date, t.created_at, t.updated_at \
    FROM \"transaction\" t LEFT JOIN category c ON t.category_id = c.id";

/// Handles the creation, retrieval and aggregation of transactions in a
/// SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Check that `category_id` refers to a category that `user_id` may
    /// attach transactions to: one of their own or an ownerless default.
    fn validate_category(
        connection: &Connection,
        category_id: DatabaseID,
        user_id: UserID,
    ) -> Result<(), Error> {
        let owner: Option<i64> = connection
            .query_row(
                "SELECT user_id FROM category WHERE id = :id",
                &[(":id", &category_id)],
                |row| row.get(0),
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::InvalidCategory,
                error => error.into(),
            })?;

        match owner {
            None => Ok(()),
            Some(owner_id) if owner_id == user_id.as_i64() => Ok(()),
            Some(_) => Err(Error::InvalidCategory),
        }
    }

    fn get_by_id(connection: &Connection, transaction_id: DatabaseID) -> Result<Transaction, Error> {
        connection
            .prepare(&format!("{SELECT_COLUMNS} WHERE t.id = :id"))?
            .query_row(&[(":id", &transaction_id)], Self::map_row)
            .map_err(|e| e.into())
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCategory] if the referenced category does not
    /// exist or belongs to another user, or [Error::SqlError] if there are
    /// SQL related errors.
    fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        if let Some(category_id) = new_transaction.category_id {
            Self::validate_category(&connection, category_id, new_transaction.user_id)?;
        }

        let now = normalize_utc(OffsetDateTime::now_utc());
        let date = normalize_utc(new_transaction.date);

        connection.execute(
            "INSERT INTO \"transaction\" \
            (user_id, kind, category_id, amount, description, date, created_at, updated_at) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                new_transaction.user_id.as_i64(),
                new_transaction.kind,
                new_transaction.category_id,
                new_transaction.amount,
                &new_transaction.description,
                format_datetime(date),
                format_datetime(now),
                format_datetime(now),
            ),
        )?;

        let id = connection.last_insert_rowid();

        Self::get_by_id(&connection, id)
    }

    /// Replace the transaction with ID `transaction_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the transaction does not exist or is
    /// owned by another user, [Error::InvalidCategory] if the new category is
    /// not visible to the user, or [Error::SqlError] if there are SQL related
    /// errors.
    fn update(
        &self,
        transaction_id: DatabaseID,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        if let Some(category_id) = new_transaction.category_id {
            Self::validate_category(&connection, category_id, new_transaction.user_id)?;
        }

        let rows_affected = connection.execute(
            "UPDATE \"transaction\" \
            SET kind = ?1, category_id = ?2, amount = ?3, description = ?4, date = ?5, \
            updated_at = ?6 \
            WHERE id = ?7 AND user_id = ?8",
            (
                new_transaction.kind,
                new_transaction.category_id,
                new_transaction.amount,
                &new_transaction.description,
                format_datetime(normalize_utc(new_transaction.date)),
                format_datetime(normalize_utc(OffsetDateTime::now_utc())),
                transaction_id,
                new_transaction.user_id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Self::get_by_id(&connection, transaction_id)
    }

    /// Delete the transaction with ID `transaction_id` owned by `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the transaction does not exist or is
    /// owned by another user, or [Error::SqlError] if there are SQL related
    /// errors.
    fn delete(&self, transaction_id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (transaction_id, user_id.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Retrieve a user's transactions, newest first.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn get_for_user(
        &self,
        user_id: UserID,
        query: TransactionQuery,
    ) -> Result<Vec<Transaction>, Error> {
        let mut sql = format!("{SELECT_COLUMNS} WHERE t.user_id = ?");
        let mut params = vec![Value::Integer(user_id.as_i64())];

        if let Some(category_id) = query.category_id {
            sql.push_str(" AND t.category_id = ?");
            params.push(Value::Integer(category_id));
        }

        if let Some(date_from) = query.date_from {
            sql.push_str(" AND t.date >= ?");
            params.push(Value::Text(format_datetime(date_from)));
        }

        if let Some(date_before) = query.date_before {
            sql.push_str(" AND t.date < ?");
            params.push(Value::Text(format_datetime(date_before)));
        }

        sql.push_str(" ORDER BY t.date DESC, t.id DESC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(limit as i64));
        }

        self.connection
            .lock()
            .unwrap()
            .prepare(&sql)?
            .query_map(params_from_iter(params.iter()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Sum a user's transaction amounts per kind, optionally restricted to
    /// `interval`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn sum_by_kind(
        &self,
        user_id: UserID,
        interval: Option<&Interval>,
    ) -> Result<KindTotals, Error> {
        let mut sql =
            String::from("SELECT kind, SUM(amount) FROM \"transaction\" WHERE user_id = ?");
        let mut params = vec![Value::Integer(user_id.as_i64())];

        if let Some(interval) = interval {
            sql.push_str(" AND date >= ? AND date < ?");
            params.push(Value::Text(format_datetime(interval.start)));
            params.push(Value::Text(format_datetime(interval.end)));
        }

        sql.push_str(" GROUP BY kind");

        let connection = self.connection.lock().unwrap();
        let mut statement = connection.prepare(&sql)?;
        let rows = statement.query_map(params_from_iter(params.iter()), |row| {
            let kind: TransactionKind = row.get(0)?;
            let total: Amount = row.get(1)?;
            Ok((kind, total))
        })?;

        let mut totals = KindTotals::default();

        for row in rows {
            let (kind, total) = row?;
            match kind {
                TransactionKind::Income => totals.income = total,
                TransactionKind::Expense => totals.expense = total,
            }
        }

        Ok(totals)
    }

    /// Sum a user's transaction amounts per calendar day and kind within
    /// `interval`.
    ///
    /// SQLite only sees UTC datetimes, so the day boundary is applied here:
    /// each transaction's datetime is shifted to `offset` before its calendar
    /// day is taken.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn daily_sums(
        &self,
        user_id: UserID,
        interval: &Interval,
        offset: UtcOffset,
    ) -> Result<Vec<DailySum>, Error> {
        let connection = self.connection.lock().unwrap();
        let mut statement = connection.prepare(
            "SELECT kind, amount, date FROM \"transaction\" \
            WHERE user_id = :user_id AND date >= :start AND date < :end",
        )?;
        let rows = statement.query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":start": format_datetime(interval.start),
                ":end": format_datetime(interval.end),
            },
            |row| {
                let kind: TransactionKind = row.get(0)?;
                let amount: Amount = row.get(1)?;
                let date = parse_datetime(2, row.get(2)?)?;
                Ok((kind, amount, date))
            },
        )?;

        let mut totals = BTreeMap::new();

        for row in rows {
            let (kind, amount, date) = row?;
            let day = date.to_offset(offset).date();
            let entry = totals.entry((day, kind)).or_insert(Amount::ZERO);
            *entry = *entry + amount;
        }

        Ok(totals
            .into_iter()
            .map(|((date, kind), total)| DailySum { date, kind, total })
            .collect())
    }

    /// Sum a user's expense amounts per category, optionally restricted to
    /// `interval`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    fn category_expense_sums(
        &self,
        user_id: UserID,
        interval: Option<&Interval>,
    ) -> Result<Vec<CategorySum>, Error> {
        let mut sql = String::from(
            "SELECT c.name, SUM(t.amount) FROM \"transaction\" t \
            LEFT JOIN category c ON t.category_id = c.id \
            WHERE t.user_id = ? AND t.kind = 'expense'",
        );
        let mut params = vec![Value::Integer(user_id.as_i64())];

        if let Some(interval) = interval {
            sql.push_str(" AND t.date >= ? AND t.date < ?");
            params.push(Value::Text(format_datetime(interval.start)));
            params.push(Value::Text(format_datetime(interval.end)));
        }

        sql.push_str(" GROUP BY c.name");

        self.connection
            .lock()
            .unwrap()
            .prepare(&sql)?
            .query_map(params_from_iter(params.iter()), |row| {
                Ok(CategorySum {
                    category_name: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .map(|maybe_sum| maybe_sum.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                    category_id INTEGER,
                    amount INTEGER NOT NULL,
                    description TEXT NOT NULL,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE SET NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Transaction, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            kind: row.get(offset + 2)?,
            category_id: row.get(offset + 3)?,
            category_name: row.get(offset + 4)?,
            amount: row.get(offset + 5)?,
            description: row.get(offset + 6)?,
            date: parse_datetime(offset + 7, row.get(offset + 7)?)?,
            created_at: parse_datetime(offset + 8, row.get(offset + 8)?)?,
            updated_at: parse_datetime(offset + 9, row.get(offset + 9)?)?,
        })
    }
}
