//! This file defines the `Transaction` type, the core type of the budgeting
//! part of the application.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{Amount, DatabaseID, UserID};

/// Whether a transaction earned or spent money.
///
/// The amount of a transaction is always a non-negative magnitude; the kind
/// carries the direction of the money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. wages.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The lowercase string used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The `category_name` is denormalised from the category table so that API
/// clients do not need a second request to label a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The ID of the user that created this transaction.
    pub user_id: UserID,
    /// Whether the transaction earned or spent money.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<DatabaseID>,
    /// The name of the category, if the transaction has one.
    pub category_name: Option<String>,
    /// The amount of money spent or earned in this transaction.
    pub amount: Amount,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod transaction_kind_tests {
    use super::TransactionKind;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            "\"income\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionKind::Expense).unwrap(),
            "\"expense\""
        );
    }

    #[test]
    fn deserialize_rejects_unknown_kind() {
        assert!(serde_json::from_str::<TransactionKind>("\"transfer\"").is_err());
    }
}
