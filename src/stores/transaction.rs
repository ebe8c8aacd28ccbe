//! Defines the transaction store trait and its query types.

use time::{Date, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    models::{Amount, DatabaseID, Transaction, TransactionKind, UserID},
};

/// A half-open datetime range `[start, end)` used to scope aggregation
/// queries.
///
/// Both endpoints are normalized to UTC so they compare correctly against
/// stored transaction datetimes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Start of the range (inclusive).
    pub start: OffsetDateTime,
    /// End of the range (exclusive).
    pub end: OffsetDateTime,
}

impl Interval {
    /// Create an interval, normalizing both endpoints to UTC.
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            start: start.to_offset(UtcOffset::UTC),
            end: end.to_offset(UtcOffset::UTC),
        }
    }
}

/// The data needed to create or replace a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user creating the transaction.
    pub user_id: UserID,
    /// Whether the transaction earned or spent money.
    pub kind: TransactionKind,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<DatabaseID>,
    /// The amount of money spent or earned. Must be a non-negative magnitude.
    pub amount: Amount,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

/// Defines how transactions should be fetched from
/// [TransactionStore::get_for_user].
///
/// Transactions are always returned newest first. The date bounds are
/// independent, so a query may be open at either end.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions with this category.
    pub category_id: Option<DatabaseID>,
    /// Only include transactions at or after this datetime.
    pub date_from: Option<OffsetDateTime>,
    /// Only include transactions strictly before this datetime.
    pub date_before: Option<OffsetDateTime>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
}

/// Per-kind totals over a set of transactions.
///
/// A kind with no transactions has an implicit zero total.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct KindTotals {
    /// Sum of all income amounts.
    pub income: Amount,
    /// Sum of all expense amounts.
    pub expense: Amount,
}

/// One calendar day's total for one transaction kind.
///
/// The date is the transaction's calendar day in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySum {
    /// The calendar day, in the reference timezone.
    pub date: Date,
    /// The transaction kind the total belongs to.
    pub kind: TransactionKind,
    /// The summed amount for this day and kind.
    pub total: Amount,
}

/// Total expenses for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySum {
    /// The category name, or `None` for transactions without a category.
    pub category_name: Option<String>,
    /// The summed expense amount for the category.
    pub total: Amount,
}

/// Handles the creation, retrieval and aggregation of transactions.
pub trait TransactionStore: Clone + Send + Sync + 'static {
    /// Create a new transaction in the store.
    ///
    /// The referenced category, if any, must be visible to the creating user.
    fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Replace the transaction with ID `transaction_id`.
    ///
    /// Only the owning user's transactions can be updated.
    fn update(
        &self,
        transaction_id: DatabaseID,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction with ID `transaction_id` owned by `user_id`.
    fn delete(&self, transaction_id: DatabaseID, user_id: UserID) -> Result<(), Error>;

    /// Retrieve a user's transactions in the way defined by `query`, newest
    /// first.
    fn get_for_user(
        &self,
        user_id: UserID,
        query: TransactionQuery,
    ) -> Result<Vec<Transaction>, Error>;

    /// Sum a user's transaction amounts per kind, optionally restricted to
    /// `interval`.
    fn sum_by_kind(&self, user_id: UserID, interval: Option<&Interval>)
    -> Result<KindTotals, Error>;

    /// Sum a user's transaction amounts per calendar day and kind within
    /// `interval`.
    ///
    /// Calendar days are evaluated at the UTC offset `offset` of the
    /// reference timezone. Days with no transactions are absent from the
    /// result; results are in ascending date order.
    fn daily_sums(
        &self,
        user_id: UserID,
        interval: &Interval,
        offset: UtcOffset,
    ) -> Result<Vec<DailySum>, Error>;

    /// Sum a user's expense amounts per category, optionally restricted to
    /// `interval`.
    ///
    /// Transactions without a category are grouped under a `None` name.
    fn category_expense_sums(
        &self,
        user_id: UserID,
        interval: Option<&Interval>,
    ) -> Result<Vec<CategorySum>, Error>;
}
