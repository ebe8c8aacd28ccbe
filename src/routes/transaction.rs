//! Handlers for listing, creating, updating and deleting transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use time::{Date, OffsetDateTime, macros::format_description};

use crate::{
    Error,
    auth::Claims,
    models::{Amount, DatabaseID, Transaction, TransactionKind, UserID},
    state::AppState,
    stores::{CategoryStore, NewTransaction, TransactionQuery, TransactionStore, UserStore},
    timezone::get_local_offset,
};

/// The data a client sends to create or replace a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionData {
    /// Whether the transaction earned or spent money.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money spent or earned, in major units.
    pub amount: Amount,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<DatabaseID>,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl TransactionData {
    fn into_new_transaction(self, user_id: UserID) -> Result<NewTransaction, Error> {
        if self.amount.is_negative() {
            return Err(Error::NegativeAmount);
        }

        Ok(NewTransaction {
            user_id,
            kind: self.kind,
            category_id: self.category_id,
            amount: self.amount,
            description: self.description,
            date: self.date,
        })
    }
}

/// The filters a client may apply when listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListParams {
    /// Only include transactions with this category.
    pub category_id: Option<DatabaseID>,
    /// Only include transactions on or after this day, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Only include transactions on or before this day, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

/// Handler for listing the logged in user's transactions, newest first.
///
/// # Errors
///
/// Returns [Error::InvalidDate] if a date filter is not a `YYYY-MM-DD`
/// string.
pub async fn get_transactions<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    let (date_from, date_before) = parse_date_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        state.timezone(),
    )?;

    state
        .transaction_store()
        .get_for_user(
            claims.user_id(),
            TransactionQuery {
                category_id: params.category_id,
                date_from,
                date_before,
                limit: None,
            },
        )
        .map(Json)
}

/// Handler for creating a transaction.
///
/// # Errors
///
/// Returns [Error::NegativeAmount] if the amount is negative and
/// [Error::InvalidCategory] if the category is not visible to the user.
pub async fn create_transaction<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Json(transaction_data): Json<TransactionData>,
) -> Result<impl IntoResponse, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    let new_transaction = transaction_data.into_new_transaction(claims.user_id())?;

    let transaction = state.transaction_store().create(new_transaction)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Handler for replacing a transaction owned by the logged in user.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user.
pub async fn update_transaction<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
    Json(transaction_data): Json<TransactionData>,
) -> Result<Json<Transaction>, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    let new_transaction = transaction_data.into_new_transaction(claims.user_id())?;

    state
        .transaction_store()
        .update(transaction_id, new_transaction)
        .map(Json)
}

/// Handler for deleting a transaction owned by the logged in user.
pub async fn delete_transaction<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    state
        .transaction_store()
        .delete(transaction_id, claims.user_id())?;

    Ok(StatusCode::NO_CONTENT)
}

/// Turn optional `YYYY-MM-DD` bounds into optional datetime bounds with day
/// boundaries at midnight in the reference timezone. The end day is
/// inclusive, so it becomes a strict upper bound on the following midnight.
///
/// A missing bound stays `None` and leaves that side of the query open.
fn parse_date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
    timezone: &str,
) -> Result<(Option<OffsetDateTime>, Option<OffsetDateTime>), Error> {
    if start_date.is_none() && end_date.is_none() {
        return Ok((None, None));
    }

    let offset =
        get_local_offset(timezone).ok_or_else(|| Error::InvalidTimezone(timezone.to_owned()))?;

    let date_from = match start_date {
        Some(text) => Some(parse_day(text)?.midnight().assume_offset(offset)),
        None => None,
    };
    let date_before = match end_date {
        Some(text) => Some(
            parse_day(text)?
                .saturating_add(time::Duration::days(1))
                .midnight()
                .assume_offset(offset),
        ),
        None => None,
    };

    Ok((date_from, date_before))
}

fn parse_day(text: &str) -> Result<Date, Error> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

#[cfg(test)]
mod parse_date_range_tests {
    use time::macros::datetime;

    use crate::Error;

    use super::parse_date_range;

    #[test]
    fn no_bounds_means_no_range() {
        assert_eq!(
            parse_date_range(None, None, "Asia/Jakarta"),
            Ok((None, None))
        );
    }

    #[test]
    fn bounds_become_half_open_interval_in_reference_timezone() {
        let (date_from, date_before) =
            parse_date_range(Some("2023-12-01"), Some("2023-12-31"), "Asia/Jakarta").unwrap();

        assert_eq!(date_from.unwrap(), datetime!(2023-11-30 17:00 UTC));
        assert_eq!(date_before.unwrap(), datetime!(2023-12-31 17:00 UTC));
    }

    #[test]
    fn start_date_only_leaves_end_open() {
        let (date_from, date_before) =
            parse_date_range(Some("2023-12-01"), None, "Asia/Jakarta").unwrap();

        assert_eq!(date_from.unwrap(), datetime!(2023-11-30 17:00 UTC));
        assert_eq!(date_before, None);
    }

    #[test]
    fn end_date_only_leaves_start_open() {
        let (date_from, date_before) =
            parse_date_range(None, Some("2023-12-31"), "Asia/Jakarta").unwrap();

        assert_eq!(date_from, None);
        assert_eq!(date_before.unwrap(), datetime!(2023-12-31 17:00 UTC));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let result = parse_date_range(Some("12/01/2023"), None, "Asia/Jakarta");

        assert_eq!(result, Err(Error::InvalidDate("12/01/2023".to_owned())));
    }
}
