//! Aggregates a user's transactions into the dashboard payload: summary
//! totals, the last transactions, a daily time series and a per-category
//! expense breakdown.

use serde::Serialize;

use crate::{
    Error,
    models::{Amount, Transaction, UserID},
    stores::{TransactionQuery, TransactionStore},
    timezone::get_local_offset,
};

mod breakdown;
mod period;
mod series;

pub use breakdown::{BreakdownEntry, UNCATEGORIZED_LABEL, rank_breakdown};
pub use period::{Period, PeriodFilter, resolve_period, today_at};
pub use series::{DailyBucket, build_time_series};

/// How many recent transactions the dashboard shows.
const RECENT_TRANSACTION_COUNT: u64 = 5;

/// The full dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Total income over the summary range.
    pub total_income: Amount,
    /// Total expenses over the summary range.
    pub total_expense: Amount,
    /// Income minus expenses over the summary range.
    pub current_balance: Amount,
    /// The user's most recent transactions, regardless of the period filter.
    pub last_transactions: Vec<Transaction>,
    /// Daily income/expense totals over the resolved period.
    pub time_series: Vec<DailyBucket>,
    /// Expense totals per category, largest first.
    pub category_breakdown: Vec<BreakdownEntry>,
}

/// Compute a user's dashboard.
///
/// The summary totals and category breakdown are restricted to the selected
/// month only when `filter` holds a valid month and year; otherwise they
/// cover the user's whole history. The time series always covers the
/// resolved period. Any store error fails the whole dashboard, so clients
/// never see a partially aggregated payload.
///
/// # Errors
///
/// Returns [Error::InvalidTimezone] if `timezone` is not a canonical
/// timezone name, or any error the transaction store returns.
pub fn assemble_snapshot<T>(
    transaction_store: &T,
    user_id: UserID,
    filter: PeriodFilter,
    timezone: &str,
) -> Result<DashboardSnapshot, Error>
where
    T: TransactionStore,
{
    let offset =
        get_local_offset(timezone).ok_or_else(|| Error::InvalidTimezone(timezone.to_owned()))?;

    let period = resolve_period(filter, today_at(offset));
    let interval = period.utc_interval(offset);
    let summary_interval = period.month_filtered.then_some(&interval);

    let totals = transaction_store.sum_by_kind(user_id, summary_interval)?;
    let current_balance = totals.income - totals.expense;

    let last_transactions = transaction_store.get_for_user(
        user_id,
        TransactionQuery {
            limit: Some(RECENT_TRANSACTION_COUNT),
            ..Default::default()
        },
    )?;

    let daily_sums = transaction_store.daily_sums(user_id, &interval, offset)?;
    let time_series = build_time_series(&daily_sums, &period);

    let category_sums = transaction_store.category_expense_sums(user_id, summary_interval)?;
    let category_breakdown = rank_breakdown(category_sums);

    Ok(DashboardSnapshot {
        total_income: totals.income,
        total_expense: totals.expense,
        current_balance,
        last_transactions,
        time_series,
        category_breakdown,
    })
}
