//! Builds the zero-filled daily income/expense series for the dashboard
//! chart.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    models::{Amount, TransactionKind},
    stores::DailySum,
};

use super::period::Period;

/// One day's income and expense totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBucket {
    /// The calendar day, formatted as `YYYY-MM-DD`.
    #[serde(with = "date_format")]
    pub date: Date,
    /// Total income on this day.
    pub income: Amount,
    /// Total expenses on this day.
    pub expense: Amount,
}

/// Expand per-day sums into one bucket per day of `period`, in ascending date
/// order. Days without transactions get zero totals. When the period is
/// clamped, days after `period.today` are dropped.
pub fn build_time_series(daily_sums: &[DailySum], period: &Period) -> Vec<DailyBucket> {
    let mut totals: HashMap<Date, (Amount, Amount)> = HashMap::new();

    for sum in daily_sums {
        let entry = totals.entry(sum.date).or_insert((Amount::ZERO, Amount::ZERO));
        match sum.kind {
            TransactionKind::Income => entry.0 = entry.0 + sum.total,
            TransactionKind::Expense => entry.1 = entry.1 + sum.total,
        }
    }

    let mut series = Vec::new();
    let mut day = period.start;

    while day < period.end {
        if period.clamp_to_today && day > period.today {
            break;
        }

        let (income, expense) = totals
            .get(&day)
            .copied()
            .unwrap_or((Amount::ZERO, Amount::ZERO));
        series.push(DailyBucket {
            date: day,
            income,
            expense,
        });

        day = match day.next_day() {
            Some(next) => next,
            None => break,
        };
    }

    series
}

mod date_format {
    use serde::Serializer;
    use time::{Date, macros::format_description};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&formatted)
    }
}
