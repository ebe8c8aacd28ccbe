//! Resolves the dashboard's month/year filter into a concrete date range.

use time::{Date, Month, OffsetDateTime, UtcOffset};

use crate::stores::Interval;

/// The month/year filter requested by a dashboard client.
///
/// Parsing is lenient: a value that is not a valid month or year is treated
/// as if it was not given at all.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PeriodFilter {
    /// The requested month (1-12).
    pub month: Option<u8>,
    /// The requested year.
    pub year: Option<i32>,
}

impl PeriodFilter {
    /// Parse the raw `month` and `year` query strings, silently dropping
    /// values that do not parse or are out of range.
    pub fn parse_lenient(month: Option<&str>, year: Option<&str>) -> Self {
        let month = month
            .and_then(|text| text.parse::<u8>().ok())
            .filter(|&month| (1..=12).contains(&month));
        let year = year
            .and_then(|text| text.parse::<i32>().ok())
            .filter(|&year| year >= 1);

        Self { month, year }
    }

    /// Whether both a valid month and a valid year were given.
    pub fn is_month_filter(&self) -> bool {
        self.month.is_some() && self.year.is_some()
    }
}

/// The concrete date range a dashboard is computed over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period {
    /// First day of the range (inclusive).
    pub start: Date,
    /// Day after the last day of the range (exclusive).
    pub end: Date,
    /// The current day in the reference timezone.
    pub today: Date,
    /// Whether the time series should stop at `today` instead of running to
    /// `end`.
    pub clamp_to_today: bool,
    /// Whether the range came from a valid month/year filter. Only then are
    /// the summary totals and category breakdown restricted to the range.
    pub month_filtered: bool,
}

impl Period {
    /// The period as a half-open datetime interval, with day boundaries at
    /// midnight in the timezone given by `offset`.
    pub fn utc_interval(&self, offset: UtcOffset) -> Interval {
        Interval::new(
            self.start.midnight().assume_offset(offset),
            self.end.midnight().assume_offset(offset),
        )
    }
}

/// Resolve `filter` into a [Period] relative to `today`.
///
/// A valid month/year filter selects that whole calendar month. The time
/// series is clamped to `today` only when the selected month is the current
/// one; any other month keeps all of its days. Without a valid filter the
/// period is the trailing seven-day window ending at `today`.
pub fn resolve_period(filter: PeriodFilter, today: Date) -> Period {
    if let (Some(month), Some(year)) = (filter.month, filter.year) {
        let start = month_start(year, month);
        let end = next_month_start(year, month);
        let clamp_to_today = today >= start && today < end;

        return Period {
            start,
            end,
            today,
            clamp_to_today,
            month_filtered: true,
        };
    }

    Period {
        start: today.saturating_sub(time::Duration::days(6)),
        end: today.saturating_add(time::Duration::days(1)),
        today,
        clamp_to_today: true,
        month_filtered: false,
    }
}

/// The current day at the UTC offset of the reference timezone.
pub fn today_at(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}

fn month_start(year: i32, month: u8) -> Date {
    let month = Month::try_from(month).expect("month is validated to be in 1..=12");

    Date::from_calendar_date(year, month, 1).expect("the first day of a month is always valid")
}

fn next_month_start(year: i32, month: u8) -> Date {
    match month {
        12 => month_start(year + 1, 1),
        month => month_start(year, month + 1),
    }
}

#[cfg(test)]
mod period_tests {
    use time::macros::date;

    use super::{PeriodFilter, resolve_period};

    #[test]
    fn parse_accepts_valid_month_and_year() {
        let filter = PeriodFilter::parse_lenient(Some("12"), Some("2023"));

        assert_eq!(filter.month, Some(12));
        assert_eq!(filter.year, Some(2023));
        assert!(filter.is_month_filter());
    }

    #[test]
    fn parse_drops_out_of_range_month() {
        let filter = PeriodFilter::parse_lenient(Some("13"), Some("2023"));

        assert_eq!(filter.month, None);
        assert!(!filter.is_month_filter());
    }

    #[test]
    fn parse_drops_unparseable_values() {
        let filter = PeriodFilter::parse_lenient(Some("december"), Some("23x"));

        assert_eq!(filter, PeriodFilter::default());
    }

    #[test]
    fn past_month_covers_whole_month_without_clamp() {
        let filter = PeriodFilter {
            month: Some(12),
            year: Some(2023),
        };

        let period = resolve_period(filter, date!(2024 - 03 - 15));

        assert_eq!(period.start, date!(2023 - 12 - 01));
        assert_eq!(period.end, date!(2024 - 01 - 01));
        assert!(!period.clamp_to_today);
        assert!(period.month_filtered);
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let filter = PeriodFilter {
            month: Some(12),
            year: Some(2023),
        };

        let period = resolve_period(filter, date!(2024 - 03 - 15));

        assert_eq!(period.end, date!(2024 - 01 - 01));
    }

    #[test]
    fn current_month_is_clamped_to_today() {
        let filter = PeriodFilter {
            month: Some(3),
            year: Some(2024),
        };

        let period = resolve_period(filter, date!(2024 - 03 - 15));

        assert_eq!(period.start, date!(2024 - 03 - 01));
        assert_eq!(period.end, date!(2024 - 04 - 01));
        assert!(period.clamp_to_today);
    }

    #[test]
    fn missing_filter_uses_trailing_week() {
        let period = resolve_period(PeriodFilter::default(), date!(2024 - 03 - 15));

        assert_eq!(period.start, date!(2024 - 03 - 09));
        assert_eq!(period.end, date!(2024 - 03 - 16));
        assert!(period.clamp_to_today);
        assert!(!period.month_filtered);
    }

    #[test]
    fn partial_filter_falls_back_to_trailing_week() {
        let filter = PeriodFilter {
            month: Some(12),
            year: None,
        };

        let period = resolve_period(filter, date!(2024 - 03 - 15));

        assert!(!period.month_filtered);
        assert_eq!(period.start, date!(2024 - 03 - 09));
    }
}
