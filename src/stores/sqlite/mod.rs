//! SQLite backed implementations of the store traits.

mod category;
mod transaction;
mod user;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

/// Format a datetime for storage as RFC 3339 text.
///
/// Datetimes are normalized to UTC at whole-second precision so that the
/// stored text compares chronologically, which lets SQL range filters work
/// with plain string comparison.
pub(crate) fn format_datetime(datetime: OffsetDateTime) -> String {
    normalize_utc(datetime)
        .format(&Rfc3339)
        .expect("formatting a UTC datetime as RFC 3339 does not fail")
}

/// Normalize a datetime to UTC at whole-second precision.
pub(crate) fn normalize_utc(datetime: OffsetDateTime) -> OffsetDateTime {
    datetime
        .to_offset(UtcOffset::UTC)
        .replace_nanosecond(0)
        .expect("zero nanoseconds is always in range")
}

/// Parse a stored RFC 3339 datetime from the column at `column_index`.
pub(crate) fn parse_datetime(
    column_index: usize,
    text: String,
) -> Result<OffsetDateTime, rusqlite::Error> {
    OffsetDateTime::parse(&text, &Rfc3339).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            column_index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}

#[cfg(test)]
mod datetime_tests {
    use time::macros::datetime;

    use super::{format_datetime, parse_datetime};

    #[test]
    fn format_normalizes_offset_and_subseconds() {
        let datetime = datetime!(2023-12-05 07:30:00.5 +07:00);

        assert_eq!(format_datetime(datetime), "2023-12-05T00:30:00Z");
    }

    #[test]
    fn parse_round_trips() {
        let datetime = datetime!(2023-12-05 10:00:00 UTC);

        let parsed = parse_datetime(0, format_datetime(datetime)).unwrap();

        assert_eq!(parsed, datetime);
    }
}
