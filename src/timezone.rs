//! Resolves canonical timezone names to UTC offsets.
//!
//! All dashboard aggregation happens in a single reference timezone so that
//! day boundaries are stable regardless of where the server runs.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset of the timezone named by `canonical_timezone`,
/// e.g. "Asia/Jakarta".
///
/// Returns `None` if the name is not a valid canonical timezone string.
pub(crate) fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Whether `name` is a canonical timezone string known to the bundled
/// timezone database.
pub fn timezone_is_valid(name: &str) -> bool {
    time_tz::timezones::get_by_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::get_local_offset;

    #[test]
    fn resolves_canonical_timezone() {
        assert!(get_local_offset("Asia/Jakarta").is_some());
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert!(get_local_offset("Mars/Olympus_Mons").is_none());
    }
}
