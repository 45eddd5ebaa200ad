//! Newtypes for CQL types with no direct host equivalent, and wrappers that
//! pick an encoding other than the default for a host value.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Offset of the day count in the `date` wire encoding: day 0 (the Unix
/// epoch) is stored as 2^31.
const DATE_EPOCH_OFFSET: i64 = 1 << 31;

/// A CQL `date`, stored as in the wire format: an unsigned day count
/// centered on the Unix epoch at 2^31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CqlDate(pub u32);

impl CqlDate {
    /// Creates a date from a signed number of days since 1970-01-01.
    #[must_use]
    pub fn from_days_since_epoch(days: i32) -> Self {
        // The offset maps the whole i32 range onto u32 exactly.
        let raw = i64::from(days) + DATE_EPOCH_OFFSET;
        Self(u32::try_from(raw).unwrap_or(u32::MAX))
    }

    /// Signed number of days since 1970-01-01.
    #[must_use]
    pub fn days_since_epoch(self) -> i32 {
        let days = i64::from(self.0) - DATE_EPOCH_OFFSET;
        i32::try_from(days).unwrap_or(i32::MAX)
    }

    /// The proleptic Gregorian `(year, month, day)` of this date.
    #[must_use]
    pub fn to_ymd(self) -> (i64, i64, i64) {
        // Days counted from 0000-03-01, so leap days close each 400 year era.
        let shifted = i64::from(self.days_since_epoch()) + 719_468;
        let era = shifted.div_euclid(146_097);
        let day_of_era = shifted.rem_euclid(146_097);
        let year_of_era =
            (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146_096) / 365;
        let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        let march_month = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * march_month + 2) / 5 + 1;
        let month = if march_month < 10 { march_month + 3 } else { march_month - 9 };
        let year = year_of_era + era * 400 + i64::from(month <= 2);
        (year, month, day)
    }
}

/// Formats as `YYYY-MM-DD`.
impl fmt::Display for CqlDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.to_ymd();
        write!(f, "{year:04}-{month:02}-{day:02}")
    }
}

/// A CQL `time`: nanoseconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CqlTime(pub i64);

impl CqlTime {
    /// Creates a time of day from hours, minutes, seconds and nanoseconds.
    #[must_use]
    pub fn from_hms_nano(hours: u8, minutes: u8, seconds: u8, nanos: u32) -> Self {
        let secs = i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds);
        Self(secs * 1_000_000_000 + i64::from(nanos))
    }
}

/// A CQL `timestamp`: milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CqlTimestamp(pub i64);

/// Encodes an integer as `tinyint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TinyInt(pub i8);

/// Encodes an integer as `smallint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmallInt(pub i16);

/// Encodes an integer as `bigint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BigInt(pub i64);

/// Encodes a float as `double`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Double(pub f64);

/// A `counter` delta.
///
/// Counters can only be moved with increments and decrements, so a builder
/// refuses to `set` a column to a `Counter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counter(pub i64);

/// Binds a `timeuuid` rather than a plain `uuid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeUuid(pub Uuid);

/// Binds owned bytes as a `blob`.
///
/// A bare `Vec<u8>` binds as a `list<int>` like any other vector; wrap it
/// (or pass a `&[u8]`) to send a blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Blob(pub Vec<u8>);

/// Leaves the bound column untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unset;

/// Binds any iterable collection as a CQL `list`, keeping duplicates and order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsList<C>(pub C);

/// Binds any iterable collection as a CQL `set`, dropping duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsSet<C>(pub C);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_epoch_is_centered() {
        assert_eq!(CqlDate::from_days_since_epoch(0), CqlDate(1 << 31));
        assert_eq!(CqlDate::from_days_since_epoch(-1).0, (1 << 31) - 1);
        assert_eq!(CqlDate(0).days_since_epoch(), i32::MIN);
        assert_eq!(CqlDate(u32::MAX).days_since_epoch(), i32::MAX);
    }

    #[test]
    fn test_date_round_trip() {
        for days in [i32::MIN, -19_000, 0, 19_000, i32::MAX] {
            assert_eq!(CqlDate::from_days_since_epoch(days).days_since_epoch(), days);
        }
    }

    #[test]
    fn test_date_calendar() {
        assert_eq!(CqlDate::from_days_since_epoch(0).to_string(), "1970-01-01");
        assert_eq!(CqlDate::from_days_since_epoch(-1).to_string(), "1969-12-31");
        assert_eq!(CqlDate::from_days_since_epoch(19_782).to_string(), "2024-02-29");
        assert_eq!(CqlDate::from_days_since_epoch(11_016).to_ymd(), (2000, 2, 29));
    }

    #[test]
    fn test_time_from_components() {
        assert_eq!(CqlTime::from_hms_nano(0, 0, 1, 5), CqlTime(1_000_000_005));
        assert_eq!(
            CqlTime::from_hms_nano(23, 59, 59, 0),
            CqlTime(86_399_000_000_000)
        );
    }
}
