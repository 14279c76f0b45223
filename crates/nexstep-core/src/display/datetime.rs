//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A wrapper around `Timestamp` that formats it in the system time zone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// An interval rendered as local wall-clock times, `HH:MM-HH:MM`. The end
/// carries its date when it falls on a later day.
pub struct TimeRange<'a> {
    pub start: &'a Timestamp,
    pub end: &'a Timestamp,
    pub time_zone: &'a TimeZone,
}

impl fmt::Display for TimeRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.to_zoned(self.time_zone.clone());
        let end = self.end.to_zoned(self.time_zone.clone());
        if start.date() == end.date() {
            write!(f, "{}-{}", start.strftime("%H:%M"), end.strftime("%H:%M"))
        } else {
            write!(
                f,
                "{}-{} (+{})",
                start.strftime("%H:%M"),
                end.strftime("%H:%M"),
                end.date()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_same_day() {
        let start: Timestamp = "2025-05-12T10:00:00Z".parse().unwrap();
        let end: Timestamp = "2025-05-12T12:30:00Z".parse().unwrap();
        let range = TimeRange {
            start: &start,
            end: &end,
            time_zone: &TimeZone::UTC,
        };
        assert_eq!(range.to_string(), "10:00-12:30");
    }

    #[test]
    fn test_time_range_crossing_midnight() {
        let start: Timestamp = "2025-05-12T23:00:00Z".parse().unwrap();
        let end: Timestamp = "2025-05-13T01:00:00Z".parse().unwrap();
        let range = TimeRange {
            start: &start,
            end: &end,
            time_zone: &TimeZone::UTC,
        };
        assert_eq!(range.to_string(), "23:00-01:00 (+2025-05-13)");
    }
}
