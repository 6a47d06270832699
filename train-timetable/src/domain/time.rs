//! Time-of-day handling for timetable data.
//!
//! Timetables publish bare "HH:MM" wall-clock values with no date attached.
//! `ClockTime` models exactly that: an hour and a minute, ordered within a
//! single nominal day. Working out how many midnights a journey crossed is
//! the job of [`super::rollover`].

use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock time of day with minute precision and no date.
///
/// # Examples
///
/// ```
/// use train_timetable::domain::ClockTime;
///
/// let time = ClockTime::parse("14:30").unwrap();
/// assert_eq!(time.to_string(), "14:30");
///
/// // Single-digit hours are accepted, output is always zero-padded
/// assert_eq!(ClockTime::parse("8:05").unwrap().to_string(), "08:05");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Create a time from hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Parse a time from `digits:digits` text.
    ///
    /// Surrounding whitespace is ignored. The hour may have one or two
    /// digits, the minute must have exactly two.
    ///
    /// ```
    /// use train_timetable::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse("00:00").is_ok());
    /// assert!(ClockTime::parse(" 23:59 ").is_ok());
    ///
    /// assert!(ClockTime::parse("1430").is_err());
    /// assert!(ClockTime::parse("14:3").is_err());
    /// assert!(ClockTime::parse("25:00").is_err());
    /// assert!(ClockTime::parse("").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if hour.is_empty() || hour.len() > 2 {
            return Err(TimeError::new("hour must have one or two digits"));
        }
        if minute.len() != 2 {
            return Err(TimeError::new("minute must have two digits"));
        }

        let hour = parse_digits(hour).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_digits(minute).ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::from_hm(hour, minute)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Seconds from `other` to `self`, treating both as the same day.
    ///
    /// Negative when `self` is earlier in the day than `other`.
    ///
    /// ```
    /// use train_timetable::domain::ClockTime;
    ///
    /// let a = ClockTime::parse("10:00").unwrap();
    /// let b = ClockTime::parse("12:30").unwrap();
    /// assert_eq!(b.seconds_since(a), 9000);
    /// assert_eq!(a.seconds_since(b), -9000);
    /// ```
    pub fn seconds_since(&self, other: ClockTime) -> i64 {
        self.0.signed_duration_since(other.0).num_seconds()
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl serde::Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    s.bytes().try_fold(0u32, |acc, b| {
        let digit = (b as char).to_digit(10)?;
        Some(acc * 10 + digit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let t = time("00:00");
        assert_eq!((t.hour(), t.minute()), (0, 0));

        let t = time("23:59");
        assert_eq!((t.hour(), t.minute()), (23, 59));

        let t = time("7:45");
        assert_eq!((t.hour(), t.minute()), (7, 45));
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ClockTime::parse("1430").is_err());
        assert!(ClockTime::parse("14:3").is_err());
        assert!(ClockTime::parse("14:300").is_err());
        assert!(ClockTime::parse("114:30").is_err());
        assert!(ClockTime::parse(":30").is_err());
        assert!(ClockTime::parse("14-30").is_err());
        assert!(ClockTime::parse("ab:cd").is_err());
        assert!(ClockTime::parse("1a:30").is_err());
        assert!(ClockTime::parse("+1:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(ClockTime::parse("24:00").is_err());
        assert!(ClockTime::parse("12:60").is_err());
        assert!(ClockTime::from_hm(12, 99).is_err());
    }

    #[test]
    fn error_message() {
        let err = ClockTime::parse("25:00").unwrap_err();
        assert_eq!(err.to_string(), "invalid time: hour must be 0-23");
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(time("9:05").to_string(), "09:05");
        assert_eq!(format!("{:?}", time("23:59")), "ClockTime(23:59)");
    }

    #[test]
    fn ordering_by_hour_then_minute() {
        assert!(time("10:00") < time("10:01"));
        assert!(time("09:59") < time("10:00"));
        assert!(time("23:59") > time("00:00"));
        assert_eq!(time("10:00"), "10:00".parse().unwrap());
    }

    #[test]
    fn difference_within_same_day() {
        assert_eq!(time("00:10").seconds_since(time("23:50")), -85_200);
        assert_eq!(time("11:00").seconds_since(time("11:00")), 0);
    }
}
