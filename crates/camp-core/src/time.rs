//! Same-day time ranges.
//!
//! Schedule slots store their times as zero-padded 24-hour `"HH:MM"` strings.
//! They are parsed once at the boundary into [`TimeOfDay`] (minutes since
//! midnight) so that all comparisons are integer comparisons.
//!
//! Time ranges are half-open: `09:00-10:00` and `10:00-11:00` are back-to-back
//! bookings and do NOT overlap. Date ranges in [`crate::interval`] are closed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CampError, Result};

/// A time of day with minute precision, `00:00` through `23:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// # Errors
    /// Returns `CampError::InvalidTimeFormat` when `hours > 23` or `minutes > 59`.
    pub fn from_hm(hours: u16, minutes: u16) -> Result<Self> {
        if hours > 23 || minutes > 59 {
            return Err(CampError::InvalidTimeFormat(format!(
                "{:02}:{:02}",
                hours, minutes
            )));
        }
        Ok(Self(hours * 60 + minutes))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hours(self) -> u16 {
        self.0 / 60
    }
}

impl FromStr for TimeOfDay {
    type Err = CampError;

    /// Strict `HH:MM`: two digits, a colon, two digits.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CampError::InvalidTimeFormat(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 5
            || bytes[2] != b':'
            || ![0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit())
        {
            return Err(invalid());
        }
        let digit = |i: usize| u16::from(bytes[i] - b'0');
        let hours = digit(0) * 10 + digit(1);
        let minutes = digit(3) * 10 + digit(4);
        Self::from_hm(hours, minutes).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = CampError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// A half-open range `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    /// Parse both ends. Ordering is not checked.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes shared with `other`; zero when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeRange) -> u16 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.minutes().saturating_sub(start.minutes())
    }

    /// Length in minutes; zero for an inverted range.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Returns whether two same-day `"HH:MM"` ranges overlap (half-open).
///
/// # Errors
/// Returns `CampError::InvalidTimeFormat` for the first argument that is not a
/// valid `HH:MM` time.
pub fn time_overlaps(a_start: &str, a_end: &str, b_start: &str, b_end: &str) -> Result<bool> {
    let a = TimeRange::parse(a_start, a_end)?;
    let b = TimeRange::parse(b_start, b_end)?;
    Ok(a.overlaps(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTES_PER_DAY: u16 = 24 * 60;

    #[test]
    fn minutes_per_day_bound() {
        let last: TimeOfDay = "23:59".parse().unwrap();
        assert_eq!(last.minutes(), MINUTES_PER_DAY - 1);
    }

    #[test]
    fn display_pads() {
        let t = TimeOfDay::from_hm(7, 5).unwrap();
        assert_eq!(t.to_string(), "07:05");
        assert_eq!(t.hours(), 7);
    }
}
