//! Closed date-range overlap.
//!
//! Weeks, tournaments and coach unavailability records are all stored as a pair
//! of dates. Two such ranges are associated when they share at least one
//! instant, so a tournament ending on the Monday a week starts still belongs to
//! that week.
//!
//! Stored timestamps are instants (UTC). Calendar dates are always derived from
//! the local year/month/day in the camp's timezone via [`local_date`], never by
//! slicing a UTC string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{CampError, Result};

/// An inclusive range `[start, end]`.
///
/// `start <= end` is assumed but only checked by [`DateRange::new`]. The
/// overlap test itself accepts inverted ranges and simply reports what the
/// comparison says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange<T = NaiveDate> {
    pub start: T,
    pub end: T,
}

/// Returns `true` when the closed intervals `[a_start, a_end]` and
/// `[b_start, b_end]` share at least one point.
///
/// Touching intervals (`a_end == b_start`) overlap. A zero-length interval
/// overlaps any interval containing its single point.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start <= b_end && b_start <= a_end
}

impl<T: PartialOrd + Copy> DateRange<T> {
    /// Build a range without checking its ordering.
    pub fn new_unchecked(start: T, end: T) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &DateRange<T>) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    pub fn contains(&self, value: T) -> bool {
        self.start <= value && value <= self.end
    }
}

impl<T: PartialOrd + Copy + std::fmt::Display> DateRange<T> {
    /// Build a range, rejecting `end < start`.
    ///
    /// # Errors
    /// Returns `CampError::InvalidRange` when the end precedes the start.
    pub fn new(start: T, end: T) -> Result<Self> {
        if end < start {
            return Err(CampError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }
}

impl DateRange<NaiveDate> {
    /// Convert a stored instant range into local calendar dates in `tz`.
    pub fn from_instants(start: DateTime<Utc>, end: DateTime<Utc>, tz: &Tz) -> Self {
        Self {
            start: local_date(start, tz),
            end: local_date(end, tz),
        }
    }

    /// Number of calendar days covered, counting both ends. Zero when inverted.
    pub fn num_days(&self) -> usize {
        let span = (self.end - self.start).num_days();
        if span < 0 {
            0
        } else {
            span as usize + 1
        }
    }
}

/// The local calendar date of `instant` in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns `CampError::InvalidTimezone` when the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| CampError::InvalidTimezone(name.to_string()))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| CampError::InvalidDate(s.to_string()))
}

/// Parse an instant. Accepts RFC 3339 (with offset) or a naive
/// `YYYY-MM-DDTHH:MM:SS`, which is interpreted as UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|_| CampError::InvalidDate(s.to_string()))
}
