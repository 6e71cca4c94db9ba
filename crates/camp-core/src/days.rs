//! Expand a date range into its calendar days.
//!
//! Each day carries the keys the scheduling forms use: the ISO date
//! (`2024-01-15`), the lowercase weekday name (`monday`) that camp and slot
//! records store, and a short display label (`Mon, Jan 15`).

use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::{CampError, Result};
use crate::interval::DateRange;

/// One calendar day inside a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInfo {
    #[serde(skip)]
    pub date: NaiveDate,
    pub iso_date: String,
    pub weekday_name: String,
    pub display_label: String,
}

impl DayInfo {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date,
            iso_date: date.format("%Y-%m-%d").to_string(),
            weekday_name: weekday_name(date.weekday()).to_string(),
            display_label: date.format("%a, %b %-d").to_string(),
        }
    }
}

/// Iterator over the days of a [`DateRange`], both ends included.
///
/// Created by [`DateRange::days`]; each call starts over from the range start.
#[derive(Debug, Clone)]
pub struct Days {
    current: NaiveDate,
    remaining: usize,
}

impl Iterator for Days {
    type Item = DayInfo;

    fn next(&mut self) -> Option<DayInfo> {
        if self.remaining == 0 {
            return None;
        }
        let day = self.current;
        self.remaining -= 1;
        if let Some(next) = day.succ_opt() {
            self.current = next;
        }
        Some(DayInfo::from_date(day))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Days {}
impl FusedIterator for Days {}

impl DateRange<NaiveDate> {
    /// Days from `start` to `end` inclusive. Empty when `end < start`.
    pub fn days(&self) -> Days {
        Days {
            current: self.start,
            remaining: self.num_days(),
        }
    }
}

/// Expand `range` into its days, `(end - start).days + 1` entries long.
///
/// An inverted range yields an empty vector.
pub fn expand_days(range: &DateRange<NaiveDate>) -> Vec<DayInfo> {
    range.days().collect()
}

/// Lowercase full English weekday name, as stored on camp and slot records.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Parse a stored weekday key (case-insensitive full name).
///
/// # Errors
/// Returns `CampError::Validation` for anything other than a full weekday name.
pub fn parse_weekday_name(name: &str) -> Result<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        _ => Err(CampError::Validation(format!(
            "unknown weekday name '{}'",
            name
        ))),
    }
}
