//! Stored records.
//!
//! Field names follow the camelCase keys of the stored documents. Dates are
//! stored as instants; use the `range` methods with the camp's timezone to get
//! calendar dates.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::interval::DateRange;
use crate::join::Identified;
use crate::time::{TimeOfDay, TimeRange};

/// Collection names in the document store.
pub mod collections {
    pub const COACHES: &str = "coaches";
    pub const GROUPS: &str = "groups";
    pub const LOCATIONS: &str = "locations";
    pub const WEEKS: &str = "weeks";
    pub const CAMPS: &str = "camps";
    pub const TOURNAMENTS: &str = "tournaments";
    pub const UNAVAILABILITY: &str = "unavailability";
    pub const PREFERENCES: &str = "preferences";
    pub const SCHEDULE_SLOTS: &str = "scheduleSlots";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// The scheduling unit: an administrator-defined calendar range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// A camp runs within one week on a subset of its weekdays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camp {
    #[serde(default)]
    pub id: String,
    pub week_id: String,
    pub name: String,
    /// Lowercase weekday names, e.g. `["monday", "wednesday"]`.
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// A period during which a coach cannot be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unavailability {
    #[serde(default)]
    pub id: String,
    pub coach_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A coach preference or scheduling rule, optionally scoped to a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    #[serde(default)]
    pub id: String,
    pub coach_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_id: Option<String>,
    pub rule: String,
}

/// A booking of a location for a time range on a weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    #[serde(default)]
    pub id: String,
    pub location_id: String,
    /// Lowercase weekday name or ISO date; slots only clash on an equal key.
    pub day: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<String>,
}

impl ScheduleSlot {
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

impl Week {
    pub fn range(&self, tz: &Tz) -> DateRange<NaiveDate> {
        DateRange::from_instants(self.start_date, self.end_date, tz)
    }
}

impl Tournament {
    pub fn range(&self, tz: &Tz) -> DateRange<NaiveDate> {
        DateRange::from_instants(self.start_date, self.end_date, tz)
    }
}

impl Unavailability {
    pub fn range(&self, tz: &Tz) -> DateRange<NaiveDate> {
        DateRange::from_instants(self.start_date, self.end_date, tz)
    }
}

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_identified!(
    Coach,
    Group,
    Location,
    Week,
    Camp,
    Tournament,
    Unavailability,
    Preference,
    ScheduleSlot,
);
