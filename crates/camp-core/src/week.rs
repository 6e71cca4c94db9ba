//! Week builder logic.
//!
//! Associates tournaments, coach unavailability and camps with a week and
//! assembles the summary shown at the end of the week builder. All date
//! comparisons happen on local calendar dates in the camp's timezone.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::days::{parse_weekday_name, DayInfo, Days};
use crate::error::{CampError, Result};
use crate::interval::DateRange;
use crate::model::{collections, Camp, Tournament, Unavailability, Week};
use crate::natural::natural_compare;
use crate::store::{decode, fetch_all, fetch_one, DocumentStore};

impl Week {
    /// Check the fields an administrator fills in on the week form.
    ///
    /// # Errors
    /// `CampError::Validation` for a blank name, `CampError::InvalidRange` when
    /// the end date precedes the start date.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CampError::Validation("week name must not be blank".to_string()));
        }
        DateRange::new(self.start_date, self.end_date)?;
        Ok(())
    }

    pub fn days(&self, tz: &Tz) -> Days {
        self.range(tz).days()
    }
}

/// Tournaments sharing at least one day with `week`, ordered by start date.
pub fn tournaments_in_week<'a>(
    week: &Week,
    tournaments: &'a [Tournament],
    tz: &Tz,
) -> Vec<&'a Tournament> {
    let range = week.range(tz);
    let mut found: Vec<&Tournament> = tournaments
        .iter()
        .filter(|t| t.range(tz).overlaps(&range))
        .collect();
    found.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| natural_compare(&a.name, &b.name))
    });
    found
}

/// Unavailability records sharing at least one day with `week`.
pub fn unavailability_in_week<'a>(
    week: &Week,
    records: &'a [Unavailability],
    tz: &Tz,
) -> Vec<&'a Unavailability> {
    let range = week.range(tz);
    records
        .iter()
        .filter(|u| u.range(tz).overlaps(&range))
        .collect()
}

/// Days of `week` on which `camp` runs.
///
/// # Errors
/// `CampError::Validation` when the camp lists an unknown weekday name.
pub fn camp_days(week: &Week, camp: &Camp, tz: &Tz) -> Result<Vec<DayInfo>> {
    let selected = camp
        .days
        .iter()
        .map(|d| parse_weekday_name(d))
        .collect::<Result<Vec<_>>>()?;
    Ok(week
        .days(tz)
        .filter(|day| selected.contains(&day.date.weekday()))
        .collect())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampSummary {
    pub camp_id: String,
    pub name: String,
    pub days: Vec<DayInfo>,
}

/// Everything the week builder's summary step displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOverview {
    pub week_id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayInfo>,
    pub tournaments: Vec<Tournament>,
    pub unavailability: Vec<Unavailability>,
    pub camps: Vec<CampSummary>,
}

/// Assemble the overview of `week` from already-fetched records.
///
/// Camps belonging to other weeks are ignored; camps are listed in natural
/// name order.
pub fn build_week_overview(
    week: &Week,
    tournaments: &[Tournament],
    unavailability: &[Unavailability],
    camps: &[Camp],
    tz: &Tz,
) -> Result<WeekOverview> {
    let range = week.range(tz);

    let mut week_camps: Vec<&Camp> = camps.iter().filter(|c| c.week_id == week.id).collect();
    week_camps.sort_by(|a, b| natural_compare(&a.name, &b.name));
    let camps = week_camps
        .into_iter()
        .map(|camp| {
            Ok(CampSummary {
                camp_id: camp.id.clone(),
                name: camp.name.clone(),
                days: camp_days(week, camp, tz)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WeekOverview {
        week_id: week.id.clone(),
        name: week.name.clone(),
        start: range.start,
        end: range.end,
        days: range.days().collect(),
        tournaments: tournaments_in_week(week, tournaments, tz)
            .into_iter()
            .cloned()
            .collect(),
        unavailability: unavailability_in_week(week, unavailability, tz)
            .into_iter()
            .cloned()
            .collect(),
        camps,
    })
}

/// Fetch the week and its related collections from `store` and build the overview.
///
/// # Errors
/// `CampError::NotFound` when the week does not exist, plus any store or
/// decode error.
pub fn load_week_overview<S>(store: &S, week_id: &str, tz: &Tz) -> Result<WeekOverview>
where
    S: DocumentStore + ?Sized,
{
    let week: Week = fetch_one(store, collections::WEEKS, week_id)?;
    let tournaments: Vec<Tournament> = fetch_all(store, collections::TOURNAMENTS)?;
    let unavailability: Vec<Unavailability> = fetch_all(store, collections::UNAVAILABILITY)?;
    let camps: Vec<Camp> = store
        .query(
            collections::CAMPS,
            "weekId",
            &serde_json::Value::String(week_id.to_string()),
        )?
        .iter()
        .map(decode)
        .collect::<Result<_>>()?;
    build_week_overview(&week, &tournaments, &unavailability, &camps, tz)
}
