//! WASM bindings for camp-core.
//!
//! Exposes the scheduling helpers to the admin UI via `wasm-bindgen`, so the
//! forms, tables and week builder all call one implementation instead of
//! carrying their own copies. Complex values cross the boundary as JSON
//! strings; dates are `YYYY-MM-DD` or RFC 3339 strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p camp-core-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/camp_core_wasm.wasm
//! ```

use std::cmp::Ordering;

use camp_core::interval::{local_date, parse_date, parse_instant, parse_timezone};
use camp_core::model::ScheduleSlot;
use camp_core::{Association, DateRange};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// A calendar date becomes midnight UTC; an instant passes through.
fn parse_point(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = parse_date(s) {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    parse_instant(s).map_err(|e| e.to_string())
}

/// A calendar date passes through; an instant is converted to its local date.
fn parse_calendar_date(s: &str, timezone: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = parse_date(s) {
        return Ok(date);
    }
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let instant = parse_instant(s).map_err(|e| e.to_string())?;
    Ok(local_date(instant, &tz))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn from_json<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

// ---------------------------------------------------------------------------
// Implementations (plain Rust, testable off-wasm)
// ---------------------------------------------------------------------------

fn overlaps_impl(a_start: &str, a_end: &str, b_start: &str, b_end: &str) -> Result<bool, String> {
    Ok(camp_core::overlaps(
        parse_point(a_start)?,
        parse_point(a_end)?,
        parse_point(b_start)?,
        parse_point(b_end)?,
    ))
}

fn expand_days_impl(start: &str, end: &str, timezone: &str) -> Result<String, String> {
    let range = DateRange::new_unchecked(
        parse_calendar_date(start, timezone)?,
        parse_calendar_date(end, timezone)?,
    );
    to_json(&camp_core::expand_days(&range))
}

fn natural_sort_impl(items_json: &str, key: Option<&str>) -> Result<String, String> {
    let mut items: Vec<Value> = from_json(items_json, "items")?;
    let text = |v: &Value| -> String {
        let field = match key {
            Some(k) => v.get(k),
            None => Some(v),
        };
        field.and_then(Value::as_str).unwrap_or_default().to_string()
    };
    items.sort_by(|a, b| camp_core::natural_compare(&text(a), &text(b)));
    to_json(&items)
}

fn attach_children_impl(
    parents_json: &str,
    joins_json: &str,
    children_json: &str,
) -> Result<String, String> {
    let parents: Vec<Value> = from_json(parents_json, "parents")?;
    let joins: Vec<Association> = from_json(joins_json, "joins")?;
    let children: Vec<Value> = from_json(children_json, "children")?;
    to_json(&camp_core::attach_children(parents, &joins, &children))
}

fn find_double_bookings_impl(slots_json: &str) -> Result<String, String> {
    let slots: Vec<ScheduleSlot> = from_json(slots_json, "slots")?;
    to_json(&camp_core::find_double_bookings(&slots))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Whether two closed date ranges share at least one instant.
///
/// Each argument is `YYYY-MM-DD` (taken as midnight UTC) or an RFC 3339
/// datetime. Touching ranges overlap.
#[wasm_bindgen]
pub fn overlaps(a_start: &str, a_end: &str, b_start: &str, b_end: &str) -> Result<bool, JsValue> {
    overlaps_impl(a_start, a_end, b_start, b_end).map_err(js_err)
}

/// Expand a date range into a JSON array of `{isoDate, weekdayName, displayLabel}`.
///
/// Instants are converted to local dates in `timezone` (IANA name, default
/// `UTC`). An end before the start yields `[]`.
#[wasm_bindgen(js_name = "expandDays")]
pub fn expand_days(start: &str, end: &str, timezone: Option<String>) -> Result<String, JsValue> {
    expand_days_impl(start, end, timezone.as_deref().unwrap_or("UTC")).map_err(js_err)
}

/// Whether two same-day `HH:MM` ranges overlap. Back-to-back ranges do not.
///
/// Throws on a malformed time.
#[wasm_bindgen(js_name = "timeOverlaps")]
pub fn time_overlaps(a_start: &str, a_end: &str, b_start: &str, b_end: &str) -> Result<bool, JsValue> {
    camp_core::time_overlaps(a_start, a_end, b_start, b_end).map_err(|e| js_err(e.to_string()))
}

/// Natural-order comparator for `Array.prototype.sort`: -1, 0 or 1.
#[wasm_bindgen(js_name = "naturalCompare")]
pub fn natural_compare(a: &str, b: &str) -> i32 {
    match camp_core::natural_compare(a, b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Sort a JSON array in natural order: strings directly, or objects by the
/// string field `key`.
#[wasm_bindgen(js_name = "naturalSort")]
pub fn natural_sort(items_json: &str, key: Option<String>) -> Result<String, JsValue> {
    natural_sort_impl(items_json, key.as_deref()).map_err(js_err)
}

/// Attach children to parents through `{parentId, childId}` join rows.
///
/// Returns the parents (input order) each with a `children` array. Join rows
/// pointing at missing children are dropped.
#[wasm_bindgen(js_name = "attachChildren")]
pub fn attach_children(
    parents_json: &str,
    joins_json: &str,
    children_json: &str,
) -> Result<String, JsValue> {
    attach_children_impl(parents_json, joins_json, children_json).map_err(js_err)
}

/// Pairs of schedule slots holding the same location at overlapping times.
#[wasm_bindgen(js_name = "findDoubleBookings")]
pub fn find_double_bookings(slots_json: &str) -> Result<String, JsValue> {
    find_double_bookings_impl(slots_json).map_err(js_err)
}
