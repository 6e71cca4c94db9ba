//! Flag locations booked twice at the same time.
//!
//! Two slots clash when they share a location, fall on the same day key and
//! their half-open time ranges overlap. Back-to-back slots (one ends when the
//! other starts) are NOT clashes. Detection only reports; the caller decides
//! whether to block the save.

use serde::Serialize;

use crate::model::ScheduleSlot;

/// Two slots holding the same location at overlapping times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoubleBooking {
    pub location_id: String,
    pub day: String,
    pub slot_a: String,
    pub slot_b: String,
    pub overlap_minutes: u16,
}

fn same_place_and_day(a: &ScheduleSlot, b: &ScheduleSlot) -> bool {
    a.location_id == b.location_id && a.day.eq_ignore_ascii_case(&b.day)
}

/// Every clashing pair in `slots`, in input order (`slot_a` precedes `slot_b`).
pub fn find_double_bookings(slots: &[ScheduleSlot]) -> Vec<DoubleBooking> {
    let mut found = Vec::new();

    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            if !same_place_and_day(a, b) {
                continue;
            }
            let (ra, rb) = (a.time_range(), b.time_range());
            if ra.overlaps(&rb) {
                found.push(DoubleBooking {
                    location_id: a.location_id.clone(),
                    day: a.day.clone(),
                    slot_a: a.id.clone(),
                    slot_b: b.id.clone(),
                    overlap_minutes: ra.overlap_minutes(&rb),
                });
            }
        }
    }

    found
}

/// Existing slots that `candidate` would clash with. A slot with the
/// candidate's own id is ignored, so an edit does not clash with itself.
pub fn clashes_with<'a>(candidate: &ScheduleSlot, existing: &'a [ScheduleSlot]) -> Vec<&'a ScheduleSlot> {
    let range = candidate.time_range();
    existing
        .iter()
        .filter(|slot| candidate.id.is_empty() || slot.id != candidate.id)
        .filter(|slot| same_place_and_day(candidate, slot))
        .filter(|slot| range.overlaps(&slot.time_range()))
        .collect()
}
