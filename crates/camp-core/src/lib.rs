//! # camp-core
//!
//! Scheduling logic for the tennis-camp admin tool.
//!
//! The admin screens (coaches, groups, locations, weeks, camps, tournaments,
//! unavailability) and the week builder all need the same handful of
//! calculations. They live here as plain functions over in-memory data, with
//! no UI or database dependency.
//!
//! ## Modules
//!
//! - [`interval`]: closed date-range overlap, local calendar dates
//! - [`days`]: expand a date range into its calendar days
//! - [`time`]: `HH:MM` parsing and half-open same-day overlap
//! - [`booking`]: flag locations booked twice at the same time
//! - [`natural`]: numeric-aware name ordering (`Court 2` before `Court 10`)
//! - [`join`]: resolve join-table associations in memory
//! - [`model`]: stored record types
//! - [`store`]: document-store boundary, association replacement, cascades
//! - [`week`]: week builder: tournaments, unavailability and camps per week
//! - [`error`]: Error types

pub mod booking;
pub mod days;
pub mod error;
pub mod interval;
pub mod join;
#[cfg(feature = "memory-store")]
pub mod memory;
pub mod model;
pub mod natural;
pub mod store;
pub mod time;
pub mod week;

pub use booking::{find_double_bookings, DoubleBooking};
pub use days::{expand_days, DayInfo};
pub use error::CampError;
pub use interval::{overlaps, DateRange};
pub use join::{attach_children, Association, Identified, WithChildren};
#[cfg(feature = "memory-store")]
pub use memory::MemoryStore;
pub use natural::{natural_compare, sort_naturally};
pub use store::{replace_associations, DocumentStore};
pub use time::{time_overlaps, TimeOfDay, TimeRange};
pub use week::{build_week_overview, WeekOverview};
