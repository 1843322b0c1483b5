//! Reservation data types

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifecycle state of a concrete reservation slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Available,
    Blocked,
    Pending,
    Paid,
    Claimed,
    Cancelled,
}

impl ReservationStatus {
    /// Only Available slots can still be booked; every other state means
    /// the hour is taken (or explicitly closed)
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Recurring weekly template. Keyed by (day_of_week, hour), unique per owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservationSlotPreset {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    /// Hour of day, 0..=23
    pub hour: u8,
    pub price: f64,
}

/// A concrete, date-specific reservation. Overrides any preset for the same
/// timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub status: ReservationStatus,
    /// Price set on the record itself; when absent, the matching preset's
    /// price applies
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub booker_email: Option<String>,
    #[serde(default)]
    pub booker_title: Option<String>,
}

/// A bookable slot derived from presets + records. Ephemeral: recomputed on
/// every render, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedSlot {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub price: f64,
    pub bookable: bool,
}

impl ComputedSlot {
    pub fn hour(&self) -> u8 {
        self.date.hour()
    }
}
