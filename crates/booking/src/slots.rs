//! Slot computation
//!
//! Two operations with deliberately different granularity:
//!
//! - `compute_day_slots` is the fine, hour-level merge of records and
//!   presets for one focal date.
//! - `compute_disabled_dates` is a coarse date-level pass over the
//!   advance-booking window, used to grey out calendar days.
//!
//! The coarse pass can enable a date whose fine pass yields zero slots
//! (e.g. all of today's preset hours already passed). That mismatch is
//! shipped behavior pending product confirmation; do not "fix" it here
//! without changing both layers together.

use std::collections::HashSet;

use time::{Date, Duration, OffsetDateTime, Time};

use crate::types::{ComputedSlot, ReservationRecord, ReservationSlotPreset};

/// Day-of-week index matching the preset encoding (0 = Sunday)
fn weekday_index(date: Date) -> u8 {
    date.weekday().number_days_from_sunday()
}

/// Timestamp for `hour` o'clock on `date` (UTC). None for out-of-range hours.
fn slot_datetime(date: Date, hour: u8) -> Option<OffsetDateTime> {
    let time = Time::from_hms(hour, 0, 0).ok()?;
    Some(date.with_time(time).assume_utc())
}

/// Compute the ordered list of bookable slots for `focal_date`.
///
/// Two-pass merge encoding the override invariant: explicit records are
/// processed first and always win over presets for their hour; presets then
/// fill the hours no record touched. Hours are unique in the output.
pub fn compute_day_slots(
    presets: &[ReservationSlotPreset],
    records: &[ReservationRecord],
    focal_date: Date,
    now: OffsetDateTime,
) -> Vec<ComputedSlot> {
    let weekday = weekday_index(focal_date);
    let mut seen_hours: HashSet<u8> = HashSet::new();
    let mut slots = Vec::new();

    // Pass 1: explicit records. A record in any state claims its hour, but
    // only Available records that are not already in the past become slots.
    for record in records.iter().filter(|r| r.date.date() == focal_date) {
        let hour = record.date.hour();
        if !seen_hours.insert(hour) {
            continue;
        }
        if !record.status.is_available() || record.date < now {
            continue;
        }

        let price = record.price.or_else(|| {
            presets
                .iter()
                .find(|p| p.day_of_week == weekday && p.hour == hour)
                .map(|p| p.price)
        });
        slots.push(ComputedSlot {
            date: record.date,
            price: price.unwrap_or(0.0),
            bookable: true,
        });
    }

    // Pass 2: presets fill the gaps. When the focal date is today, an hour
    // must be strictly after the current hour to still be bookable.
    let today = now.date();
    for preset in presets.iter().filter(|p| p.day_of_week == weekday) {
        if seen_hours.contains(&preset.hour) {
            continue;
        }
        if focal_date == today && preset.hour <= now.hour() {
            continue;
        }
        if let Some(date) = slot_datetime(focal_date, preset.hour) {
            slots.push(ComputedSlot {
                date,
                price: preset.price,
                bookable: true,
            });
        }
    }

    slots.sort_by_key(|slot| slot.hour());
    slots
}

/// Compute the calendar dates within `[min_date, min_date + advance_days)`
/// that have nothing bookable at all: no future Available record and no
/// preset for that weekday.
///
/// Intentionally coarser than `compute_day_slots` (see module docs).
pub fn compute_disabled_dates(
    presets: &[ReservationSlotPreset],
    records: &[ReservationRecord],
    min_date: Date,
    advance_days: u32,
    now: OffsetDateTime,
) -> Vec<Date> {
    let mut disabled = Vec::new();

    for offset in 0..advance_days {
        let date = min_date.saturating_add(Duration::days(offset as i64));

        let has_open_record = records
            .iter()
            .any(|r| r.date.date() == date && r.status.is_available() && r.date >= now);
        let has_preset = presets
            .iter()
            .any(|p| p.day_of_week == weekday_index(date));

        if !has_open_record && !has_preset {
            disabled.push(date);
        }
    }

    disabled
}
