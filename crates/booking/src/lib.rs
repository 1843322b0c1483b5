//! booking: Reservation calendar slot computation
//!
//! Pure math over weekly presets and explicit reservation records. No I/O,
//! no async - safe to recompute on every render.
//!
//! # Model
//!
//! A creator configures recurring weekly presets (day-of-week + hour +
//! price). Concrete reservations are date-specific records. For any given
//! timestamp an explicit record strictly overrides the weekly preset; with
//! no record the preset (if any) defines availability and price; with
//! neither, the slot is unbookable.

pub mod slots;
pub mod types;

pub use slots::{compute_day_slots, compute_disabled_dates};
pub use types::{ComputedSlot, ReservationRecord, ReservationSlotPreset, ReservationStatus};
