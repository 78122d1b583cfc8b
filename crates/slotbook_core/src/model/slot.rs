//! Time slot model and capacity arithmetic.
//!
//! # Responsibility
//! - Define the bookable `(date, time label)` unit and its capacity counters.
//! - Apply admin patches without breaking the capacity invariant.
//!
//! # Invariants
//! - `available_slots` never exceeds `total_slots`.
//! - Capacity counters are unsigned, so "negative remaining" is unrepresentable;
//!   every decrement goes through a checked path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a time slot.
pub type SlotId = Uuid;

/// Whether a slot is offered to visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Listed in the public date view.
    Active,
    /// Hidden from visitors, still visible to admins.
    Inactive,
}

impl SlotStatus {
    /// Stable string id used in storage and across FFI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a status from its stable string id.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl Display for SlotStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bookable training slot.
///
/// Field names match the persisted JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    /// Calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Display label such as `10:00 AM`; compared by exact string equality.
    pub time: String,
    pub total_slots: u32,
    pub available_slots: u32,
    pub status: SlotStatus,
}

impl TimeSlot {
    /// Creates a slot with a fresh ID and all seats available.
    pub fn new(date: NaiveDate, time: impl Into<String>, total_slots: u32, status: SlotStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            time: time.into(),
            total_slots,
            available_slots: total_slots,
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SlotStatus::Active
    }

    /// Returns whether `(date, time)` addresses this slot.
    pub fn matches(&self, date: NaiveDate, time: &str) -> bool {
        self.date == date && self.time == time
    }

    /// Consumes one seat.
    ///
    /// Returns `false` and leaves the slot untouched when no seat is left.
    pub fn take_seat(&mut self) -> bool {
        match self.available_slots.checked_sub(1) {
            Some(remaining) => {
                self.available_slots = remaining;
                true
            }
            None => false,
        }
    }

    /// Changes total capacity, shifting remaining seats by the same delta.
    ///
    /// Remaining seats are clamped at zero when the new total is below the
    /// number already booked; existing bookings are not cancelled.
    pub fn resize(&mut self, new_total: u32) {
        let delta = i64::from(new_total) - i64::from(self.total_slots);
        let shifted = (i64::from(self.available_slots) + delta).max(0);
        // `available <= total` before the shift implies `shifted <= new_total`.
        self.available_slots = u32::try_from(shifted).unwrap_or(new_total).min(new_total);
        self.total_slots = new_total;
    }

    /// Checks the capacity invariant and label shape.
    pub fn validate(&self) -> Result<(), SlotValidationError> {
        if self.time.trim().is_empty() {
            return Err(SlotValidationError::EmptyTimeLabel);
        }
        if self.available_slots > self.total_slots {
            return Err(SlotValidationError::RemainingExceedsTotal {
                remaining: self.available_slots,
                total: self.total_slots,
            });
        }
        Ok(())
    }
}

/// Slot invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValidationError {
    EmptyTimeLabel,
    RemainingExceedsTotal { remaining: u32, total: u32 },
}

impl Display for SlotValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTimeLabel => write!(f, "slot time label cannot be empty"),
            Self::RemainingExceedsTotal { remaining, total } => write!(
                f,
                "available_slots ({remaining}) cannot exceed total_slots ({total})"
            ),
        }
    }
}

impl Error for SlotValidationError {}

/// Partial admin edit of a slot. `None` leaves a field unchanged.
///
/// Remaining capacity is deliberately absent: it only moves through
/// bookings or through `total_slots` changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPatch {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub total_slots: Option<u32>,
    pub status: Option<SlotStatus>,
}

impl SlotPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.time.is_none()
            && self.total_slots.is_none()
            && self.status.is_none()
    }

    /// Applies this patch to `slot` in place; the time label is stored trimmed.
    pub fn apply_to(&self, slot: &mut TimeSlot) {
        if let Some(total) = self.total_slots {
            slot.resize(total);
        }
        if let Some(date) = self.date {
            slot.date = date;
        }
        if let Some(time) = &self.time {
            slot.time = time.trim().to_string();
        }
        if let Some(status) = self.status {
            slot.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SlotPatch, SlotStatus, SlotValidationError, TimeSlot};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn new_slot_starts_fully_available() {
        let slot = TimeSlot::new(day(), "10:00 AM", 5, SlotStatus::Active);
        assert_eq!(slot.available_slots, 5);
        assert!(slot.validate().is_ok());
    }

    #[test]
    fn take_seat_stops_at_zero() {
        let mut slot = TimeSlot::new(day(), "10:00 AM", 1, SlotStatus::Active);
        assert!(slot.take_seat());
        assert!(!slot.take_seat());
        assert_eq!(slot.available_slots, 0);
    }

    #[test]
    fn resize_shifts_remaining_by_delta() {
        let mut slot = TimeSlot::new(day(), "10:00 AM", 5, SlotStatus::Active);
        slot.available_slots = 3;

        slot.resize(8);
        assert_eq!((slot.total_slots, slot.available_slots), (8, 6));

        slot.resize(4);
        assert_eq!((slot.total_slots, slot.available_slots), (4, 2));
    }

    #[test]
    fn resize_below_booked_count_clamps_remaining_at_zero() {
        let mut slot = TimeSlot::new(day(), "10:00 AM", 5, SlotStatus::Active);
        slot.available_slots = 1;

        slot.resize(2);
        assert_eq!((slot.total_slots, slot.available_slots), (2, 0));
        assert!(slot.validate().is_ok());
    }

    #[test]
    fn validate_rejects_remaining_above_total() {
        let mut slot = TimeSlot::new(day(), "10:00 AM", 2, SlotStatus::Active);
        slot.available_slots = 3;
        assert_eq!(
            slot.validate(),
            Err(SlotValidationError::RemainingExceedsTotal {
                remaining: 3,
                total: 2
            })
        );
    }

    #[test]
    fn patch_overwrites_status_and_label() {
        let mut slot = TimeSlot::new(day(), "10:00 AM", 5, SlotStatus::Active);
        let patch = SlotPatch {
            time: Some(" 11:00 AM ".to_string()),
            status: Some(SlotStatus::Inactive),
            ..SlotPatch::default()
        };
        patch.apply_to(&mut slot);
        assert_eq!(slot.time, "11:00 AM");
        assert_eq!(slot.status, SlotStatus::Inactive);
        assert_eq!(slot.available_slots, 5);
    }

    #[test]
    fn status_parses_stable_ids() {
        assert_eq!(SlotStatus::parse(" inactive"), Some(SlotStatus::Inactive));
        assert_eq!(SlotStatus::parse("Active"), None);
    }
}
