//! Domain model for the slot store and booking ledger.
//!
//! # Responsibility
//! - Define the persisted record shapes (`TimeSlot`, `Booking`).
//! - Own the capacity arithmetic so every caller shares one rule set.
//!
//! # Invariants
//! - `0 <= available_slots <= total_slots` for every slot that passes
//!   `TimeSlot::validate()`.
//! - Bookings point at slots by `(date, time_slot)` value; nothing cascades
//!   when a slot goes away.

pub mod booking;
pub mod slot;
