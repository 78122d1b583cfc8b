//! Booking ledger use cases.
//!
//! # Responsibility
//! - Reserve one seat per booking request against the slot store.
//! - List, filter and summarize the ledger for the admin views.
//!
//! # Invariants
//! - A confirmed booking and its seat decrement commit in one repository
//!   unit; an unavailable slot leaves both collections untouched.
//! - Log events carry IDs and counts only, never company names or phones.

use crate::clock::{Clock, SystemClock};
use crate::model::booking::{Booking, BookingRequest};
use crate::model::slot::TimeSlot;
use crate::repo::collections::{
    decode_bookings, decode_slots, write_bookings, write_slots, BOOKINGS_KEY, SLOTS_KEY,
};
use crate::repo::kv_repo::KvRepository;
use crate::service::error::ServiceResult;
use chrono::NaiveDate;
use log::{info, warn};

/// Message returned when a booking succeeds.
pub const BOOKING_CONFIRMED_MESSAGE: &str = "Booking successful!";
/// Message returned when the requested slot is missing or full.
pub const SLOT_UNAVAILABLE_MESSAGE: &str =
    "This slot has just filled up. Please select another time.";

/// Result of a booking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Seat reserved; carries the stored ledger record.
    Confirmed(Booking),
    /// No slot matches `(date, time_slot)`, or it has no seat left.
    Unavailable,
}

impl BookingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    /// User-facing status message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Confirmed(_) => BOOKING_CONFIRMED_MESSAGE,
            Self::Unavailable => SLOT_UNAVAILABLE_MESSAGE,
        }
    }

    pub fn booking(&self) -> Option<&Booking> {
        match self {
            Self::Confirmed(booking) => Some(booking),
            Self::Unavailable => None,
        }
    }
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Bookings dated exactly today.
    pub today_total: usize,
    /// Bookings dated today or later.
    pub upcoming_total: usize,
    /// Remaining seats over all of today's slots, active or not.
    pub available_today: u64,
}

impl DashboardStats {
    pub fn compute(today: NaiveDate, bookings: &[Booking], slots: &[TimeSlot]) -> Self {
        Self {
            today_total: bookings.iter().filter(|booking| booking.date == today).count(),
            upcoming_total: bookings.iter().filter(|booking| booking.date >= today).count(),
            available_today: slots
                .iter()
                .filter(|slot| slot.date == today)
                .map(|slot| u64::from(slot.available_slots))
                .sum(),
        }
    }
}

/// Report filter used by the admin booking table and CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Case-insensitive company substring, or plain phone substring.
    pub search: Option<String>,
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                booking
                    .company_name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
                    || booking.phone_number.contains(needle)
            }
        };
        let matches_start = self.start_date.map_or(true, |start| booking.date >= start);
        let matches_end = self.end_date.map_or(true, |end| booking.date <= end);
        matches_search && matches_start && matches_end
    }

    /// Keeps matching bookings, newest date first.
    ///
    /// Bookings on the same date keep their ledger order.
    pub fn apply(&self, bookings: Vec<Booking>) -> Vec<Booking> {
        let mut kept: Vec<Booking> = bookings
            .into_iter()
            .filter(|booking| self.matches(booking))
            .collect();
        kept.sort_by(|left, right| right.date.cmp(&left.date));
        kept
    }
}

/// Booking ledger service over a key-value repository.
pub struct BookingService<R: KvRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: KvRepository> BookingService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: KvRepository, C: Clock> BookingService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Reserves one seat for `request`.
    ///
    /// # Contract
    /// - Invalid input returns `ServiceError::InvalidBooking` before any read.
    /// - Missing or full slot returns `Ok(BookingOutcome::Unavailable)`.
    /// - Otherwise the slot loses exactly one seat and the ledger gains exactly
    ///   one record, committed together.
    pub fn create_booking(&self, request: &BookingRequest) -> ServiceResult<BookingOutcome> {
        request.validate()?;
        let created_at = self.clock.now();

        let outcome = self
            .repo
            .read_modify_write(&[SLOTS_KEY, BOOKINGS_KEY], |current| {
                let mut current = current.into_iter();
                let mut slots = decode_slots(current.next().flatten().as_deref())?;
                let mut bookings = decode_bookings(current.next().flatten().as_deref())?;

                let Some(slot) = slots
                    .iter_mut()
                    .find(|slot| slot.matches(request.date, &request.time_slot))
                else {
                    return Ok((BookingOutcome::Unavailable, Vec::new()));
                };
                if !slot.take_seat() {
                    return Ok((BookingOutcome::Unavailable, Vec::new()));
                }

                let booking = Booking::confirm(request, slot.id, created_at);
                bookings.push(booking.clone());
                let writes = vec![write_slots(&slots)?, write_bookings(&bookings)?];
                Ok((BookingOutcome::Confirmed(booking), writes))
            })?;

        match &outcome {
            BookingOutcome::Confirmed(booking) => info!(
                "event=booking_create module=booking status=ok booking_id={} slot_id={} date={}",
                booking.id,
                booking.slot_id.map(|id| id.to_string()).unwrap_or_default(),
                booking.date
            ),
            BookingOutcome::Unavailable => warn!(
                "event=booking_create module=booking status=rejected reason=slot_unavailable date={}",
                request.date
            ),
        }
        Ok(outcome)
    }

    /// Returns the whole ledger in insertion order.
    pub fn list_all_bookings(&self) -> ServiceResult<Vec<Booking>> {
        let raw = self.repo.get(BOOKINGS_KEY)?;
        Ok(decode_bookings(raw.as_deref())?)
    }

    /// Returns bookings matching `filter`, newest date first.
    pub fn filter_bookings(&self, filter: &BookingFilter) -> ServiceResult<Vec<Booking>> {
        Ok(filter.apply(self.list_all_bookings()?))
    }

    /// Computes dashboard counters relative to the caller-supplied `today`.
    pub fn compute_dashboard_stats(&self, today: NaiveDate) -> ServiceResult<DashboardStats> {
        let mut current = self.repo.get_many(&[BOOKINGS_KEY, SLOTS_KEY])?.into_iter();
        let bookings = decode_bookings(current.next().flatten().as_deref())?;
        let slots = decode_slots(current.next().flatten().as_deref())?;
        Ok(DashboardStats::compute(today, &bookings, &slots))
    }
}
