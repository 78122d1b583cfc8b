//! Store facade exposing the whole UI-facing contract.
//!
//! # Responsibility
//! - Own one repository handle and one clock for all slot, booking and admin
//!   use cases.
//! - Be the only surface presentation layers talk to.
//!
//! # Invariants
//! - All services behind one desk share the same backend, so a booking unit
//!   and a slot edit never see different stores.

use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::export::bookings_to_csv;
use crate::model::booking::{Booking, BookingRequest};
use crate::model::slot::{SlotId, SlotPatch, SlotStatus, TimeSlot};
use crate::repo::kv_repo::KvRepository;
use crate::service::admin_service::AdminService;
use crate::service::booking_service::{
    BookingFilter, BookingOutcome, BookingService, DashboardStats,
};
use crate::service::error::ServiceResult;
use crate::service::slot_service::SlotService;
use chrono::NaiveDate;

/// Scheduling widget core: slot store, booking ledger and admin session.
///
/// `R` is usually a cheap handle (`SqliteKvRepository<'_>` or `&Backend`),
/// cloned once per service.
pub struct BookingDesk<R: KvRepository + Clone, C: Clock + Clone = SystemClock> {
    slots: SlotService<R, C>,
    bookings: BookingService<R, C>,
    admin: AdminService<R>,
    clock: C,
}

impl<R: KvRepository + Clone> BookingDesk<R> {
    /// Creates a desk on the system clock with default configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, SystemClock, CoreConfig::default())
    }
}

impl<R: KvRepository + Clone, C: Clock + Clone> BookingDesk<R, C> {
    pub fn with_config(repo: R, clock: C, config: CoreConfig) -> Self {
        Self {
            slots: SlotService::with_clock(repo.clone(), clock.clone(), config.seed),
            bookings: BookingService::with_clock(repo.clone(), clock.clone()),
            admin: AdminService::with_password(repo, config.admin_password),
            clock,
        }
    }

    /// Current day according to the desk clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn list_slots_for_date(&self, date: NaiveDate) -> ServiceResult<Vec<TimeSlot>> {
        self.slots.list_slots_for_date(date)
    }

    pub fn list_all_slots(&self) -> ServiceResult<Vec<TimeSlot>> {
        self.slots.list_all_slots()
    }

    pub fn create_slot(
        &self,
        date: NaiveDate,
        time: impl Into<String>,
        total_slots: u32,
        status: SlotStatus,
    ) -> ServiceResult<TimeSlot> {
        self.slots.create_slot(date, time, total_slots, status)
    }

    pub fn update_slot(&self, id: SlotId, patch: &SlotPatch) -> ServiceResult<Option<TimeSlot>> {
        self.slots.update_slot(id, patch)
    }

    pub fn delete_slot(&self, id: SlotId) -> ServiceResult<bool> {
        self.slots.delete_slot(id)
    }

    pub fn create_booking(&self, request: &BookingRequest) -> ServiceResult<BookingOutcome> {
        self.bookings.create_booking(request)
    }

    pub fn list_all_bookings(&self) -> ServiceResult<Vec<Booking>> {
        self.bookings.list_all_bookings()
    }

    pub fn filter_bookings(&self, filter: &BookingFilter) -> ServiceResult<Vec<Booking>> {
        self.bookings.filter_bookings(filter)
    }

    pub fn compute_dashboard_stats(&self, today: NaiveDate) -> ServiceResult<DashboardStats> {
        self.bookings.compute_dashboard_stats(today)
    }

    /// Renders the filtered booking report as CSV.
    pub fn export_bookings_csv(&self, filter: &BookingFilter) -> ServiceResult<String> {
        Ok(bookings_to_csv(&self.bookings.filter_bookings(filter)?)?)
    }

    pub fn admin_login(&self, password: &str) -> ServiceResult<bool> {
        self.admin.login(password)
    }

    pub fn is_admin_logged_in(&self) -> ServiceResult<bool> {
        self.admin.is_logged_in()
    }

    pub fn admin_logout(&self) -> ServiceResult<()> {
        self.admin.logout()
    }
}
