//! Core domain logic for SlotBook, the training-slot booking widget.
//! This crate is the single source of truth for capacity invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod desk;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CoreConfig, SeedPlan, DEFAULT_ADMIN_PASSWORD};
pub use desk::BookingDesk;
pub use export::{bookings_to_csv, report_file_name, ExportError, ExportResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::booking::{
    Booking, BookingId, BookingRequest, BookingValidationError, SoftwarePackage,
};
pub use model::slot::{SlotId, SlotPatch, SlotStatus, SlotValidationError, TimeSlot};
pub use repo::json_file_kv::JsonFileKvRepository;
pub use repo::kv_repo::{KvRepository, KvWrite, RepoError, RepoResult};
pub use repo::memory_kv::MemoryKvRepository;
pub use repo::sqlite_kv::SqliteKvRepository;
pub use service::admin_service::AdminService;
pub use service::booking_service::{
    BookingFilter, BookingOutcome, BookingService, DashboardStats, BOOKING_CONFIRMED_MESSAGE,
    SLOT_UNAVAILABLE_MESSAGE,
};
pub use service::error::{ServiceError, ServiceResult};
pub use service::slot_service::SlotService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
