//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the booking widget contract to Dart via FRB.
//! - Translate between plain strings/records and core domain types.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported in envelopes (`ok = false` + message), never thrown.
//! - Dates cross the boundary as `YYYY-MM-DD` strings, IDs as UUID strings.

use chrono::NaiveDate;
use slotbook_core::db::open_db;
use slotbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, report_file_name,
    Booking, BookingDesk, BookingFilter, BookingOutcome, BookingRequest, ServiceResult, SlotPatch,
    SlotStatus, SoftwarePackage, SqliteKvRepository, TimeSlot,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const STORE_DB_FILE_NAME: &str = "slotbook.sqlite3";
const STORE_DB_PATH_ENV: &str = "SLOTBOOK_DB_PATH";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Slot row for the date view and the admin capacity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotItem {
    pub slot_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub time: String,
    pub total_slots: u32,
    pub available_slots: u32,
    /// `active|inactive`.
    pub status: String,
}

/// Booking row for the admin report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingItem {
    pub booking_id: String,
    pub company_name: String,
    pub software_package: String,
    pub phone_number: String,
    pub date: String,
    pub time_slot: String,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
}

/// List envelope for slot queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotListResponse {
    pub ok: bool,
    pub items: Vec<SlotItem>,
    pub message: String,
}

/// List envelope for booking queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingListResponse {
    pub ok: bool,
    pub items: Vec<BookingItem>,
    pub message: String,
}

/// Dashboard counters envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStatsResponse {
    pub ok: bool,
    pub today_total: u64,
    pub upcoming_total: u64,
    pub available_today: u64,
    pub message: String,
}

/// CSV report envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExportResponse {
    pub ok: bool,
    /// Suggested download name (`report_YYYY-MM-DD.csv`).
    pub file_name: String,
    pub csv: String,
    pub message: String,
}

/// Generic action envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected slot or booking ID, when one exists.
    pub id: Option<String>,
    /// Human-readable message for the UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Lists active slots on `date`, seeding defaults on first use.
#[flutter_rust_bridge::frb(sync)]
pub fn slots_for_date(date: String) -> SlotListResponse {
    let result = parse_date(&date).and_then(|date| with_desk(|desk| desk.list_slots_for_date(date)));
    slot_list_response("slots_for_date", result)
}

/// Lists every slot for the admin capacity table.
#[flutter_rust_bridge::frb(sync)]
pub fn all_slots() -> SlotListResponse {
    slot_list_response("all_slots", with_desk(|desk| desk.list_all_slots()))
}

/// Creates a slot (`status`: `active|inactive`).
#[flutter_rust_bridge::frb(sync)]
pub fn create_slot(date: String, time: String, total_slots: u32, status: String) -> ActionResponse {
    let result = parse_date(&date)
        .and_then(|date| Ok((date, parse_status(&status)?)))
        .and_then(|(date, status)| {
            with_desk(|desk| desk.create_slot(date, time.trim(), total_slots, status))
        });
    match result {
        Ok(slot) => ActionResponse::success("Slot created.", Some(slot.id.to_string())),
        Err(err) => ActionResponse::failure(format!("create_slot failed: {err}")),
    }
}

/// Applies a partial slot edit; `None` fields stay unchanged.
///
/// An unknown `slot_id` succeeds with a "not found" message and no change.
#[flutter_rust_bridge::frb(sync)]
pub fn update_slot(
    slot_id: String,
    date: Option<String>,
    time: Option<String>,
    total_slots: Option<u32>,
    status: Option<String>,
) -> ActionResponse {
    let patch = || -> Result<SlotPatch, String> {
        Ok(SlotPatch {
            date: date.as_deref().map(parse_date).transpose()?,
            time: time.map(|time| time.trim().to_string()),
            total_slots,
            status: status.as_deref().map(parse_status).transpose()?,
        })
    };
    let result = parse_id(&slot_id)
        .and_then(|id| Ok((id, patch()?)))
        .and_then(|(id, patch)| with_desk(|desk| desk.update_slot(id, &patch)));
    match result {
        Ok(Some(slot)) => ActionResponse::success("Slot updated.", Some(slot.id.to_string())),
        Ok(None) => ActionResponse::success("Slot not found; nothing changed.", None),
        Err(err) => ActionResponse::failure(format!("update_slot failed: {err}")),
    }
}

/// Deletes a slot; its bookings stay in the ledger.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_slot(slot_id: String) -> ActionResponse {
    let result = parse_id(&slot_id).and_then(|id| with_desk(|desk| desk.delete_slot(id)));
    match result {
        Ok(true) => ActionResponse::success("Slot deleted.", Some(slot_id)),
        Ok(false) => ActionResponse::success("Slot not found; nothing changed.", None),
        Err(err) => ActionResponse::failure(format!("delete_slot failed: {err}")),
    }
}

/// Books one seat.
///
/// # FFI contract
/// - `ok = false` with the unavailability message when the slot is missing
///   or full; input errors carry the validation message.
/// - On success `id` is the new booking ID.
#[flutter_rust_bridge::frb(sync)]
pub fn create_booking(
    date: String,
    time_slot: String,
    company_name: String,
    phone_number: String,
    software_package: String,
) -> ActionResponse {
    let request = || -> Result<BookingRequest, String> {
        Ok(BookingRequest {
            date: parse_date(&date)?,
            time_slot: time_slot.clone(),
            company_name: company_name.trim().to_string(),
            phone_number: phone_number.trim().to_string(),
            software_package: parse_package(&software_package)?,
        })
    };
    let result = request().and_then(|request| with_desk(|desk| desk.create_booking(&request)));
    match result {
        Ok(outcome @ BookingOutcome::Confirmed(_)) => ActionResponse::success(
            outcome.message(),
            outcome.booking().map(|booking| booking.id.to_string()),
        ),
        Ok(outcome @ BookingOutcome::Unavailable) => ActionResponse::failure(outcome.message()),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Lists the full ledger in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn all_bookings() -> BookingListResponse {
    booking_list_response("all_bookings", with_desk(|desk| desk.list_all_bookings()))
}

/// Lists bookings matching the report filter, newest date first.
#[flutter_rust_bridge::frb(sync)]
pub fn filter_bookings(
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> BookingListResponse {
    let result = parse_filter(search, start_date, end_date)
        .and_then(|filter| with_desk(|desk| desk.filter_bookings(&filter)));
    booking_list_response("filter_bookings", result)
}

/// Dashboard counters relative to `today` (defaults to the current UTC day).
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_stats(today: Option<String>) -> DashboardStatsResponse {
    let result = today
        .as_deref()
        .map(parse_date)
        .transpose()
        .and_then(|requested| {
            with_desk(|desk| desk.compute_dashboard_stats(requested.unwrap_or_else(|| desk.today())))
        });
    match result {
        Ok(stats) => DashboardStatsResponse {
            ok: true,
            today_total: stats.today_total as u64,
            upcoming_total: stats.upcoming_total as u64,
            available_today: stats.available_today,
            message: String::new(),
        },
        Err(err) => DashboardStatsResponse {
            ok: false,
            today_total: 0,
            upcoming_total: 0,
            available_today: 0,
            message: format!("dashboard_stats failed: {err}"),
        },
    }
}

/// Renders the filtered report as CSV with its suggested file name.
#[flutter_rust_bridge::frb(sync)]
pub fn export_bookings_csv(
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> ReportExportResponse {
    let result = parse_filter(search, start_date, end_date).and_then(|filter| {
        with_desk(|desk| Ok((desk.export_bookings_csv(&filter)?, desk.today())))
    });
    match result {
        Ok((csv, today)) => ReportExportResponse {
            ok: true,
            file_name: report_file_name(today),
            csv,
            message: String::new(),
        },
        Err(err) => ReportExportResponse {
            ok: false,
            file_name: String::new(),
            csv: String::new(),
            message: format!("export_bookings_csv failed: {err}"),
        },
    }
}

/// Starts an admin session; `false` on wrong password or storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn admin_login(password: String) -> bool {
    with_desk(|desk| desk.admin_login(&password)).unwrap_or(false)
}

#[flutter_rust_bridge::frb(sync)]
pub fn admin_is_logged_in() -> bool {
    with_desk(|desk| desk.is_admin_logged_in()).unwrap_or(false)
}

#[flutter_rust_bridge::frb(sync)]
pub fn admin_logout() -> ActionResponse {
    match with_desk(|desk| desk.admin_logout()) {
        Ok(()) => ActionResponse::success("Logged out.", None),
        Err(err) => ActionResponse::failure(format!("admin_logout failed: {err}")),
    }
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_desk<T>(
    f: impl FnOnce(&BookingDesk<SqliteKvRepository<'_>>) -> ServiceResult<T>,
) -> Result<T, String> {
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        log::warn!(
            "event=store_open module=ffi status=error path={} error={err}",
            db_path.display()
        );
        format!("store DB open failed: {err}")
    })?;
    let desk = BookingDesk::new(SqliteKvRepository::new(&conn));
    f(&desk).map_err(|err| err.to_string())
}

fn slot_list_response(operation: &str, result: Result<Vec<TimeSlot>, String>) -> SlotListResponse {
    match result {
        Ok(slots) => SlotListResponse {
            ok: true,
            message: format!("Found {} slot(s).", slots.len()),
            items: slots.into_iter().map(to_slot_item).collect(),
        },
        Err(err) => SlotListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn booking_list_response(
    operation: &str,
    result: Result<Vec<Booking>, String>,
) -> BookingListResponse {
    match result {
        Ok(bookings) => BookingListResponse {
            ok: true,
            message: format!("Found {} booking(s).", bookings.len()),
            items: bookings.into_iter().map(to_booking_item).collect(),
        },
        Err(err) => BookingListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn parse_filter(
    search: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> Result<BookingFilter, String> {
    Ok(BookingFilter {
        search: search.filter(|value| !value.trim().is_empty()),
        start_date: start_date.as_deref().map(parse_date).transpose()?,
        end_date: end_date.as_deref().map(parse_date).transpose()?,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date `{}`; expected YYYY-MM-DD", raw.trim()))
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid id `{}`", raw.trim()))
}

fn parse_status(raw: &str) -> Result<SlotStatus, String> {
    SlotStatus::parse(raw)
        .ok_or_else(|| format!("unsupported slot status `{raw}`; expected active|inactive"))
}

fn parse_package(raw: &str) -> Result<SoftwarePackage, String> {
    SoftwarePackage::parse(raw).ok_or_else(|| {
        let offered = SoftwarePackage::ALL.map(SoftwarePackage::as_str).join("|");
        format!("unsupported software package `{raw}`; expected {offered}")
    })
}

fn to_slot_item(slot: TimeSlot) -> SlotItem {
    SlotItem {
        slot_id: slot.id.to_string(),
        date: slot.date.to_string(),
        time: slot.time,
        total_slots: slot.total_slots,
        available_slots: slot.available_slots,
        status: slot.status.as_str().to_string(),
    }
}

fn to_booking_item(booking: Booking) -> BookingItem {
    BookingItem {
        booking_id: booking.id.to_string(),
        company_name: booking.company_name,
        software_package: booking.software_package.as_str().to_string(),
        phone_number: booking.phone_number,
        date: booking.date.to_string(),
        time_slot: booking.time_slot,
        created_at: booking.created_at.to_rfc3339(),
    }
}
