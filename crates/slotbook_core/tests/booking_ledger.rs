use chrono::{Days, NaiveDate};
use slotbook_core::repo::collections::{BOOKINGS_KEY, SLOTS_KEY};
use slotbook_core::{
    BookingDesk, BookingFilter, BookingOutcome, BookingRequest, BookingService,
    BookingValidationError, CoreConfig, DashboardStats, FixedClock, KvRepository, KvWrite,
    MemoryKvRepository, RepoError, RepoResult, ServiceError, SlotStatus, SoftwarePackage,
    SLOT_UNAVAILABLE_MESSAGE,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn tomorrow() -> NaiveDate {
    today().checked_add_days(Days::new(1)).unwrap()
}

fn desk(repo: &MemoryKvRepository) -> BookingDesk<&MemoryKvRepository, FixedClock> {
    BookingDesk::with_config(repo, FixedClock::at_day(today()), CoreConfig::default())
}

fn request(date: NaiveDate, time: &str, company: &str) -> BookingRequest {
    BookingRequest {
        date,
        time_slot: time.to_string(),
        company_name: company.to_string(),
        phone_number: "+1 555 010 2030".to_string(),
        software_package: SoftwarePackage::EnterpriseSuite,
    }
}

fn remaining(desk: &BookingDesk<&MemoryKvRepository, FixedClock>, time: &str) -> u32 {
    desk.list_all_slots()
        .unwrap()
        .into_iter()
        .find(|slot| slot.date == today() && slot.time == time)
        .map(|slot| slot.available_slots)
        .unwrap()
}

#[test]
fn seeded_slot_accepts_five_bookings_then_reports_unavailable() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    desk.list_slots_for_date(today()).unwrap();

    let first = desk
        .create_booking(&request(today(), "10:00 AM", "Acme"))
        .unwrap();
    assert!(first.is_success());
    assert_eq!(first.message(), "Booking successful!");
    let booking = first.booking().unwrap();
    assert_eq!(booking.company_name, "Acme");
    assert_eq!(booking.created_at, FixedClock::at_day(today()).0);
    assert_eq!(remaining(&desk, "10:00 AM"), 4);

    for n in 0..4 {
        let outcome = desk
            .create_booking(&request(today(), "10:00 AM", &format!("Co {n}")))
            .unwrap();
        assert!(outcome.is_success());
    }
    assert_eq!(remaining(&desk, "10:00 AM"), 0);

    let sixth = desk
        .create_booking(&request(today(), "10:00 AM", "Late Ltd"))
        .unwrap();
    assert_eq!(sixth, BookingOutcome::Unavailable);
    assert!(!sixth.is_success());
    assert_eq!(sixth.message(), SLOT_UNAVAILABLE_MESSAGE);
    assert!(sixth.message().contains("filled up"));
    assert_eq!(remaining(&desk, "10:00 AM"), 0);
    assert_eq!(desk.list_all_bookings().unwrap().len(), 5);
    assert_eq!(remaining(&desk, "12:00 PM"), 5);
}

#[test]
fn booking_an_unknown_slot_changes_nothing() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    desk.list_slots_for_date(today()).unwrap();
    let slots_before = repo.get(SLOTS_KEY).unwrap();

    let outcome = desk
        .create_booking(&request(today(), "11:11 AM", "Acme"))
        .unwrap();
    assert_eq!(outcome, BookingOutcome::Unavailable);

    let wrong_day = today().checked_add_days(Days::new(3)).unwrap();
    let outcome = desk
        .create_booking(&request(wrong_day, "10:00 AM", "Acme"))
        .unwrap();
    assert_eq!(outcome, BookingOutcome::Unavailable);

    assert_eq!(repo.get(SLOTS_KEY).unwrap(), slots_before);
    assert_eq!(repo.get(BOOKINGS_KEY).unwrap(), None);
}

#[test]
fn invalid_phone_is_rejected_before_touching_capacity() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    desk.create_slot(today(), "10:00 AM", 2, SlotStatus::Active)
        .unwrap();

    let mut bad = request(today(), "10:00 AM", "Acme");
    bad.phone_number = "12-34".to_string();
    let err = desk.create_booking(&bad).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidBooking(BookingValidationError::InvalidPhoneNumber)
    ));

    assert_eq!(remaining(&desk, "10:00 AM"), 2);
    assert!(desk.list_all_bookings().unwrap().is_empty());
}

/// Backend wrapper that fails any unit which tries to write the ledger.
struct RejectLedgerWrites<'a>(&'a MemoryKvRepository);

impl KvRepository for RejectLedgerWrites<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.0.get(key)
    }

    fn read_modify_write<T, F>(&self, keys: &[&str], f: F) -> RepoResult<T>
    where
        F: FnOnce(Vec<Option<String>>) -> RepoResult<(T, Vec<KvWrite>)>,
    {
        self.0.read_modify_write(keys, |current| {
            let (output, writes) = f(current)?;
            if writes.iter().any(|write| write.key() == BOOKINGS_KEY) {
                return Err(RepoError::InvalidData("ledger is read-only".to_string()));
            }
            Ok((output, writes))
        })
    }
}

#[test]
fn failed_ledger_write_leaves_capacity_untouched() {
    let repo = MemoryKvRepository::new();
    desk(&repo)
        .create_slot(today(), "10:00 AM", 3, SlotStatus::Active)
        .unwrap();
    let slots_before = repo.get(SLOTS_KEY).unwrap();

    let service =
        BookingService::with_clock(RejectLedgerWrites(&repo), FixedClock::at_day(today()));
    let err = service
        .create_booking(&request(today(), "10:00 AM", "Acme"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::InvalidData(_))));

    assert_eq!(repo.get(SLOTS_KEY).unwrap(), slots_before);
    assert_eq!(repo.get(BOOKINGS_KEY).unwrap(), None);
}

#[test]
fn dashboard_stats_count_today_upcoming_and_open_seats() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    desk.create_slot(today(), "10:00 AM", 5, SlotStatus::Active)
        .unwrap();
    desk.create_slot(today(), "12:00 PM", 4, SlotStatus::Inactive)
        .unwrap();
    desk.create_slot(tomorrow(), "10:00 AM", 5, SlotStatus::Active)
        .unwrap();

    assert!(desk
        .create_booking(&request(today(), "10:00 AM", "A"))
        .unwrap()
        .is_success());
    assert!(desk
        .create_booking(&request(today(), "10:00 AM", "B"))
        .unwrap()
        .is_success());
    assert!(desk
        .create_booking(&request(tomorrow(), "10:00 AM", "C"))
        .unwrap()
        .is_success());

    let stats = desk.compute_dashboard_stats(today()).unwrap();
    assert_eq!(
        stats,
        DashboardStats {
            today_total: 2,
            upcoming_total: 3,
            available_today: 7,
        }
    );

    let stats_tomorrow = desk.compute_dashboard_stats(tomorrow()).unwrap();
    assert_eq!(stats_tomorrow.today_total, 1);
    assert_eq!(stats_tomorrow.upcoming_total, 1);
    assert_eq!(stats_tomorrow.available_today, 4);
}

#[test]
fn filtered_export_contains_matching_rows_only() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    desk.create_slot(today(), "10:00 AM", 5, SlotStatus::Active)
        .unwrap();
    desk.create_slot(tomorrow(), "10:00 AM", 5, SlotStatus::Active)
        .unwrap();
    desk.create_booking(&request(today(), "10:00 AM", "Acme"))
        .unwrap();
    desk.create_booking(&request(tomorrow(), "10:00 AM", "Globex"))
        .unwrap();
    desk.create_booking(&request(tomorrow(), "10:00 AM", "ACME Labs"))
        .unwrap();

    let filter = BookingFilter {
        search: Some("acme".to_string()),
        ..BookingFilter::default()
    };
    let listed = desk.filter_bookings(&filter).unwrap();
    let names: Vec<_> = listed.iter().map(|b| b.company_name.as_str()).collect();
    assert_eq!(names, vec!["ACME Labs", "Acme"]);

    let csv = desk.export_bookings_csv(&filter).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Date,Time,Company,Package,Phone,Booked At");
    assert!(lines[1].starts_with("2026-10-17,10:00 AM,ACME Labs,Enterprise Suite,"));
    assert!(lines[2].starts_with("2026-10-16,10:00 AM,Acme,Enterprise Suite,"));

    assert_eq!(desk.list_all_bookings().unwrap().len(), 3);
}
