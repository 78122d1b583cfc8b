use chrono::{Days, NaiveDate};
use slotbook_core::repo::collections::SLOTS_KEY;
use slotbook_core::{
    BookingDesk, BookingRequest, CoreConfig, FixedClock, KvRepository, MemoryKvRepository,
    RepoError, ServiceError, SlotPatch, SlotStatus, SlotValidationError, SoftwarePackage,
};
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn desk(repo: &MemoryKvRepository) -> BookingDesk<&MemoryKvRepository, FixedClock> {
    BookingDesk::with_config(repo, FixedClock::at_day(today()), CoreConfig::default())
}

fn book(desk: &BookingDesk<&MemoryKvRepository, FixedClock>, date: NaiveDate, time: &str) -> bool {
    desk.create_booking(&BookingRequest {
        date,
        time_slot: time.to_string(),
        company_name: "Acme".to_string(),
        phone_number: "0123456789".to_string(),
        software_package: SoftwarePackage::CloudBasic,
    })
    .unwrap()
    .is_success()
}

#[test]
fn first_listing_seeds_default_slots() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);

    let todays = desk.list_slots_for_date(today()).unwrap();
    let labels: Vec<_> = todays.iter().map(|slot| slot.time.as_str()).collect();
    assert_eq!(labels, vec!["10:00 AM", "12:00 PM", "03:00 PM", "05:00 PM"]);

    let all = desk.list_all_slots().unwrap();
    assert_eq!(all.len(), 16);
    let next_week = today().checked_add_days(Days::new(7)).unwrap();
    assert_eq!(desk.list_slots_for_date(next_week).unwrap().len(), 4);
    let day_three = today().checked_add_days(Days::new(3)).unwrap();
    assert!(desk.list_slots_for_date(day_three).unwrap().is_empty());
}

#[test]
fn admin_listing_does_not_seed() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);

    assert!(desk.list_all_slots().unwrap().is_empty());
    assert_eq!(repo.get(SLOTS_KEY).unwrap(), None);
}

#[test]
fn emptied_store_is_not_reseeded() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);

    for slot in desk.list_slots_for_date(today()).unwrap() {
        assert!(desk.delete_slot(slot.id).unwrap());
    }
    for slot in desk.list_all_slots().unwrap() {
        desk.delete_slot(slot.id).unwrap();
    }

    assert!(desk.list_slots_for_date(today()).unwrap().is_empty());
    assert!(desk.list_all_slots().unwrap().is_empty());
}

#[test]
fn create_slot_starts_with_full_capacity() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);

    let created = desk
        .create_slot(today(), " 08:00 AM ", 12, SlotStatus::Active)
        .unwrap();
    assert_eq!(created.time, "08:00 AM");
    assert_eq!((created.total_slots, created.available_slots), (12, 12));

    let listed = desk.list_all_slots().unwrap();
    assert_eq!(listed, vec![created]);
}

#[test]
fn create_slot_rejects_blank_label() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);

    let err = desk
        .create_slot(today(), "   ", 3, SlotStatus::Active)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidSlot(SlotValidationError::EmptyTimeLabel)
    ));
    assert!(desk.list_all_slots().unwrap().is_empty());
}

#[test]
fn inactive_slots_are_hidden_from_visitors_only() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);

    let hidden = desk
        .create_slot(today(), "07:00 PM", 3, SlotStatus::Inactive)
        .unwrap();
    let shown = desk
        .create_slot(today(), "08:00 PM", 3, SlotStatus::Active)
        .unwrap();

    let visible = desk.list_slots_for_date(today()).unwrap();
    assert_eq!(visible, vec![shown.clone()]);
    assert_eq!(desk.list_all_slots().unwrap(), vec![hidden, shown]);
}

#[test]
fn capacity_change_shifts_remaining_and_clamps_at_zero() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    let slot = desk
        .create_slot(today(), "10:00 AM", 5, SlotStatus::Active)
        .unwrap();
    assert!(book(&desk, today(), "10:00 AM"));
    assert!(book(&desk, today(), "10:00 AM"));

    let grown = desk
        .update_slot(
            slot.id,
            &SlotPatch {
                total_slots: Some(8),
                ..SlotPatch::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!((grown.total_slots, grown.available_slots), (8, 6));

    let shrunk = desk
        .update_slot(
            slot.id,
            &SlotPatch {
                total_slots: Some(1),
                status: Some(SlotStatus::Inactive),
                ..SlotPatch::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!((shrunk.total_slots, shrunk.available_slots), (1, 0));
    assert_eq!(shrunk.status, SlotStatus::Inactive);

    // bookings are not cancelled by shrinking
    assert_eq!(desk.list_all_bookings().unwrap().len(), 2);
    for stored in desk.list_all_slots().unwrap() {
        assert!(stored.available_slots <= stored.total_slots);
    }
}

#[test]
fn update_and_delete_of_unknown_id_are_no_ops() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    let slot = desk
        .create_slot(today(), "10:00 AM", 5, SlotStatus::Active)
        .unwrap();

    let missing = Uuid::new_v4();
    let patch = SlotPatch {
        total_slots: Some(1),
        ..SlotPatch::default()
    };
    assert_eq!(desk.update_slot(missing, &patch).unwrap(), None);
    assert!(!desk.delete_slot(missing).unwrap());
    assert_eq!(desk.list_all_slots().unwrap(), vec![slot]);
}

#[test]
fn update_rejects_blank_label_without_writing() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    let slot = desk
        .create_slot(today(), "10:00 AM", 5, SlotStatus::Active)
        .unwrap();

    let err = desk
        .update_slot(
            slot.id,
            &SlotPatch {
                time: Some(String::new()),
                total_slots: Some(9),
                ..SlotPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidSlot(_)));
    assert_eq!(desk.list_all_slots().unwrap(), vec![slot.clone()]);

    let renamed = desk
        .update_slot(
            slot.id,
            &SlotPatch {
                time: Some(" 11:00 AM ".to_string()),
                ..SlotPatch::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(renamed.time, "11:00 AM");
    assert!(book(&desk, today(), "11:00 AM"));
}

#[test]
fn deleting_a_slot_keeps_its_bookings() {
    let repo = MemoryKvRepository::new();
    let desk = desk(&repo);
    let slot = desk
        .create_slot(today(), "10:00 AM", 5, SlotStatus::Active)
        .unwrap();
    assert!(book(&desk, today(), "10:00 AM"));

    assert!(desk.delete_slot(slot.id).unwrap());

    assert!(desk.list_all_slots().unwrap().is_empty());
    let bookings = desk.list_all_bookings().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].slot_id, Some(slot.id));
    assert_eq!(bookings[0].time_slot, "10:00 AM");
}

#[test]
fn corrupted_slot_collection_is_reported_not_reseeded() {
    let repo = MemoryKvRepository::with_entries([(SLOTS_KEY, "not json at all")]);
    let desk = desk(&repo);

    let err = desk.list_slots_for_date(today()).unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::InvalidData(_))));
    let err = desk.list_all_slots().unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::InvalidData(_))));
    assert_eq!(repo.get(SLOTS_KEY).unwrap().as_deref(), Some("not json at all"));
}
