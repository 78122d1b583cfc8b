//! Persisted collection keys and their JSON encoding.
//!
//! Slots and bookings are each stored as one JSON array under a fixed key;
//! the admin session is a plain `"true"` flag.

use crate::model::booking::Booking;
use crate::model::slot::TimeSlot;
use crate::repo::kv_repo::{KvWrite, RepoError, RepoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key holding the JSON array of `TimeSlot`.
pub const SLOTS_KEY: &str = "training_slots";
/// Key holding the JSON array of `Booking`.
pub const BOOKINGS_KEY: &str = "training_bookings";
/// Key holding the admin session flag.
pub const ADMIN_SESSION_KEY: &str = "training_admin_session";
/// Value of `ADMIN_SESSION_KEY` while an admin is logged in.
pub const ADMIN_SESSION_ACTIVE: &str = "true";

/// Decodes the slot collection; an absent key is an empty collection.
///
/// Every slot must pass `TimeSlot::validate()`.
pub fn decode_slots(raw: Option<&str>) -> RepoResult<Vec<TimeSlot>> {
    let slots: Vec<TimeSlot> = decode_list(SLOTS_KEY, raw)?;
    for slot in &slots {
        slot.validate().map_err(|err| {
            RepoError::InvalidData(format!("slot {} in `{SLOTS_KEY}`: {err}", slot.id))
        })?;
    }
    Ok(slots)
}

/// Decodes the booking ledger; an absent key is an empty ledger.
///
/// Every booking must pass `Booking::validate()`.
pub fn decode_bookings(raw: Option<&str>) -> RepoResult<Vec<Booking>> {
    let bookings: Vec<Booking> = decode_list(BOOKINGS_KEY, raw)?;
    for booking in &bookings {
        booking.validate().map_err(|err| {
            RepoError::InvalidData(format!("booking {} in `{BOOKINGS_KEY}`: {err}", booking.id))
        })?;
    }
    Ok(bookings)
}

/// Stages a full replacement of the slot collection.
pub fn write_slots(slots: &[TimeSlot]) -> RepoResult<KvWrite> {
    Ok(KvWrite::put(SLOTS_KEY, encode_list(SLOTS_KEY, slots)?))
}

/// Stages a full replacement of the booking ledger.
pub fn write_bookings(bookings: &[Booking]) -> RepoResult<KvWrite> {
    Ok(KvWrite::put(BOOKINGS_KEY, encode_list(BOOKINGS_KEY, bookings)?))
}

fn decode_list<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> RepoResult<Vec<T>> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text)
            .map_err(|err| RepoError::InvalidData(format!("`{key}` is not valid JSON: {err}"))),
    }
}

fn encode_list<T: Serialize>(key: &str, items: &[T]) -> RepoResult<String> {
    serde_json::to_string(items)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode `{key}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{decode_bookings, decode_slots};
    use crate::repo::kv_repo::RepoError;

    #[test]
    fn absent_or_blank_collections_decode_empty() {
        assert!(decode_slots(None).unwrap().is_empty());
        assert!(decode_bookings(Some("  ")).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = decode_slots(Some("{oops")).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("training_slots")));
    }

    #[test]
    fn slot_breaking_capacity_invariant_is_rejected() {
        let raw = r#"[{
            "id": "6f1c2a52-8d1e-4c1b-9a3e-1f4f0a4b7e11",
            "date": "2026-03-02",
            "time": "10:00 AM",
            "total_slots": 2,
            "available_slots": 3,
            "status": "active"
        }]"#;
        let err = decode_slots(Some(raw)).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("available_slots")));
    }

    #[test]
    fn booking_with_blank_company_is_rejected() {
        let raw = r#"[{
            "id": "0b6f5f38-6a4e-4bb4-8a55-8f0a3b2a9c02",
            "company_name": "  ",
            "software_package": "Cloud Basic",
            "phone_number": "0123456789",
            "date": "2026-03-02",
            "time_slot": "10:00 AM",
            "created_at": "2026-03-01T09:30:00Z"
        }]"#;
        let err = decode_bookings(Some(raw)).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("company name")));
    }

    #[test]
    fn booking_with_invalid_phone_is_rejected() {
        let raw = r#"[{
            "id": "0b6f5f38-6a4e-4bb4-8a55-8f0a3b2a9c03",
            "company_name": "Acme",
            "software_package": "Cloud Basic",
            "phone_number": "12345",
            "date": "2026-03-02",
            "time_slot": "10:00 AM",
            "created_at": "2026-03-01T09:30:00Z"
        }]"#;
        assert!(matches!(
            decode_bookings(Some(raw)),
            Err(RepoError::InvalidData(_))
        ));
    }

    #[test]
    fn booking_without_slot_id_loads_with_none() {
        let raw = r#"[{
            "id": "0b6f5f38-6a4e-4bb4-8a55-8f0a3b2a9c01",
            "company_name": "Acme",
            "software_package": "Cloud Basic",
            "phone_number": "0123456789",
            "date": "2026-03-02",
            "time_slot": "10:00 AM",
            "created_at": "2026-03-01T09:30:00Z"
        }]"#;
        let bookings = decode_bookings(Some(raw)).unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].slot_id, None);
    }
}
