//! Booking ledger records and request validation.
//!
//! # Responsibility
//! - Define the persisted `Booking` record and the closed package set.
//! - Validate visitor input before it reaches the ledger.
//!
//! # Invariants
//! - `software_package` is always one of the four offered packages.
//! - `slot_id`, when present, names the slot consumed at creation time; it
//!   may dangle after that slot is deleted.

use crate::model::slot::SlotId;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

// ASCII digits and ASCII whitespace only.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?(?-u:[\d\s-]){10,}$").expect("valid phone regex"));

/// Stable identifier of a booking.
pub type BookingId = Uuid;

/// Training package a company books a session for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoftwarePackage {
    #[serde(rename = "Enterprise Suite")]
    EnterpriseSuite,
    #[serde(rename = "Cloud Basic")]
    CloudBasic,
    #[serde(rename = "Security Pro")]
    SecurityPro,
    #[serde(rename = "Data Analytics")]
    DataAnalytics,
}

impl SoftwarePackage {
    /// All packages in the order they are offered.
    pub const ALL: [Self; 4] = [
        Self::EnterpriseSuite,
        Self::CloudBasic,
        Self::SecurityPro,
        Self::DataAnalytics,
    ];

    /// Display name, also used as the persisted value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnterpriseSuite => "Enterprise Suite",
            Self::CloudBasic => "Cloud Basic",
            Self::SecurityPro => "Security Pro",
            Self::DataAnalytics => "Data Analytics",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|package| package.as_str() == trimmed)
    }
}

impl Display for SoftwarePackage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visitor input for reserving one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub date: NaiveDate,
    /// Must equal the `time` label of a slot on `date`.
    pub time_slot: String,
    pub company_name: String,
    pub phone_number: String,
    pub software_package: SoftwarePackage,
}

impl BookingRequest {
    /// Checks visitor-supplied fields.
    ///
    /// Phone numbers accept an optional leading `+` followed by at least ten
    /// digits, spaces or dashes.
    pub fn validate(&self) -> Result<(), BookingValidationError> {
        validate_fields(&self.company_name, &self.time_slot, &self.phone_number)
    }
}

fn validate_fields(
    company_name: &str,
    time_slot: &str,
    phone_number: &str,
) -> Result<(), BookingValidationError> {
    if company_name.trim().is_empty() {
        return Err(BookingValidationError::EmptyCompanyName);
    }
    if time_slot.trim().is_empty() {
        return Err(BookingValidationError::EmptyTimeSlot);
    }
    if !PHONE_RE.is_match(phone_number) {
        return Err(BookingValidationError::InvalidPhoneNumber);
    }
    Ok(())
}

/// Booking input violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingValidationError {
    EmptyCompanyName,
    EmptyTimeSlot,
    InvalidPhoneNumber,
}

impl Display for BookingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCompanyName => write!(f, "company name cannot be empty"),
            Self::EmptyTimeSlot => write!(f, "time slot cannot be empty"),
            Self::InvalidPhoneNumber => write!(
                f,
                "Please enter a valid phone number (at least 10 digits)."
            ),
        }
    }
}

impl Error for BookingValidationError {}

/// Confirmed reservation stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub company_name: String,
    pub software_package: SoftwarePackage,
    pub phone_number: String,
    pub date: NaiveDate,
    pub time_slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<SlotId>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Builds a ledger record for an accepted request.
    pub fn confirm(request: &BookingRequest, slot_id: SlotId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name: request.company_name.trim().to_string(),
            software_package: request.software_package,
            phone_number: request.phone_number.trim().to_string(),
            date: request.date,
            time_slot: request.time_slot.clone(),
            slot_id: Some(slot_id),
            created_at,
        }
    }

    /// Re-checks the request rules on a stored record.
    pub fn validate(&self) -> Result<(), BookingValidationError> {
        validate_fields(&self.company_name, &self.time_slot, &self.phone_number)
    }
}
