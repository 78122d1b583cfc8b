//! Service-level error type shared by the slot, booking and admin use cases.

use crate::export::ExportError;
use crate::model::booking::BookingValidationError;
use crate::model::slot::SlotValidationError;
use crate::repo::kv_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a use-case call.
///
/// Capacity exhaustion is not an error; see `BookingOutcome`.
#[derive(Debug)]
pub enum ServiceError {
    /// Admin slot input breaks a slot invariant.
    InvalidSlot(SlotValidationError),
    /// Visitor booking input was rejected.
    InvalidBooking(BookingValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Report rendering failure.
    Export(ExportError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlot(err) => write!(f, "{err}"),
            Self::InvalidBooking(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSlot(err) => Some(err),
            Self::InvalidBooking(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<SlotValidationError> for ServiceError {
    fn from(value: SlotValidationError) -> Self {
        Self::InvalidSlot(value)
    }
}

impl From<BookingValidationError> for ServiceError {
    fn from(value: BookingValidationError) -> Self {
        Self::InvalidBooking(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
