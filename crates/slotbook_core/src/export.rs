//! Booking report export.
//!
//! # Invariants
//! - Column order is fixed: Date, Time, Company, Package, Phone, Booked At.
//! - Fields are quoted only when needed; records end with `\n` and the last
//!   record carries no terminator.

use crate::model::booking::Booking;
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CSV_HEADER: [&str; 6] = ["Date", "Time", "Company", "Package", "Phone", "Booked At"];
const BOOKED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type ExportResult<T> = Result<T, ExportError>;

/// Report rendering failure.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Encoding(std::string::FromUtf8Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv export failed: {err}"),
            Self::Encoding(err) => write!(f, "csv export produced invalid utf-8: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Encoding(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Renders bookings as CSV text, header first, rows joined by `\n`.
pub fn bookings_to_csv(bookings: &[Booking]) -> ExportResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for booking in bookings {
        writer.write_record([
            booking.date.to_string(),
            booking.time_slot.clone(),
            booking.company_name.clone(),
            booking.software_package.as_str().to_string(),
            booking.phone_number.clone(),
            booking.created_at.format(BOOKED_AT_FORMAT).to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))?;
    let mut text = String::from_utf8(bytes).map_err(ExportError::Encoding)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Download name for a report generated on `today`.
pub fn report_file_name(today: NaiveDate) -> String {
    format!("report_{}.csv", today.format("%Y-%m-%d"))
}
