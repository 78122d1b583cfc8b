//! Use-case services over the key-value repository.
//!
//! # Responsibility
//! - Turn repository units into slot, booking and admin use cases.
//! - Keep FFI/CLI callers away from raw keys and JSON.

pub mod admin_service;
pub mod booking_service;
pub mod error;
pub mod slot_service;
