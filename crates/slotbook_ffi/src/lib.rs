//! Flutter-facing bindings for `slotbook_core`.

pub mod api;
