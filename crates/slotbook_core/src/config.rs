//! Core configuration: admin credential and first-run seed plan.
//!
//! # Invariants
//! - Defaults reproduce the shipped widget: password `123456`, four days
//!   (today, +1, +2, +7) by four time labels, five seats each.

use crate::model::slot::{SlotStatus, TimeSlot};
use chrono::{Days, NaiveDate};

/// Admin password accepted by `AdminService::login` unless overridden.
pub const DEFAULT_ADMIN_PASSWORD: &str = "123456";

const DEFAULT_DAY_OFFSETS: [u64; 4] = [0, 1, 2, 7];
const DEFAULT_TIME_LABELS: [&str; 4] = ["10:00 AM", "12:00 PM", "03:00 PM", "05:00 PM"];
const DEFAULT_SEATS_PER_SLOT: u32 = 5;

/// Slots written on first access to an empty slot store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    /// Days after "today" that receive slots.
    pub day_offsets: Vec<u64>,
    pub time_labels: Vec<String>,
    pub seats_per_slot: u32,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            day_offsets: DEFAULT_DAY_OFFSETS.to_vec(),
            time_labels: DEFAULT_TIME_LABELS.iter().map(|label| label.to_string()).collect(),
            seats_per_slot: DEFAULT_SEATS_PER_SLOT,
        }
    }
}

impl SeedPlan {
    /// Expands the plan into active slots, days outer and labels inner.
    pub fn build(&self, today: NaiveDate) -> Vec<TimeSlot> {
        self.day_offsets
            .iter()
            .filter_map(|offset| today.checked_add_days(Days::new(*offset)))
            .flat_map(move |date| {
                self.time_labels.iter().map(move |label| {
                    TimeSlot::new(date, label.clone(), self.seats_per_slot, SlotStatus::Active)
                })
            })
            .collect()
    }
}

/// Settings shared by every service behind one `BookingDesk`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub admin_password: String,
    pub seed: SeedPlan,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            seed: SeedPlan::default(),
        }
    }
}
