//! Slot store use cases.
//!
//! # Responsibility
//! - List slots for visitors (active only) and admins (all).
//! - Create, patch and delete slots for admins.
//! - Seed the default slot set on first access to an empty store.
//!
//! # Invariants
//! - Seeding happens only while the slot key has never been written; an
//!   admin who deletes every slot gets an empty list, not a re-seed.
//! - Patching or deleting an unknown ID is a logged no-op.

use crate::clock::{Clock, SystemClock};
use crate::config::SeedPlan;
use crate::model::slot::{SlotId, SlotPatch, SlotStatus, SlotValidationError, TimeSlot};
use crate::repo::collections::{decode_slots, write_slots, SLOTS_KEY};
use crate::repo::kv_repo::KvRepository;
use crate::service::error::ServiceResult;
use chrono::NaiveDate;
use log::{info, warn};

/// Slot store service over a key-value repository.
pub struct SlotService<R: KvRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    seed: SeedPlan,
}

impl<R: KvRepository> SlotService<R> {
    /// Creates a service on the system clock with the default seed plan.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock, SeedPlan::default())
    }
}

impl<R: KvRepository, C: Clock> SlotService<R, C> {
    pub fn with_clock(repo: R, clock: C, seed: SeedPlan) -> Self {
        Self { repo, clock, seed }
    }

    /// Returns active slots on `date`, seeding the store first if it was never
    /// written.
    pub fn list_slots_for_date(&self, date: NaiveDate) -> ServiceResult<Vec<TimeSlot>> {
        let slots = match self.repo.get(SLOTS_KEY)? {
            Some(raw) => decode_slots(Some(&raw))?,
            None => self.seed_if_unwritten()?,
        };

        Ok(slots
            .into_iter()
            .filter(|slot| slot.date == date && slot.is_active())
            .collect())
    }

    /// Writes the seed set unless another unit wrote the slot key first.
    fn seed_if_unwritten(&self) -> ServiceResult<Vec<TimeSlot>> {
        let today = self.clock.today();
        let seed = &self.seed;

        let slots = self.repo.read_modify_write(&[SLOTS_KEY], |mut current| {
            let raw = current.pop().flatten();
            if raw.is_some() {
                return Ok((decode_slots(raw.as_deref())?, Vec::new()));
            }

            let seeded = seed.build(today);
            info!(
                "event=slot_seed module=slot status=ok anchor={today} count={}",
                seeded.len()
            );
            let write = write_slots(&seeded)?;
            Ok((seeded, vec![write]))
        })?;
        Ok(slots)
    }

    /// Returns every slot regardless of status, in stored order.
    pub fn list_all_slots(&self) -> ServiceResult<Vec<TimeSlot>> {
        let raw = self.repo.get(SLOTS_KEY)?;
        Ok(decode_slots(raw.as_deref())?)
    }

    /// Creates a slot with all seats available.
    pub fn create_slot(
        &self,
        date: NaiveDate,
        time: impl Into<String>,
        total_slots: u32,
        status: SlotStatus,
    ) -> ServiceResult<TimeSlot> {
        let time: String = time.into();
        let slot = TimeSlot::new(date, time.trim(), total_slots, status);
        slot.validate()?;

        self.repo.read_modify_write(&[SLOTS_KEY], |mut current| {
            let mut slots = decode_slots(current.pop().flatten().as_deref())?;
            slots.push(slot.clone());
            Ok(((), vec![write_slots(&slots)?]))
        })?;

        info!(
            "event=slot_create module=slot status=ok slot_id={} date={} total={} state={}",
            slot.id, slot.date, slot.total_slots, slot.status
        );
        Ok(slot)
    }

    /// Applies a partial edit.
    ///
    /// Changing `total_slots` shifts remaining seats by the same delta,
    /// clamped at zero. Returns `None` when `id` is unknown.
    pub fn update_slot(&self, id: SlotId, patch: &SlotPatch) -> ServiceResult<Option<TimeSlot>> {
        if patch.time.as_deref().is_some_and(|time| time.trim().is_empty()) {
            return Err(SlotValidationError::EmptyTimeLabel.into());
        }

        let updated = self.repo.read_modify_write(&[SLOTS_KEY], |mut current| {
            let mut slots = decode_slots(current.pop().flatten().as_deref())?;
            let Some(slot) = slots.iter_mut().find(|slot| slot.id == id) else {
                return Ok((None, Vec::new()));
            };
            patch.apply_to(slot);
            let updated = slot.clone();
            Ok((Some(updated), vec![write_slots(&slots)?]))
        })?;

        match &updated {
            Some(slot) => info!(
                "event=slot_update module=slot status=ok slot_id={id} total={} available={} state={}",
                slot.total_slots, slot.available_slots, slot.status
            ),
            None => warn!("event=slot_update module=slot status=skipped reason=not_found slot_id={id}"),
        }
        Ok(updated)
    }

    /// Removes a slot. Bookings that reference it are left in the ledger.
    ///
    /// Returns whether a slot was removed.
    pub fn delete_slot(&self, id: SlotId) -> ServiceResult<bool> {
        let removed = self.repo.read_modify_write(&[SLOTS_KEY], |mut current| {
            let mut slots = decode_slots(current.pop().flatten().as_deref())?;
            let before = slots.len();
            slots.retain(|slot| slot.id != id);
            if slots.len() == before {
                return Ok((false, Vec::new()));
            }
            Ok((true, vec![write_slots(&slots)?]))
        })?;

        if removed {
            info!("event=slot_delete module=slot status=ok slot_id={id}");
        } else {
            warn!("event=slot_delete module=slot status=skipped reason=not_found slot_id={id}");
        }
        Ok(removed)
    }
}
