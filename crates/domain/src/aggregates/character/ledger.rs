//! Consumption and recovery of slots and class pools.
//!
//! Every operation validates against the current maxima before writing, so a
//! rejected call leaves the character exactly as it was.

use super::Character;
use crate::entities::{ArcaneRecovery, ClassResources, ResourceId, SlotPoolRef};
use crate::error::LedgerError;
use crate::events::{ArcaneRecoveryOutcome, LedgerOutcome};
use crate::game_systems::arcane_recovery_budget;
use crate::value_objects::CharacterClass;

impl Character {
    /// Spend `amount` uses of a class pool.
    pub fn consume_resource(
        &mut self,
        resource: ResourceId,
        amount: u32,
    ) -> Result<LedgerOutcome, LedgerError> {
        let pool = self.resource_pool(resource)?;
        let next = pool.consume(amount, resource.key())?;
        self.class_resources = self.class_resources.with_pool(resource, next);
        Ok(LedgerOutcome::Resource {
            resource,
            used: next.used(),
            max: next.max(),
        })
    }

    /// Give back `amount` uses of a class pool.
    pub fn recover_resource(
        &mut self,
        resource: ResourceId,
        amount: u32,
    ) -> Result<LedgerOutcome, LedgerError> {
        let pool = self.resource_pool(resource)?;
        let next = pool.recover(amount, resource.key())?;
        self.class_resources = self.class_resources.with_pool(resource, next);
        Ok(LedgerOutcome::Resource {
            resource,
            used: next.used(),
            max: next.max(),
        })
    }

    /// The pool a spell of `spell_level` draws from.
    ///
    /// An Occultiste casting at its pact level uses the pact pool; everything
    /// else uses the per-level pool.
    pub fn slot_target(&self, spell_level: u8) -> SlotPoolRef {
        let pact_level = self.spell_slots.pact().map(|pact| pact.slot_level());
        if self.class == Some(CharacterClass::Occultiste) && pact_level == Some(spell_level) {
            SlotPoolRef::Pact
        } else {
            SlotPoolRef::Leveled(spell_level)
        }
    }

    /// Expend `amount` slots of `spell_level`.
    pub fn consume_slot(
        &mut self,
        spell_level: u8,
        amount: u32,
    ) -> Result<LedgerOutcome, LedgerError> {
        let target = self.slot_target(spell_level);
        let slots = self.spell_slots.consume(target, amount)?;
        self.spell_slots = slots;
        Ok(self.slot_outcome(target))
    }

    /// Restore `amount` expended slots of `spell_level`.
    pub fn recover_slot(
        &mut self,
        spell_level: u8,
        amount: u32,
    ) -> Result<LedgerOutcome, LedgerError> {
        let target = self.slot_target(spell_level);
        let slots = self.spell_slots.recover(target, amount)?;
        self.spell_slots = slots;
        Ok(self.slot_outcome(target))
    }

    /// Arcane recovery: restore one expended slot of `spell_level`, paying
    /// `spell_level` units from the budget of `max(1, ceil(level / 2))`.
    ///
    /// A level 3 slot costs 3 units, not 1. Once the budget is fully spent
    /// the feature is marked used until the next long rest.
    pub fn exchange_arcane_recovery(
        &mut self,
        spell_level: u8,
    ) -> Result<ArcaneRecoveryOutcome, LedgerError> {
        let recovery = self
            .class_resources
            .arcane_recovery()
            .ok_or(LedgerError::NotArcaneCaster)?;
        if recovery.is_used() {
            return Err(LedgerError::ArcaneRecoveryAlreadyUsed);
        }

        let budget = arcane_recovery_budget(self.level);
        let spent = recovery.levels_recovered();
        if spent >= budget {
            return Err(LedgerError::ArcaneRecoveryBudgetExhausted { spent, budget });
        }

        let target = SlotPoolRef::Leveled(spell_level);
        if self.spell_slots.used(spell_level).unwrap_or(0) == 0 {
            return Err(LedgerError::NoConsumedSlot(spell_level));
        }

        let remaining = budget - spent;
        if spell_level > remaining {
            return Err(LedgerError::ExceedsArcaneBudget {
                level: spell_level,
                remaining,
            });
        }

        let slots = self.spell_slots.recover(target, 1)?;
        let budget_spent = spent + spell_level;
        let exhausted = budget_spent >= budget;

        self.spell_slots = slots;
        self.class_resources = ClassResources::Magicien {
            arcane_recovery: ArcaneRecovery::new(exhausted, budget_spent),
        };

        Ok(ArcaneRecoveryOutcome {
            spell_level,
            budget_spent,
            budget_remaining: budget - budget_spent,
            exhausted,
        })
    }

    fn resource_pool(&self, resource: ResourceId) -> Result<crate::entities::Pool, LedgerError> {
        self.class_resources
            .pool(resource, self.bardic_inspiration_cap())
            .ok_or_else(|| LedgerError::UntrackedResource(resource.key().to_string()))
    }

    fn slot_outcome(&self, target: SlotPoolRef) -> LedgerOutcome {
        let pool = match target {
            SlotPoolRef::Leveled(level) => self.spell_slots.pool(level),
            SlotPoolRef::Pact => self.spell_slots.pact().map(|pact| pact.pool()),
        }
        .unwrap_or_default();
        LedgerOutcome::Slot {
            pool: target,
            used: pool.used(),
            max: pool.max(),
        }
    }
}
