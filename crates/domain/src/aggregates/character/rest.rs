//! Short and long rests.

use super::Character;
use crate::error::LedgerError;
use crate::events::{HitDieOutcome, RestOutcome};
use crate::game_systems::{restore_class_resources, RestType};
use crate::value_objects::Ability;

impl Character {
    /// Take a rest.
    ///
    /// A short rest brings back pact slots and the short-rest class pools.
    /// A long rest restores every slot and pool, heals to full and regains
    /// half the hit dice (at least one).
    pub fn take_rest(&mut self, rest: RestType) -> RestOutcome {
        let class_resources = restore_class_resources(&self.class_resources, rest, self.level);
        match rest {
            RestType::Short => {
                self.spell_slots = self.spell_slots.restore_pact();
                self.class_resources = class_resources;
                RestOutcome {
                    rest,
                    hp_restored: 0,
                    hit_dice_recovered: 0,
                }
            }
            RestType::Long => {
                let hp_restored = self.max_hp.saturating_sub(self.current_hp).max(0);
                self.spell_slots = self.spell_slots.restore_all();
                self.class_resources = class_resources;
                self.current_hp = self.max_hp;
                let hit_dice_recovered = self.hit_dice.recover_half();
                RestOutcome {
                    rest,
                    hp_restored,
                    hit_dice_recovered,
                }
            }
        }
    }

    /// Spend one hit die to heal `roll + Constitution` (at least 0), capped
    /// at maximum HP.
    pub fn spend_hit_die(&mut self, roll: u8) -> Result<HitDieOutcome, LedgerError> {
        let die = self.hit_die();
        if !(1..=die).contains(&roll) {
            return Err(LedgerError::HitDieRollOutOfRange { roll, die });
        }
        let mut hit_dice = self.hit_dice;
        if !hit_dice.spend() {
            return Err(LedgerError::NoHitDiceLeft);
        }

        let healing = i32::from(roll)
            .saturating_add(self.modifier(Ability::Constitution))
            .max(0);
        let current_hp = self
            .current_hp
            .saturating_add(healing)
            .min(self.max_hp)
            .max(self.current_hp);
        let healed = current_hp.saturating_sub(self.current_hp);
        self.hit_dice = hit_dice;
        self.current_hp = current_hp;
        Ok(HitDieOutcome {
            roll,
            healed,
            remaining: hit_dice.remaining(),
        })
    }
}
