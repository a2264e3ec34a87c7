//! Progression-related domain events

use crate::entities::SlotPoolRef;
use crate::game_systems::{RestType, SpellKnowledge};
use crate::value_objects::{CharacterClass, CharacterLevel};

/// What a consume/recover call changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// A class pool moved
    Resource {
        resource: crate::entities::ResourceId,
        used: u32,
        max: u32,
    },
    /// A spell slot pool moved
    Slot { pool: SlotPoolRef, used: u32, max: u32 },
}

impl LedgerOutcome {
    pub fn used(&self) -> u32 {
        match self {
            LedgerOutcome::Resource { used, .. } | LedgerOutcome::Slot { used, .. } => *used,
        }
    }

    pub fn max(&self) -> u32 {
        match self {
            LedgerOutcome::Resource { max, .. } | LedgerOutcome::Slot { max, .. } => *max,
        }
    }
}

/// A successful arcane recovery exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcaneRecoveryOutcome {
    pub spell_level: u8,
    /// Budget spent this cycle, including this exchange
    pub budget_spent: u8,
    pub budget_remaining: u8,
    /// The budget is gone and the feature is marked used
    pub exhausted: bool,
}

/// A committed level-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpOutcome {
    pub from: CharacterLevel,
    pub to: CharacterLevel,
    pub hp_gain: i32,
    pub spell_knowledge: SpellKnowledge,
    /// Set only when the milestone choice was applied
    pub subclass_chosen: Option<String>,
}

/// A completed rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestOutcome {
    pub rest: RestType,
    pub hp_restored: i32,
    pub hit_dice_recovered: u8,
}

/// A hit die spent to heal during a short rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitDieOutcome {
    pub roll: u8,
    pub healed: i32,
    pub remaining: u8,
}

/// Outcome of editing class or level outside a level-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionChange {
    /// Class replaced; any subclass of the old class is dropped
    ClassChanged {
        from: Option<CharacterClass>,
        to: Option<CharacterClass>,
        subclass_cleared: Option<String>,
    },
    /// Level replaced; the subclass is dropped below the milestone
    LevelSet {
        from: CharacterLevel,
        to: CharacterLevel,
        subclass_cleared: Option<String>,
    },
    Unchanged,
}
