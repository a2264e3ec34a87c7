//! Progression and resource rules for a tabletop RPG character tracker.
//!
//! The crate is pure: no I/O, no async, no logging. Callers load a
//! [`Character`], apply an operation, and persist the result themselves.

extern crate self as sheetwright_domain;

pub mod aggregates;
pub mod common;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use aggregates::{Character, LevelUpRequest};

pub use entities::{
    ArcaneRecovery, ChannelDivinity, ClassResources, PactMagic, Pool, ResourceId, SlotPoolRef,
    SneakAttack, SpellSlots, MAX_SPELL_LEVEL,
};

pub use error::{DomainError, LedgerError, LevelUpError};

pub use events::{
    ArcaneRecoveryOutcome, HitDieOutcome, LedgerOutcome, LevelUpOutcome, ProgressionChange,
    RestOutcome,
};

pub use game_systems::{
    arcane_recovery_budget, resolve_class_resources, resolve_spell_knowledge, resolve_spell_slots,
    BuiltinSubclasses, CasterType, RestType, SpellKnowledge, SubclassCatalog,
};

pub use ids::CharacterId;

pub use value_objects::{
    resolve_modifier, score_to_modifier, Ability, CharacterClass, CharacterLevel, HitDice,
};
