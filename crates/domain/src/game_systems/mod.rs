//! Rule tables and policies.
//!
//! Everything here is a pure function of (class, level, ability modifiers):
//!
//! - `spell_slots`: slot maxima and pact magic progression
//! - `spell_knowledge`: cantrip and prepared-spell counts
//! - `class_resources`: class pool maxima and rest recovery
//! - `subclasses`: built-in subclass catalog

mod class_resources;
mod spell_knowledge;
mod spell_slots;
mod subclasses;
mod traits;

pub use class_resources::{
    arcane_recovery_budget, bardic_inspiration_cap, favored_foe_uses, paladin_channel_divinity,
    rage_uses, reclamp_live_caps, resolve_class_resources, restore_class_resources,
    sneak_attack_dice,
};
pub use spell_knowledge::{resolve_spell_knowledge, SpellKnowledge, PREPARED_LABEL};
pub use spell_slots::{pact_magic, resolve_spell_slots, slot_maxima};
pub use subclasses::BuiltinSubclasses;
pub use traits::{find_subclass, CasterType, RestType, SubclassCatalog};

#[cfg(test)]
pub use traits::MockSubclassCatalog;
