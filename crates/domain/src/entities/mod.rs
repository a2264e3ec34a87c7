//! Domain entities - the mutable pieces of a character's progression state

mod class_resources;
mod pool;
mod spell_slots;

pub use class_resources::{
    ArcaneRecovery, ChannelDivinity, ClassResources, ResourceId, SneakAttack,
};
pub use pool::Pool;
pub use spell_slots::{PactMagic, SlotPoolRef, SpellSlots, MAX_SPELL_LEVEL};
