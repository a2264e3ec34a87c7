//! Value objects - immutable, identity-less domain values

mod ability;
mod character_class;
mod level;

pub use ability::{resolve_modifier, score_to_modifier, Ability, MODIFIER_BOUND};
pub use character_class::{hit_die_for, CharacterClass, DEFAULT_HIT_DIE};
pub use level::{CharacterLevel, HitDice, MAX_LEVEL, MIN_LEVEL, SUBCLASS_MILESTONE_LEVEL};
