//! Spell slot progression tables.

use std::collections::BTreeMap;

use super::traits::CasterType;
use crate::entities::SpellSlots;
use crate::value_objects::{CharacterClass, CharacterLevel};

// Indexed by character level; index 0 is unused. Entry `i` of a row is the
// slot count at spell level `i + 1`.

const FULL_CASTER_SLOTS: [&[u32]; 21] = [
    &[],
    &[2],
    &[3],
    &[4, 2],
    &[4, 3],
    &[4, 3, 2],
    &[4, 3, 3],
    &[4, 3, 3, 1],
    &[4, 3, 3, 2],
    &[4, 3, 3, 3, 1],
    &[4, 3, 3, 3, 2],
    &[4, 3, 3, 3, 2, 1],
    &[4, 3, 3, 3, 2, 1],
    &[4, 3, 3, 3, 2, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1, 1],
    &[4, 3, 3, 3, 3, 1, 1, 1, 1],
    &[4, 3, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 3, 2, 2, 1, 1],
];

const HALF_CASTER_SLOTS: [&[u32]; 21] = [
    &[],
    &[2],
    &[2],
    &[3],
    &[3],
    &[4, 2],
    &[4, 2],
    &[4, 3],
    &[4, 3],
    &[4, 3, 2],
    &[4, 3, 2],
    &[4, 3, 3],
    &[4, 3, 3],
    &[4, 3, 3, 1],
    &[4, 3, 3, 1],
    &[4, 3, 3, 2],
    &[4, 3, 3, 2],
    &[4, 3, 3, 3, 1],
    &[4, 3, 3, 3, 1],
    &[4, 3, 3, 3, 2],
    &[4, 3, 3, 3, 2],
];

/// `(pact_slots, pact_level)` per character level.
const PACT_MAGIC: [(u32, u8); 21] = [
    (0, 0),
    (1, 1),
    (2, 1),
    (2, 2),
    (2, 2),
    (2, 3),
    (2, 3),
    (2, 4),
    (2, 4),
    (2, 5),
    (2, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (4, 5),
    (4, 5),
    (4, 5),
    (4, 5),
];

/// Slot maxima per spell level for a full or half caster.
pub fn slot_maxima(caster: CasterType, level: CharacterLevel) -> BTreeMap<u8, u32> {
    let row: &[u32] = match caster {
        CasterType::Full => FULL_CASTER_SLOTS[level.table_index()],
        CasterType::Half => HALF_CASTER_SLOTS[level.table_index()],
        CasterType::Pact => &[],
    };
    row.iter()
        .enumerate()
        .map(|(i, &count)| ((i + 1) as u8, count))
        .collect()
}

/// `(slots, slot_level)` of the pact pool at a character level.
pub fn pact_magic(level: CharacterLevel) -> (u32, u8) {
    PACT_MAGIC[level.table_index()]
}

/// Refresh a slot record for a class and level.
///
/// Classes without a slot economy (and "no class") get `current` back as-is.
/// Casters get fresh maxima; their `used` counters survive but are clamped
/// to the new maxima.
pub fn resolve_spell_slots(
    class: Option<CharacterClass>,
    level: CharacterLevel,
    current: &SpellSlots,
) -> SpellSlots {
    let Some(caster) = class.and_then(CasterType::for_class) else {
        return current.clone();
    };
    match caster {
        CasterType::Pact => {
            let (slots, slot_level) = pact_magic(level);
            current.refresh_pact(slots, slot_level)
        }
        CasterType::Full | CasterType::Half => {
            current.refresh_leveled(slot_maxima(caster, level), caster.tracked_levels())
        }
    }
}
