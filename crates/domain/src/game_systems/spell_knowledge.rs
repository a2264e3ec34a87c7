//! Cantrip and prepared-spell counts per class and level.
//!
//! These counts are the authoritative bounds on how many spells of each tier
//! a character may have ready.

use crate::value_objects::{CharacterClass, CharacterLevel};

pub const PREPARED_LABEL: &str = "Sorts préparés";

/// What a class knows at a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellKnowledge {
    None,
    Prepared {
        /// Absent for classes without cantrips (Paladin, Rôdeur).
        cantrips: Option<u8>,
        prepared: u8,
        label: &'static str,
        note: &'static str,
    },
}

impl SpellKnowledge {
    pub fn cantrips(&self) -> Option<u8> {
        match self {
            SpellKnowledge::Prepared { cantrips, .. } => *cantrips,
            SpellKnowledge::None => None,
        }
    }

    pub fn prepared(&self) -> Option<u8> {
        match self {
            SpellKnowledge::Prepared { prepared, .. } => Some(*prepared),
            SpellKnowledge::None => None,
        }
    }
}

// Indexed by character level; index 0 is unused.

const BARD_CANTRIPS: [u8; 21] = [0, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4];
const CLERIC_CANTRIPS: [u8; 21] = [0, 3, 3, 3, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5];
const DRUID_CANTRIPS: [u8; 21] = [0, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4];
const SORCERER_CANTRIPS: [u8; 21] =
    [0, 4, 4, 4, 5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6];
const WARLOCK_CANTRIPS: [u8; 21] = [0, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4];
const WIZARD_CANTRIPS: [u8; 21] = [0, 3, 3, 3, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5];

const BARD_CLERIC_DRUID_PREPARED: [u8; 21] = [
    0, 4, 5, 6, 7, 9, 10, 11, 12, 14, 15, 16, 16, 17, 17, 18, 18, 19, 20, 21, 22,
];
const SORCERER_PREPARED: [u8; 21] = [
    0, 2, 4, 6, 7, 9, 10, 11, 12, 14, 15, 16, 16, 17, 17, 18, 18, 19, 20, 21, 22,
];
const WARLOCK_PREPARED: [u8; 21] = [
    0, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15,
];
const WIZARD_PREPARED: [u8; 21] = [
    0, 4, 5, 6, 7, 9, 10, 11, 12, 14, 15, 16, 16, 17, 18, 19, 21, 22, 23, 24, 25,
];
const HALF_CASTER_PREPARED: [u8; 21] = [
    0, 2, 3, 4, 5, 6, 6, 7, 7, 9, 9, 10, 10, 11, 11, 12, 12, 14, 14, 15, 15,
];

const NOTE_LONG_REST: &str = "Peut changer un sort préparé à chaque repos long.";
const NOTE_LEVEL_UP: &str = "Peut remplacer un sort préparé à chaque gain de niveau.";
const NOTE_ANY_LONG_REST: &str =
    "Peut modifier toute la liste des sorts préparés à chaque repos long.";
const NOTE_SPELLBOOK: &str =
    "Prépare ses sorts depuis son grimoire; la liste peut changer à chaque repos long.";

struct Row {
    cantrips: Option<&'static [u8; 21]>,
    prepared: &'static [u8; 21],
    note: &'static str,
}

fn row(class: CharacterClass) -> Option<Row> {
    let row = match class {
        CharacterClass::Barde => Row {
            cantrips: Some(&BARD_CANTRIPS),
            prepared: &BARD_CLERIC_DRUID_PREPARED,
            note: NOTE_LEVEL_UP,
        },
        CharacterClass::Clerc => Row {
            cantrips: Some(&CLERIC_CANTRIPS),
            prepared: &BARD_CLERIC_DRUID_PREPARED,
            note: NOTE_ANY_LONG_REST,
        },
        CharacterClass::Druide => Row {
            cantrips: Some(&DRUID_CANTRIPS),
            prepared: &BARD_CLERIC_DRUID_PREPARED,
            note: NOTE_ANY_LONG_REST,
        },
        CharacterClass::Ensorceleur => Row {
            cantrips: Some(&SORCERER_CANTRIPS),
            prepared: &SORCERER_PREPARED,
            note: NOTE_LEVEL_UP,
        },
        CharacterClass::Occultiste => Row {
            cantrips: Some(&WARLOCK_CANTRIPS),
            prepared: &WARLOCK_PREPARED,
            note: NOTE_LEVEL_UP,
        },
        CharacterClass::Magicien => Row {
            cantrips: Some(&WIZARD_CANTRIPS),
            prepared: &WIZARD_PREPARED,
            note: NOTE_SPELLBOOK,
        },
        CharacterClass::Paladin => Row {
            cantrips: None,
            prepared: &HALF_CASTER_PREPARED,
            note: NOTE_LONG_REST,
        },
        CharacterClass::Rodeur => Row {
            cantrips: None,
            prepared: &HALF_CASTER_PREPARED,
            note: NOTE_LONG_REST,
        },
        CharacterClass::Barbare
        | CharacterClass::Guerrier
        | CharacterClass::Moine
        | CharacterClass::Roublard => return None,
    };
    Some(row)
}

/// Spell knowledge for a class at a level. Pure lookup.
pub fn resolve_spell_knowledge(
    class: Option<CharacterClass>,
    level: CharacterLevel,
) -> SpellKnowledge {
    let Some(row) = class.and_then(row) else {
        return SpellKnowledge::None;
    };
    let index = level.table_index();
    SpellKnowledge::Prepared {
        cantrips: row.cantrips.map(|table| table[index]),
        prepared: row.prepared[index],
        label: PREPARED_LABEL,
        note: row.note,
    }
}
