//! Shared rule vocabulary: caster archetypes, rests, and the subclass
//! catalog seam.

use crate::value_objects::CharacterClass;

/// Spell slot economy of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasterType {
    /// Full caster (Barde, Clerc, Druide, Ensorceleur, Magicien)
    Full,
    /// Half caster (Paladin, Rôdeur)
    Half,
    /// Pact magic (Occultiste)
    Pact,
}

impl CasterType {
    /// Classify a class. Martial classes and "no class" have no slot economy.
    pub fn for_class(class: CharacterClass) -> Option<CasterType> {
        match class {
            CharacterClass::Barde
            | CharacterClass::Clerc
            | CharacterClass::Druide
            | CharacterClass::Ensorceleur
            | CharacterClass::Magicien => Some(CasterType::Full),
            CharacterClass::Paladin | CharacterClass::Rodeur => Some(CasterType::Half),
            CharacterClass::Occultiste => Some(CasterType::Pact),
            CharacterClass::Barbare
            | CharacterClass::Guerrier
            | CharacterClass::Moine
            | CharacterClass::Roublard => None,
        }
    }

    /// How many `usedN` counters the slot record keeps for this archetype.
    pub fn tracked_levels(&self) -> u8 {
        match self {
            CasterType::Full => 9,
            CasterType::Half => 5,
            CasterType::Pact => 0,
        }
    }
}

/// Rest type for resource recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestType {
    /// Short rest (typically 1 hour)
    Short,
    /// Long rest (typically 8 hours)
    Long,
}

impl std::str::FromStr for RestType {
    type Err = crate::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::common::fold_key(s).as_str() {
            "short" | "court" | "repos court" => Ok(RestType::Short),
            "long" | "repos long" => Ok(RestType::Long),
            _ => Err(crate::error::DomainError::parse(format!(
                "Unknown rest type: {}",
                s
            ))),
        }
    }
}

/// Source of subclass options offered at the milestone level.
///
/// An empty list disables the mandatory choice for that class.
#[cfg_attr(test, mockall::automock)]
pub trait SubclassCatalog: Send + Sync {
    fn options(&self, class: CharacterClass) -> Vec<String>;
}

/// Case- and accent-insensitive lookup; returns the catalog's spelling.
pub fn find_subclass(
    catalog: &dyn SubclassCatalog,
    class: CharacterClass,
    name: &str,
) -> Option<String> {
    let wanted = crate::common::fold_key(name);
    catalog
        .options(class)
        .into_iter()
        .find(|option| crate::common::fold_key(option) == wanted)
}
