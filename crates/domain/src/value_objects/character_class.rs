//! The twelve character classes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::fold_key;
use crate::error::DomainError;

/// Hit die used when the class is unknown or not yet chosen.
pub const DEFAULT_HIT_DIE: u8 = 8;

/// A character class, named the way the sheet stores it.
///
/// Parsing is case- and accent-insensitive; serialisation always writes the
/// canonical spelling (`"Rôdeur"`, not `"rodeur"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CharacterClass {
    Barbare,
    Barde,
    Clerc,
    Druide,
    Ensorceleur,
    Guerrier,
    Magicien,
    Moine,
    Occultiste,
    Paladin,
    Rodeur,
    Roublard,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 12] = [
        CharacterClass::Barbare,
        CharacterClass::Barde,
        CharacterClass::Clerc,
        CharacterClass::Druide,
        CharacterClass::Ensorceleur,
        CharacterClass::Guerrier,
        CharacterClass::Magicien,
        CharacterClass::Moine,
        CharacterClass::Occultiste,
        CharacterClass::Paladin,
        CharacterClass::Rodeur,
        CharacterClass::Roublard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Barbare => "Barbare",
            CharacterClass::Barde => "Barde",
            CharacterClass::Clerc => "Clerc",
            CharacterClass::Druide => "Druide",
            CharacterClass::Ensorceleur => "Ensorceleur",
            CharacterClass::Guerrier => "Guerrier",
            CharacterClass::Magicien => "Magicien",
            CharacterClass::Moine => "Moine",
            CharacterClass::Occultiste => "Occultiste",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Rodeur => "Rôdeur",
            CharacterClass::Roublard => "Roublard",
        }
    }

    /// Size of the class hit die.
    pub fn hit_die(&self) -> u8 {
        match self {
            CharacterClass::Barbare => 12,
            CharacterClass::Guerrier | CharacterClass::Paladin | CharacterClass::Rodeur => 10,
            CharacterClass::Barde
            | CharacterClass::Clerc
            | CharacterClass::Druide
            | CharacterClass::Moine
            | CharacterClass::Occultiste
            | CharacterClass::Roublard => 8,
            CharacterClass::Ensorceleur | CharacterClass::Magicien => 6,
        }
    }
}

/// Hit die for an optional class, falling back to a d8.
pub fn hit_die_for(class: Option<CharacterClass>) -> u8 {
    class.map_or(DEFAULT_HIT_DIE, |c| c.hit_die())
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_key(s).as_str() {
            "barbare" => Ok(CharacterClass::Barbare),
            "barde" => Ok(CharacterClass::Barde),
            "clerc" => Ok(CharacterClass::Clerc),
            "druide" => Ok(CharacterClass::Druide),
            "ensorceleur" => Ok(CharacterClass::Ensorceleur),
            "guerrier" => Ok(CharacterClass::Guerrier),
            "magicien" => Ok(CharacterClass::Magicien),
            "moine" => Ok(CharacterClass::Moine),
            "occultiste" => Ok(CharacterClass::Occultiste),
            "paladin" => Ok(CharacterClass::Paladin),
            "rodeur" => Ok(CharacterClass::Rodeur),
            "roublard" => Ok(CharacterClass::Roublard),
            _ => Err(DomainError::parse(format!("Unknown class: {}", s))),
        }
    }
}

impl TryFrom<String> for CharacterClass {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CharacterClass> for String {
    fn from(value: CharacterClass) -> Self {
        value.as_str().to_string()
    }
}
