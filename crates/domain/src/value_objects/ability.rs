//! Ability names and the lenient modifier resolver.
//!
//! Ability data reaches the engine in whatever shape the sheet editor saved
//! it in. The resolver accepts the known shapes and falls back to a modifier
//! of `0` instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::common::{fold_key, parse_lenient_int};
use crate::error::DomainError;

/// Keys that may carry an ability's name inside an array entry.
const NAME_KEYS: [&str; 4] = ["name", "abbr", "key", "code"];

/// Keys that carry a ready-made modifier, in lookup order.
const MODIFIER_KEYS: [&str; 4] = ["modifier", "mod", "modValue", "value"];

/// Keys that carry a raw score, in lookup order.
const SCORE_KEYS: [&str; 3] = ["score", "total", "base"];

/// The six abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Canonical French name as shown on the sheet.
    pub fn french_name(&self) -> &'static str {
        match self {
            Ability::Strength => "Force",
            Ability::Dexterity => "Dextérité",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Sagesse",
            Ability::Charisma => "Charisme",
        }
    }

    /// Three-letter abbreviation used as a map key by the sheet editor.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "for",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "sag",
            Ability::Charisma => "cha",
        }
    }

    /// Recognises any French or English spelling or abbreviation.
    pub fn from_alias(alias: &str) -> Option<Self> {
        match fold_key(alias).as_str() {
            "force" | "for" | "strength" | "str" => Some(Ability::Strength),
            "dexterite" | "dex" | "dexterity" => Some(Ability::Dexterity),
            "constitution" | "con" => Some(Ability::Constitution),
            "intelligence" | "int" => Some(Ability::Intelligence),
            "sagesse" | "sag" | "wisdom" | "wis" => Some(Ability::Wisdom),
            "charisme" | "cha" | "charisma" => Some(Ability::Charisma),
            _ => None,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.french_name())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ability::from_alias(s).ok_or_else(|| DomainError::parse(format!("Unknown ability: {}", s)))
    }
}

/// Resolved modifiers never leave `-MODIFIER_BOUND..=MODIFIER_BOUND`.
pub const MODIFIER_BOUND: i32 = 50;

/// Standard modifier for an ability score: `floor((score - 10) / 2)`.
pub fn score_to_modifier(score: i32) -> i32 {
    score.saturating_sub(10).div_euclid(2)
}

/// Resolves the modifier of `ability` from loosely shaped sheet data.
///
/// Shapes are tried in order:
/// 1. an array of objects naming the ability under `name`/`abbr`/`key`/`code`;
/// 2. a map keyed by ability name or lowercase abbreviation, whose value is a
///    bare score or an object.
///
/// Within a matched entry a direct modifier (`modifier`/`mod`/`modValue`/
/// `value`) wins over a score (`score`/`total`/`base`). Anything unreadable
/// resolves to `0`, and out-of-range values are clamped to [`MODIFIER_BOUND`].
pub fn resolve_modifier(abilities: &Value, ability: Ability) -> i32 {
    let modifier = match abilities {
        Value::Array(entries) => entries
            .iter()
            .filter_map(Value::as_object)
            .find(|entry| entry_names(entry, ability))
            .and_then(modifier_from_entry)
            .unwrap_or(0),
        Value::Object(map) => map
            .iter()
            .find(|(key, _)| Ability::from_alias(key) == Some(ability))
            .and_then(|(_, value)| match value {
                Value::Object(entry) => modifier_from_entry(entry),
                bare => number_of(bare).map(score_to_modifier),
            })
            .unwrap_or(0),
        _ => 0,
    };
    modifier.clamp(-MODIFIER_BOUND, MODIFIER_BOUND)
}

fn entry_names(entry: &Map<String, Value>, ability: Ability) -> bool {
    NAME_KEYS
        .iter()
        .filter_map(|key| entry.get(*key).and_then(Value::as_str))
        .any(|name| Ability::from_alias(name) == Some(ability))
}

fn modifier_from_entry(entry: &Map<String, Value>) -> Option<i32> {
    let direct = MODIFIER_KEYS
        .iter()
        .filter_map(|key| entry.get(*key))
        .find_map(number_of);
    if direct.is_some() {
        return direct;
    }
    SCORE_KEYS
        .iter()
        .filter_map(|key| entry.get(*key))
        .find_map(number_of)
        .map(score_to_modifier)
}

fn number_of(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64))
            .and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => parse_lenient_int(s),
        _ => None,
    }
}
