//! Character aggregate - the progression-owning view of a player character
//!
//! # Design
//!
//! - **Private fields**: every field is reached through accessors
//! - **Valid by construction**: level is clamped, subclass is absent below
//!   the milestone, hit dice never report more spent than owned
//! - **Domain events**: mutations return outcome types from `events`
//!
//! Behaviour is split by concern: `ledger` (consume/recover/arcane
//! recovery), `level_up` (the level transition) and `rest`.

mod ledger;
mod level_up;
mod rest;

pub use level_up::LevelUpRequest;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::common::none_if_blank;
use crate::entities::{ClassResources, SpellSlots};
use crate::events::ProgressionChange;
use crate::game_systems::{
    bardic_inspiration_cap, reclamp_live_caps, resolve_class_resources, resolve_spell_knowledge,
    resolve_spell_slots, SpellKnowledge,
};
use crate::value_objects::{
    hit_die_for, resolve_modifier, Ability, CharacterClass, CharacterLevel, HitDice,
    SUBCLASS_MILESTONE_LEVEL,
};
use crate::CharacterId;

/// A character as far as progression is concerned.
///
/// # Invariants
///
/// - `subclass` is `None` while `level < 3`
/// - every slot and class pool keeps `used <= max` after any mutation
/// - `class_resources` is the variant matching `class` once resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    id: CharacterId,
    name: String,
    class: Option<CharacterClass>,
    /// Stored class name that matched no known class; kept for round-trips
    unrecognized_class: Option<String>,
    subclass: Option<String>,
    level: CharacterLevel,
    /// Loosely-shaped ability data, read through `resolve_modifier`
    abilities: Value,
    max_hp: i32,
    current_hp: i32,
    hit_dice: HitDice,
    spell_slots: SpellSlots,
    class_resources: ClassResources,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// A level 1 character with full hit points and resolved resources.
    ///
    /// Level 1 hit points are the class hit die plus the Constitution
    /// modifier, never below 1.
    pub fn new(name: impl Into<String>, class: Option<CharacterClass>, abilities: Value) -> Self {
        let con = resolve_modifier(&abilities, Ability::Constitution);
        let max_hp = i32::from(hit_die_for(class)).saturating_add(con).max(1);
        let mut character = Self {
            id: CharacterId::new(),
            name: name.into(),
            class,
            unrecognized_class: None,
            subclass: None,
            level: CharacterLevel::FIRST,
            abilities,
            max_hp,
            current_hp: max_hp,
            hit_dice: HitDice::new(CharacterLevel::FIRST),
            spell_slots: SpellSlots::new(),
            class_resources: ClassResources::default(),
        };
        character.resolve_progression();
        character
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn class(&self) -> Option<CharacterClass> {
        self.class
    }

    /// Raw class name of a stored record whose class is not one of the
    /// twelve. Such a character behaves as classless.
    #[inline]
    pub fn unrecognized_class(&self) -> Option<&str> {
        self.unrecognized_class.as_deref()
    }

    #[inline]
    pub fn subclass(&self) -> Option<&str> {
        self.subclass.as_deref()
    }

    #[inline]
    pub fn level(&self) -> CharacterLevel {
        self.level
    }

    #[inline]
    pub fn abilities(&self) -> &Value {
        &self.abilities
    }

    #[inline]
    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    #[inline]
    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    #[inline]
    pub fn hit_dice(&self) -> HitDice {
        self.hit_dice
    }

    #[inline]
    pub fn spell_slots(&self) -> &SpellSlots {
        &self.spell_slots
    }

    #[inline]
    pub fn class_resources(&self) -> &ClassResources {
        &self.class_resources
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Modifier for an ability; `0` when the data is missing or unreadable.
    pub fn modifier(&self, ability: Ability) -> i32 {
        resolve_modifier(&self.abilities, ability)
    }

    pub fn hit_die(&self) -> u8 {
        hit_die_for(self.class)
    }

    /// Live bardic inspiration maximum (0 for non-Barde classes).
    pub fn bardic_inspiration_cap(&self) -> u32 {
        match self.class_resources {
            ClassResources::Barde { .. } => {
                bardic_inspiration_cap(self.modifier(Ability::Charisma))
            }
            _ => 0,
        }
    }

    pub fn spell_knowledge(&self) -> SpellKnowledge {
        resolve_spell_knowledge(self.class, self.level)
    }

    // =========================================================================
    // Builder-style methods
    // =========================================================================

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    /// Set the level without resolving tables; pair with
    /// [`Character::resolve_progression`].
    pub fn with_level(mut self, level: CharacterLevel) -> Self {
        self.level = level;
        self.hit_dice.grow_to(level);
        if level.get() < SUBCLASS_MILESTONE_LEVEL {
            self.subclass = None;
        }
        self
    }

    /// Ignored below the milestone level.
    pub fn with_subclass(mut self, subclass: impl Into<String>) -> Self {
        if self.level.get() >= SUBCLASS_MILESTONE_LEVEL {
            self.subclass = Some(subclass.into());
        }
        self
    }

    /// Current hit points are capped to the maximum.
    pub fn with_hp(mut self, max_hp: i32, current_hp: i32) -> Self {
        self.max_hp = max_hp;
        self.current_hp = current_hp.min(max_hp);
        self
    }

    pub fn with_hit_dice(mut self, hit_dice: HitDice) -> Self {
        self.hit_dice = hit_dice;
        self
    }

    pub fn with_spell_slots(mut self, spell_slots: SpellSlots) -> Self {
        self.spell_slots = spell_slots;
        self
    }

    pub fn with_class_resources(mut self, class_resources: ClassResources) -> Self {
        self.class_resources = class_resources;
        self
    }

    // =========================================================================
    // Progression refresh
    // =========================================================================

    /// Full recomputation of slot maxima and class resources for the current
    /// class and level (class resources use reset semantics).
    ///
    /// Returns `true` when anything changed.
    pub fn resolve_progression(&mut self) -> bool {
        let spell_slots = resolve_spell_slots(self.class, self.level, &self.spell_slots);
        let class_resources = resolve_class_resources(
            self.class,
            self.level,
            &self.class_resources,
            self.modifier(Ability::Charisma),
        );
        let changed =
            spell_slots != self.spell_slots || class_resources != self.class_resources;
        self.spell_slots = spell_slots;
        self.class_resources = class_resources;
        changed
    }

    /// Replace ability data and re-clamp whatever depends on it live.
    ///
    /// Returns `true` when a stored counter had to move.
    pub fn set_abilities(&mut self, abilities: Value) -> bool {
        self.abilities = abilities;
        self.sync_live_caps()
    }

    /// Re-clamp counters whose cap derives from live ability scores.
    /// Leaves the record untouched when it already fits.
    pub fn sync_live_caps(&mut self) -> bool {
        match reclamp_live_caps(&self.class_resources, self.modifier(Ability::Charisma)) {
            Some(clamped) => {
                self.class_resources = clamped;
                true
            }
            None => false,
        }
    }

    /// Switch class and resolve the new class's tables.
    ///
    /// The old class's subclass no longer applies and is dropped.
    pub fn change_class(&mut self, class: Option<CharacterClass>) -> ProgressionChange {
        if class == self.class {
            return ProgressionChange::Unchanged;
        }
        let from = self.class;
        self.class = class;
        self.unrecognized_class = None;
        // A new class starts from its own record, not the previous one's.
        self.class_resources = ClassResources::default();
        let subclass_cleared = self.subclass.take();
        self.resolve_progression();
        ProgressionChange::ClassChanged {
            from,
            to: class,
            subclass_cleared,
        }
    }

    /// Set the level directly (clamped to 1-20) and resolve tables.
    pub fn set_level(&mut self, level: i64) -> ProgressionChange {
        let to = CharacterLevel::clamped(level);
        if to == self.level {
            return ProgressionChange::Unchanged;
        }
        let from = self.level;
        self.level = to;
        self.hit_dice.grow_to(to);
        let subclass_cleared = if to.get() < SUBCLASS_MILESTONE_LEVEL {
            self.subclass.take()
        } else {
            None
        };
        self.resolve_progression();
        ProgressionChange::LevelSet {
            from,
            to,
            subclass_cleared,
        }
    }
}

// ============================================================================
// Serde
// ============================================================================

/// Stored shape: snake_case keys, open records for slots and resources.
#[derive(Serialize, Deserialize)]
struct CharacterWireFormat {
    id: CharacterId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    subclass: Option<String>,
    #[serde(default)]
    level: CharacterLevel,
    #[serde(default)]
    abilities: Value,
    #[serde(default)]
    max_hp: i32,
    #[serde(default)]
    current_hp: Option<i32>,
    #[serde(default)]
    hit_dice: Option<HitDice>,
    #[serde(default)]
    spell_slots: SpellSlots,
    #[serde(default)]
    class_resources: Map<String, Value>,
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            name: self.name.clone(),
            class: self
                .class
                .map(|c| c.as_str().to_string())
                .or_else(|| self.unrecognized_class.clone()),
            subclass: self.subclass.clone(),
            level: self.level,
            abilities: self.abilities.clone(),
            max_hp: self.max_hp,
            current_hp: Some(self.current_hp),
            hit_dice: Some(self.hit_dice),
            spell_slots: self.spell_slots.clone(),
            class_resources: self.class_resources.to_record(),
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CharacterWireFormat::deserialize(deserializer)?;

        let raw_class = wire.class.as_deref().and_then(none_if_blank);
        let class = raw_class.and_then(|raw| raw.parse::<CharacterClass>().ok());
        let unrecognized_class = raw_class
            .filter(|_| class.is_none())
            .map(str::to_string);
        let subclass = wire
            .subclass
            .as_deref()
            .and_then(none_if_blank)
            .filter(|_| wire.level.get() >= SUBCLASS_MILESTONE_LEVEL)
            .map(str::to_string);
        let hit_dice = wire
            .hit_dice
            .map(|dice| HitDice::with_used(dice.total(), dice.used()))
            .unwrap_or_else(|| HitDice::new(wire.level));

        Ok(Character {
            id: wire.id,
            name: wire.name,
            class,
            unrecognized_class,
            subclass,
            level: wire.level,
            abilities: wire.abilities,
            max_hp: wire.max_hp,
            current_hp: wire.current_hp.unwrap_or(wire.max_hp),
            hit_dice,
            spell_slots: wire.spell_slots,
            class_resources: ClassResources::from_record(class, wire.class_resources),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
