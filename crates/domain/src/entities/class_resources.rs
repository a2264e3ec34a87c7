//! Class-specific resource pools.
//!
//! Internally each class has its own strongly-typed variant. Storage still
//! expects the historical open record (`rage`, `used_rage`, `ki_points`, ...),
//! so this module also owns the translation to and from that record.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::pool::Pool;
use crate::common::fold_key;
use crate::error::DomainError;
use crate::value_objects::CharacterClass;

/// Identifier of a consumable class pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    Rage,
    BardicInspiration,
    ChannelDivinity,
    WildShape,
    SorceryPoints,
    ActionSurge,
    KiPoints,
    LayOnHands,
    FavoredFoe,
}

impl ResourceId {
    pub const ALL: [ResourceId; 9] = [
        ResourceId::Rage,
        ResourceId::BardicInspiration,
        ResourceId::ChannelDivinity,
        ResourceId::WildShape,
        ResourceId::SorceryPoints,
        ResourceId::ActionSurge,
        ResourceId::KiPoints,
        ResourceId::LayOnHands,
        ResourceId::FavoredFoe,
    ];

    /// Record key holding the maximum.
    pub fn key(&self) -> &'static str {
        match self {
            ResourceId::Rage => "rage",
            ResourceId::BardicInspiration => "bardic_inspiration",
            ResourceId::ChannelDivinity => "channel_divinity",
            ResourceId::WildShape => "wild_shape",
            ResourceId::SorceryPoints => "sorcery_points",
            ResourceId::ActionSurge => "action_surge",
            ResourceId::KiPoints => "ki_points",
            ResourceId::LayOnHands => "lay_on_hands",
            ResourceId::FavoredFoe => "favored_foe",
        }
    }

    /// Record key holding the expended counter.
    pub fn used_key(&self) -> String {
        format!("used_{}", self.key())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ResourceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_key(s).replace(['-', ' '], "_");
        ResourceId::ALL
            .into_iter()
            .find(|id| id.key() == folded)
            .ok_or_else(|| DomainError::parse(format!("Unknown class resource: {}", s)))
    }
}

/// Paladin channel divinity: absent until the milestone, then a pool.
///
/// `NotYetAvailable` is not the same as `Available` with a zero maximum: the
/// record omits the fields entirely and the sheet hides the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDivinity {
    NotYetAvailable,
    Available(Pool),
}

/// Magicien arcane recovery state for the current long-rest cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArcaneRecovery {
    used: bool,
    levels_recovered: u8,
}

impl ArcaneRecovery {
    pub fn new(used: bool, levels_recovered: u8) -> Self {
        Self {
            used,
            levels_recovered,
        }
    }

    /// Marked as fully used for this cycle.
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Spell levels already recovered this cycle.
    pub fn levels_recovered(&self) -> u8 {
        self.levels_recovered
    }
}

/// Sneak attack damage: `dice`d6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SneakAttack {
    dice: u8,
}

impl SneakAttack {
    pub fn new(dice: u8) -> Self {
        Self { dice }
    }

    pub fn dice(&self) -> u8 {
        self.dice
    }

    fn parse(expression: &str) -> Option<Self> {
        let (count, die) = expression.trim().split_once(['d', 'D'])?;
        if die.trim() != "6" {
            return None;
        }
        count.trim().parse().ok().map(Self::new)
    }
}

impl fmt::Display for SneakAttack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d6", self.dice)
    }
}

/// The class resources of one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassResources {
    /// Class has no resource policy (or nothing resolved yet): the stored
    /// record is carried as-is.
    Untracked(Map<String, Value>),
    Barbare {
        rage: Pool,
    },
    /// No stored maximum: the cap is derived from the live Charisma modifier.
    Barde {
        used_bardic_inspiration: u32,
    },
    Clerc {
        channel_divinity: Pool,
    },
    Druide {
        wild_shape: Pool,
    },
    Ensorceleur {
        sorcery_points: Pool,
    },
    Guerrier {
        action_surge: Pool,
    },
    Magicien {
        arcane_recovery: ArcaneRecovery,
    },
    Moine {
        ki_points: Pool,
    },
    Paladin {
        lay_on_hands: Pool,
        channel_divinity: ChannelDivinity,
    },
    Rodeur {
        favored_foe: Pool,
    },
    Roublard {
        sneak_attack: SneakAttack,
    },
}

impl Default for ClassResources {
    fn default() -> Self {
        ClassResources::Untracked(Map::new())
    }
}

impl ClassResources {
    /// The pool behind `id`, if this character tracks it.
    ///
    /// `bardic_cap` is the live bardic inspiration maximum; only the Barde
    /// variant reads it.
    pub fn pool(&self, id: ResourceId, bardic_cap: u32) -> Option<Pool> {
        match (self, id) {
            (ClassResources::Barbare { rage }, ResourceId::Rage) => Some(*rage),
            (
                ClassResources::Barde {
                    used_bardic_inspiration,
                },
                ResourceId::BardicInspiration,
            ) => Some(Pool::with_used(bardic_cap, *used_bardic_inspiration)),
            (ClassResources::Clerc { channel_divinity }, ResourceId::ChannelDivinity) => {
                Some(*channel_divinity)
            }
            (ClassResources::Druide { wild_shape }, ResourceId::WildShape) => Some(*wild_shape),
            (ClassResources::Ensorceleur { sorcery_points }, ResourceId::SorceryPoints) => {
                Some(*sorcery_points)
            }
            (ClassResources::Guerrier { action_surge }, ResourceId::ActionSurge) => {
                Some(*action_surge)
            }
            (ClassResources::Moine { ki_points }, ResourceId::KiPoints) => Some(*ki_points),
            (ClassResources::Paladin { lay_on_hands, .. }, ResourceId::LayOnHands) => {
                Some(*lay_on_hands)
            }
            (
                ClassResources::Paladin {
                    channel_divinity: ChannelDivinity::Available(pool),
                    ..
                },
                ResourceId::ChannelDivinity,
            ) => Some(*pool),
            (ClassResources::Rodeur { favored_foe }, ResourceId::FavoredFoe) => {
                Some(*favored_foe)
            }
            _ => None,
        }
    }

    /// Replace the pool behind `id`. Untracked ids leave `self` unchanged.
    pub fn with_pool(&self, id: ResourceId, pool: Pool) -> Self {
        let mut next = self.clone();
        match (&mut next, id) {
            (ClassResources::Barbare { rage }, ResourceId::Rage) => *rage = pool,
            (
                ClassResources::Barde {
                    used_bardic_inspiration,
                },
                ResourceId::BardicInspiration,
            ) => *used_bardic_inspiration = pool.used(),
            (ClassResources::Clerc { channel_divinity }, ResourceId::ChannelDivinity) => {
                *channel_divinity = pool
            }
            (ClassResources::Druide { wild_shape }, ResourceId::WildShape) => *wild_shape = pool,
            (ClassResources::Ensorceleur { sorcery_points }, ResourceId::SorceryPoints) => {
                *sorcery_points = pool
            }
            (ClassResources::Guerrier { action_surge }, ResourceId::ActionSurge) => {
                *action_surge = pool
            }
            (ClassResources::Moine { ki_points }, ResourceId::KiPoints) => *ki_points = pool,
            (ClassResources::Paladin { lay_on_hands, .. }, ResourceId::LayOnHands) => {
                *lay_on_hands = pool
            }
            (
                ClassResources::Paladin {
                    channel_divinity: divinity @ ChannelDivinity::Available(_),
                    ..
                },
                ResourceId::ChannelDivinity,
            ) => *divinity = ChannelDivinity::Available(pool),
            (ClassResources::Rodeur { favored_foe }, ResourceId::FavoredFoe) => {
                *favored_foe = pool
            }
            _ => {}
        }
        next
    }

    pub fn arcane_recovery(&self) -> Option<ArcaneRecovery> {
        match self {
            ClassResources::Magicien { arcane_recovery } => Some(*arcane_recovery),
            _ => None,
        }
    }

    pub fn sneak_attack(&self) -> Option<SneakAttack> {
        match self {
            ClassResources::Roublard { sneak_attack } => Some(*sneak_attack),
            _ => None,
        }
    }

    /// Ids of the consumable pools this variant tracks.
    pub fn tracked(&self) -> Vec<ResourceId> {
        ResourceId::ALL
            .into_iter()
            .filter(|id| self.pool(*id, 0).is_some())
            .collect()
    }

    // ========================================================================
    // Open record translation
    // ========================================================================

    /// Rebuild the typed variant for `class` from a stored record.
    ///
    /// A record missing the class's primary maximum has not been resolved
    /// yet and is carried as `Untracked` until the next refresh.
    pub fn from_record(class: Option<CharacterClass>, record: Map<String, Value>) -> Self {
        let pool = |id: ResourceId| -> Option<Pool> {
            let max = record.get(id.key()).and_then(record_u32)?;
            let used = record.get(&id.used_key()).and_then(record_u32).unwrap_or(0);
            Some(Pool::with_used(max, used))
        };

        let typed = match class {
            Some(CharacterClass::Barbare) => {
                pool(ResourceId::Rage).map(|rage| ClassResources::Barbare { rage })
            }
            Some(CharacterClass::Barde) => Some(ClassResources::Barde {
                used_bardic_inspiration: record
                    .get(&ResourceId::BardicInspiration.used_key())
                    .and_then(record_u32)
                    .unwrap_or(0),
            }),
            Some(CharacterClass::Clerc) => pool(ResourceId::ChannelDivinity)
                .map(|channel_divinity| ClassResources::Clerc { channel_divinity }),
            Some(CharacterClass::Druide) => {
                pool(ResourceId::WildShape).map(|wild_shape| ClassResources::Druide { wild_shape })
            }
            Some(CharacterClass::Ensorceleur) => pool(ResourceId::SorceryPoints)
                .map(|sorcery_points| ClassResources::Ensorceleur { sorcery_points }),
            Some(CharacterClass::Guerrier) => pool(ResourceId::ActionSurge)
                .map(|action_surge| ClassResources::Guerrier { action_surge }),
            Some(CharacterClass::Magicien) => record
                .get(ARCANE_RECOVERY_KEY)
                .and_then(Value::as_bool)
                .filter(|available| *available)
                .map(|_| ClassResources::Magicien {
                    arcane_recovery: ArcaneRecovery::new(
                        record
                            .get(USED_ARCANE_RECOVERY_KEY)
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                        record
                            .get(ARCANE_RECOVERY_SLOTS_USED_KEY)
                            .and_then(record_u32)
                            .and_then(|v| u8::try_from(v).ok())
                            .unwrap_or(0),
                    ),
                }),
            Some(CharacterClass::Moine) => {
                pool(ResourceId::KiPoints).map(|ki_points| ClassResources::Moine { ki_points })
            }
            Some(CharacterClass::Paladin) => {
                pool(ResourceId::LayOnHands).map(|lay_on_hands| ClassResources::Paladin {
                    lay_on_hands,
                    channel_divinity: pool(ResourceId::ChannelDivinity)
                        .map_or(ChannelDivinity::NotYetAvailable, ChannelDivinity::Available),
                })
            }
            Some(CharacterClass::Rodeur) => pool(ResourceId::FavoredFoe)
                .map(|favored_foe| ClassResources::Rodeur { favored_foe }),
            Some(CharacterClass::Roublard) => record
                .get(SNEAK_ATTACK_KEY)
                .and_then(Value::as_str)
                .and_then(SneakAttack::parse)
                .map(|sneak_attack| ClassResources::Roublard { sneak_attack }),
            Some(CharacterClass::Occultiste) | None => None,
        };

        typed.unwrap_or(ClassResources::Untracked(record))
    }

    /// Flatten into the stored open record.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        let mut put_pool = |id: ResourceId, pool: &Pool| {
            record.insert(id.key().to_string(), Value::from(pool.max()));
            record.insert(id.used_key(), Value::from(pool.used()));
        };
        match self {
            ClassResources::Untracked(raw) => return raw.clone(),
            ClassResources::Barbare { rage } => put_pool(ResourceId::Rage, rage),
            ClassResources::Barde {
                used_bardic_inspiration,
            } => {
                record.insert(
                    ResourceId::BardicInspiration.used_key(),
                    Value::from(*used_bardic_inspiration),
                );
            }
            ClassResources::Clerc { channel_divinity } => {
                put_pool(ResourceId::ChannelDivinity, channel_divinity)
            }
            ClassResources::Druide { wild_shape } => put_pool(ResourceId::WildShape, wild_shape),
            ClassResources::Ensorceleur { sorcery_points } => {
                put_pool(ResourceId::SorceryPoints, sorcery_points)
            }
            ClassResources::Guerrier { action_surge } => {
                put_pool(ResourceId::ActionSurge, action_surge)
            }
            ClassResources::Magicien { arcane_recovery } => {
                record.insert(ARCANE_RECOVERY_KEY.to_string(), Value::Bool(true));
                record.insert(
                    USED_ARCANE_RECOVERY_KEY.to_string(),
                    Value::Bool(arcane_recovery.is_used()),
                );
                record.insert(
                    ARCANE_RECOVERY_SLOTS_USED_KEY.to_string(),
                    Value::from(arcane_recovery.levels_recovered()),
                );
            }
            ClassResources::Moine { ki_points } => put_pool(ResourceId::KiPoints, ki_points),
            ClassResources::Paladin {
                lay_on_hands,
                channel_divinity,
            } => {
                put_pool(ResourceId::LayOnHands, lay_on_hands);
                if let ChannelDivinity::Available(divinity) = channel_divinity {
                    put_pool(ResourceId::ChannelDivinity, divinity);
                }
            }
            ClassResources::Rodeur { favored_foe } => put_pool(ResourceId::FavoredFoe, favored_foe),
            ClassResources::Roublard { sneak_attack } => {
                record.insert(
                    SNEAK_ATTACK_KEY.to_string(),
                    Value::String(sneak_attack.to_string()),
                );
            }
        }
        record
    }
}

pub(crate) const ARCANE_RECOVERY_KEY: &str = "arcane_recovery";
pub(crate) const USED_ARCANE_RECOVERY_KEY: &str = "used_arcane_recovery";
pub(crate) const ARCANE_RECOVERY_SLOTS_USED_KEY: &str = "arcane_recovery_slots_used";
pub(crate) const SNEAK_ATTACK_KEY: &str = "sneak_attack";

fn record_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn resource_ids_parse_from_keys_and_labels() {
        assert_eq!("rage".parse::<ResourceId>(), Ok(ResourceId::Rage));
        assert_eq!("Ki Points".parse::<ResourceId>(), Ok(ResourceId::KiPoints));
        assert_eq!("lay-on-hands".parse::<ResourceId>(), Ok(ResourceId::LayOnHands));
        assert!("mana".parse::<ResourceId>().is_err());
        assert_eq!(ResourceId::FavoredFoe.used_key(), "used_favored_foe");
    }

    mod from_record {
        use super::*;

        #[test]
        fn barbarian_record_becomes_typed_pool() {
            let resources = ClassResources::from_record(
                Some(CharacterClass::Barbare),
                record(json!({ "rage": 3, "used_rage": 1 })),
            );
            assert_eq!(
                resources,
                ClassResources::Barbare {
                    rage: Pool::with_used(3, 1)
                }
            );
        }

        #[test]
        fn unresolved_record_stays_untracked() {
            let raw = record(json!({ "inspiration": true }));
            let resources = ClassResources::from_record(Some(CharacterClass::Moine), raw.clone());
            assert_eq!(resources, ClassResources::Untracked(raw));
        }

        #[test]
        fn paladin_without_divinity_fields_is_not_yet_available() {
            let resources = ClassResources::from_record(
                Some(CharacterClass::Paladin),
                record(json!({ "lay_on_hands": 10, "used_lay_on_hands": 4 })),
            );
            assert_eq!(
                resources,
                ClassResources::Paladin {
                    lay_on_hands: Pool::with_used(10, 4),
                    channel_divinity: ChannelDivinity::NotYetAvailable,
                }
            );
        }

        #[test]
        fn wizard_record_reads_recovery_state() {
            let resources = ClassResources::from_record(
                Some(CharacterClass::Magicien),
                record(json!({
                    "arcane_recovery": true,
                    "used_arcane_recovery": false,
                    "arcane_recovery_slots_used": 2,
                })),
            );
            assert_eq!(
                resources.arcane_recovery(),
                Some(ArcaneRecovery::new(false, 2))
            );
        }

        #[test]
        fn rogue_record_parses_dice_expression() {
            let resources = ClassResources::from_record(
                Some(CharacterClass::Roublard),
                record(json!({ "sneak_attack": "4d6" })),
            );
            assert_eq!(resources.sneak_attack(), Some(SneakAttack::new(4)));
        }
    }

    mod to_record {
        use super::*;

        #[test]
        fn paladin_below_milestone_omits_divinity_keys() {
            let resources = ClassResources::Paladin {
                lay_on_hands: Pool::new(10),
                channel_divinity: ChannelDivinity::NotYetAvailable,
            };
            let out = resources.to_record();
            assert!(out.contains_key("lay_on_hands"));
            assert!(!out.contains_key("channel_divinity"));
            assert!(!out.contains_key("used_channel_divinity"));
        }

        #[test]
        fn bard_stores_only_the_used_counter() {
            let out = ClassResources::Barde {
                used_bardic_inspiration: 2,
            }
            .to_record();
            assert_eq!(Value::Object(out), json!({ "used_bardic_inspiration": 2 }));
        }

        #[test]
        fn untracked_record_is_written_back_verbatim() {
            let raw = record(json!({ "custom": "kept", "n": 3 }));
            assert_eq!(ClassResources::Untracked(raw.clone()).to_record(), raw);
        }

        #[test]
        fn rogue_writes_dice_string() {
            let out = ClassResources::Roublard {
                sneak_attack: SneakAttack::new(3),
            }
            .to_record();
            assert_eq!(out.get("sneak_attack"), Some(&json!("3d6")));
        }
    }

    #[test]
    fn pool_lookup_respects_variant() {
        let resources = ClassResources::Paladin {
            lay_on_hands: Pool::new(15),
            channel_divinity: ChannelDivinity::NotYetAvailable,
        };
        assert_eq!(resources.pool(ResourceId::LayOnHands, 0), Some(Pool::new(15)));
        assert_eq!(resources.pool(ResourceId::ChannelDivinity, 0), None);
        assert_eq!(resources.pool(ResourceId::Rage, 0), None);
        assert_eq!(resources.tracked(), vec![ResourceId::LayOnHands]);
    }

    #[test]
    fn bard_pool_uses_live_cap() {
        let resources = ClassResources::Barde {
            used_bardic_inspiration: 1,
        };
        assert_eq!(
            resources.pool(ResourceId::BardicInspiration, 3),
            Some(Pool::with_used(3, 1))
        );
        let spent = resources.with_pool(ResourceId::BardicInspiration, Pool::with_used(3, 2));
        assert_eq!(
            spent,
            ClassResources::Barde {
                used_bardic_inspiration: 2
            }
        );
    }
}
