//! Class resource policy: pool maxima per class and level, plus what each
//! kind of rest gives back.

use super::traits::RestType;
use crate::entities::{ArcaneRecovery, ChannelDivinity, ClassResources, Pool, SneakAttack};
use crate::value_objects::{CharacterClass, CharacterLevel, SUBCLASS_MILESTONE_LEVEL};

/// Level from which a Barde regains inspiration on a short rest.
const BARDIC_SHORT_REST_LEVEL: u8 = 5;

/// Live bardic inspiration maximum. Never stored.
pub fn bardic_inspiration_cap(charisma_modifier: i32) -> u32 {
    charisma_modifier.max(0) as u32
}

/// Arcane recovery budget, in spell levels, for one long-rest cycle.
pub fn arcane_recovery_budget(level: CharacterLevel) -> u8 {
    level.get().div_ceil(2).max(1)
}

pub fn rage_uses(level: CharacterLevel) -> u32 {
    ((level.get() as u32 + 3) / 4 + 2).min(6)
}

pub fn favored_foe_uses(level: CharacterLevel) -> u32 {
    ((level.get() as u32 + 3) / 4).max(1)
}

pub fn sneak_attack_dice(level: CharacterLevel) -> u8 {
    level.get().div_ceil(2)
}

/// Paladin channel divinity maximum, or `None` below the milestone.
pub fn paladin_channel_divinity(level: CharacterLevel) -> Option<u32> {
    match level.get() {
        l if l < SUBCLASS_MILESTONE_LEVEL => None,
        l if l >= 11 => Some(3),
        _ => Some(2),
    }
}

/// Full recomputation of a character's class resources.
///
/// Pools are rebuilt with nothing used, except the Barde counter (clamped to
/// the live cap) and an already-available Paladin channel divinity (clamped
/// to its new maximum). Classes without a policy keep `existing` unchanged.
pub fn resolve_class_resources(
    class: Option<CharacterClass>,
    level: CharacterLevel,
    existing: &ClassResources,
    charisma_modifier: i32,
) -> ClassResources {
    let n = level.get() as u32;
    match class {
        Some(CharacterClass::Barbare) => ClassResources::Barbare {
            rage: Pool::new(rage_uses(level)),
        },
        Some(CharacterClass::Barde) => {
            let used = match existing {
                ClassResources::Barde {
                    used_bardic_inspiration,
                } => *used_bardic_inspiration,
                _ => 0,
            };
            ClassResources::Barde {
                used_bardic_inspiration: used.min(bardic_inspiration_cap(charisma_modifier)),
            }
        }
        Some(CharacterClass::Clerc) => ClassResources::Clerc {
            channel_divinity: Pool::new(if n >= 6 { 2 } else { 1 }),
        },
        Some(CharacterClass::Druide) => ClassResources::Druide {
            wild_shape: Pool::new(2),
        },
        Some(CharacterClass::Ensorceleur) => ClassResources::Ensorceleur {
            sorcery_points: Pool::new(n),
        },
        Some(CharacterClass::Guerrier) => ClassResources::Guerrier {
            action_surge: Pool::new(if n >= 17 { 2 } else { 1 }),
        },
        Some(CharacterClass::Magicien) => ClassResources::Magicien {
            arcane_recovery: ArcaneRecovery::default(),
        },
        Some(CharacterClass::Moine) => ClassResources::Moine {
            ki_points: Pool::new(n),
        },
        Some(CharacterClass::Paladin) => {
            let previous = match existing {
                ClassResources::Paladin {
                    channel_divinity: ChannelDivinity::Available(pool),
                    ..
                } => Some(*pool),
                _ => None,
            };
            let channel_divinity = match paladin_channel_divinity(level) {
                None => ChannelDivinity::NotYetAvailable,
                Some(max) => ChannelDivinity::Available(
                    previous.map_or_else(|| Pool::new(max), |pool| pool.resized(max)),
                ),
            };
            ClassResources::Paladin {
                lay_on_hands: Pool::new(n * 5),
                channel_divinity,
            }
        }
        Some(CharacterClass::Rodeur) => ClassResources::Rodeur {
            favored_foe: Pool::new(favored_foe_uses(level)),
        },
        Some(CharacterClass::Roublard) => ClassResources::Roublard {
            sneak_attack: SneakAttack::new(sneak_attack_dice(level)),
        },
        Some(CharacterClass::Occultiste) | None => existing.clone(),
    }
}

/// Re-clamp only what depends on live ability scores.
///
/// Returns `None` when nothing would change, so callers can skip the write.
pub fn reclamp_live_caps(
    resources: &ClassResources,
    charisma_modifier: i32,
) -> Option<ClassResources> {
    match resources {
        ClassResources::Barde {
            used_bardic_inspiration,
        } => {
            let clamped = (*used_bardic_inspiration).min(bardic_inspiration_cap(charisma_modifier));
            (clamped != *used_bardic_inspiration).then_some(ClassResources::Barde {
                used_bardic_inspiration: clamped,
            })
        }
        _ => None,
    }
}

/// Resources after a rest. Maxima are untouched.
pub fn restore_class_resources(
    resources: &ClassResources,
    rest: RestType,
    level: CharacterLevel,
) -> ClassResources {
    let long = rest == RestType::Long;
    match resources {
        ClassResources::Untracked(_) | ClassResources::Roublard { .. } => resources.clone(),
        ClassResources::Barbare { rage } if long => ClassResources::Barbare {
            rage: rage.reset(),
        },
        ClassResources::Barde { .. } if long || level.get() >= BARDIC_SHORT_REST_LEVEL => {
            ClassResources::Barde {
                used_bardic_inspiration: 0,
            }
        }
        ClassResources::Clerc { channel_divinity } => ClassResources::Clerc {
            channel_divinity: channel_divinity.reset(),
        },
        ClassResources::Druide { wild_shape } => ClassResources::Druide {
            wild_shape: wild_shape.reset(),
        },
        ClassResources::Ensorceleur { sorcery_points } if long => ClassResources::Ensorceleur {
            sorcery_points: sorcery_points.reset(),
        },
        ClassResources::Guerrier { action_surge } => ClassResources::Guerrier {
            action_surge: action_surge.reset(),
        },
        ClassResources::Magicien { .. } if long => ClassResources::Magicien {
            arcane_recovery: ArcaneRecovery::default(),
        },
        ClassResources::Moine { ki_points } => ClassResources::Moine {
            ki_points: ki_points.reset(),
        },
        ClassResources::Paladin {
            lay_on_hands,
            channel_divinity,
        } => ClassResources::Paladin {
            lay_on_hands: if long {
                lay_on_hands.reset()
            } else {
                *lay_on_hands
            },
            channel_divinity: match channel_divinity {
                ChannelDivinity::Available(pool) => ChannelDivinity::Available(pool.reset()),
                ChannelDivinity::NotYetAvailable => ChannelDivinity::NotYetAvailable,
            },
        },
        ClassResources::Rodeur { favored_foe } if long => ClassResources::Rodeur {
            favored_foe: favored_foe.reset(),
        },
        _ => resources.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ResourceId;
    use serde_json::{json, Map, Value};

    fn level(n: i64) -> CharacterLevel {
        CharacterLevel::clamped(n)
    }

    fn resolve(class: CharacterClass, n: i64) -> ClassResources {
        resolve_class_resources(Some(class), level(n), &ClassResources::default(), 0)
    }

    mod formulas {
        use super::*;

        #[test]
        fn rage_scales_and_caps_at_six() {
            assert_eq!(rage_uses(level(1)), 3);
            assert_eq!(rage_uses(level(5)), 4);
            assert_eq!(rage_uses(level(9)), 5);
            assert_eq!(rage_uses(level(13)), 6);
            assert_eq!(rage_uses(level(20)), 6);
        }

        #[test]
        fn favored_foe_is_at_least_one() {
            assert_eq!(favored_foe_uses(level(1)), 1);
            assert_eq!(favored_foe_uses(level(5)), 2);
            assert_eq!(favored_foe_uses(level(20)), 5);
        }

        #[test]
        fn sneak_attack_rounds_up() {
            assert_eq!(sneak_attack_dice(level(1)), 1);
            assert_eq!(sneak_attack_dice(level(4)), 2);
            assert_eq!(sneak_attack_dice(level(5)), 3);
            let record = resolve(CharacterClass::Roublard, 7).to_record();
            assert_eq!(record.get("sneak_attack"), Some(&json!("4d6")));
        }

        #[test]
        fn arcane_budget_is_half_level_rounded_up() {
            assert_eq!(arcane_recovery_budget(level(1)), 1);
            assert_eq!(arcane_recovery_budget(level(6)), 3);
            assert_eq!(arcane_recovery_budget(level(7)), 4);
        }

        #[test]
        fn level_scaled_pools() {
            assert_eq!(
                resolve(CharacterClass::Moine, 7).pool(ResourceId::KiPoints, 0),
                Some(Pool::new(7))
            );
            assert_eq!(
                resolve(CharacterClass::Ensorceleur, 4).pool(ResourceId::SorceryPoints, 0),
                Some(Pool::new(4))
            );
            assert_eq!(
                resolve(CharacterClass::Guerrier, 17).pool(ResourceId::ActionSurge, 0),
                Some(Pool::new(2))
            );
            assert_eq!(
                resolve(CharacterClass::Clerc, 6).pool(ResourceId::ChannelDivinity, 0),
                Some(Pool::new(2))
            );
        }
    }

    mod bard {
        use super::*;

        #[test]
        fn bardic_cap_tracks_charisma_live() {
            let existing = ClassResources::Barde {
                used_bardic_inspiration: 3,
            };
            let clamped = resolve_class_resources(
                Some(CharacterClass::Barde),
                level(4),
                &existing,
                2,
            );
            assert_eq!(
                clamped,
                ClassResources::Barde {
                    used_bardic_inspiration: 2
                }
            );

            let again =
                resolve_class_resources(Some(CharacterClass::Barde), level(4), &clamped, 3);
            assert_eq!(again, clamped);
        }

        #[test]
        fn negative_charisma_means_zero_cap() {
            assert_eq!(bardic_inspiration_cap(-1), 0);
            let existing = ClassResources::Barde {
                used_bardic_inspiration: 1,
            };
            assert_eq!(
                reclamp_live_caps(&existing, -2),
                Some(ClassResources::Barde {
                    used_bardic_inspiration: 0
                })
            );
        }

        #[test]
        fn reclamp_skips_unchanged_state() {
            let existing = ClassResources::Barde {
                used_bardic_inspiration: 2,
            };
            assert_eq!(reclamp_live_caps(&existing, 3), None);
            assert_eq!(reclamp_live_caps(&ClassResources::default(), 0), None);
        }
    }

    mod paladin {
        use super::*;

        #[test]
        fn channel_divinity_field_presence_by_level() {
            let two = resolve(CharacterClass::Paladin, 2).to_record();
            assert!(!two.contains_key("channel_divinity"));
            assert!(!two.contains_key("used_channel_divinity"));
            assert_eq!(two.get("lay_on_hands"), Some(&json!(10)));

            let three = resolve(CharacterClass::Paladin, 3).to_record();
            assert_eq!(three.get("channel_divinity"), Some(&json!(2)));
            assert_eq!(three.get("used_channel_divinity"), Some(&json!(0)));

            let eleven = resolve(CharacterClass::Paladin, 11).to_record();
            assert_eq!(eleven.get("channel_divinity"), Some(&json!(3)));
        }

        #[test]
        fn available_divinity_is_reclamped_not_reset() {
            let existing = ClassResources::Paladin {
                lay_on_hands: Pool::with_used(25, 10),
                channel_divinity: ChannelDivinity::Available(Pool::with_used(2, 1)),
            };
            let resolved =
                resolve_class_resources(Some(CharacterClass::Paladin), level(11), &existing, 0);
            assert_eq!(
                resolved,
                ClassResources::Paladin {
                    lay_on_hands: Pool::new(55),
                    channel_divinity: ChannelDivinity::Available(Pool::with_used(3, 1)),
                }
            );
        }

        #[test]
        fn dropping_below_milestone_removes_divinity() {
            let existing = ClassResources::Paladin {
                lay_on_hands: Pool::new(15),
                channel_divinity: ChannelDivinity::Available(Pool::with_used(2, 2)),
            };
            let resolved =
                resolve_class_resources(Some(CharacterClass::Paladin), level(2), &existing, 0);
            assert_eq!(resolved.pool(ResourceId::ChannelDivinity, 0), None);
        }
    }

    #[test]
    fn full_recompute_resets_used_counters() {
        let existing = ClassResources::Barbare {
            rage: Pool::with_used(3, 3),
        };
        let resolved =
            resolve_class_resources(Some(CharacterClass::Barbare), level(5), &existing, 0);
        assert_eq!(
            resolved,
            ClassResources::Barbare {
                rage: Pool::new(4)
            }
        );
    }

    #[test]
    fn wizard_gets_fresh_arcane_recovery() {
        let existing = ClassResources::Magicien {
            arcane_recovery: ArcaneRecovery::new(true, 3),
        };
        let resolved =
            resolve_class_resources(Some(CharacterClass::Magicien), level(6), &existing, 0);
        assert_eq!(resolved.arcane_recovery(), Some(ArcaneRecovery::default()));
        let record = resolved.to_record();
        assert_eq!(record.get("arcane_recovery"), Some(&json!(true)));
        assert_eq!(record.get("used_arcane_recovery"), Some(&json!(false)));
    }

    #[test]
    fn classes_without_policy_keep_their_record() {
        let mut raw = Map::new();
        raw.insert("pact_boon".to_string(), Value::from("tome"));
        let existing = ClassResources::Untracked(raw);
        assert_eq!(
            resolve_class_resources(Some(CharacterClass::Occultiste), level(5), &existing, 0),
            existing
        );
        assert_eq!(
            resolve_class_resources(None, level(5), &existing, 0),
            existing
        );
    }

    mod rests {
        use super::*;

        #[test]
        fn short_rest_restores_fighter_and_monk_only_short_pools() {
            let fighter = ClassResources::Guerrier {
                action_surge: Pool::with_used(1, 1),
            };
            assert_eq!(
                restore_class_resources(&fighter, RestType::Short, level(3)),
                ClassResources::Guerrier {
                    action_surge: Pool::new(1)
                }
            );

            let barbarian = ClassResources::Barbare {
                rage: Pool::with_used(3, 2),
            };
            assert_eq!(
                restore_class_resources(&barbarian, RestType::Short, level(3)),
                barbarian
            );
            assert_eq!(
                restore_class_resources(&barbarian, RestType::Long, level(3)),
                ClassResources::Barbare {
                    rage: Pool::new(3)
                }
            );
        }

        #[test]
        fn bard_short_rest_needs_level_five() {
            let bard = ClassResources::Barde {
                used_bardic_inspiration: 2,
            };
            assert_eq!(restore_class_resources(&bard, RestType::Short, level(4)), bard);
            assert_eq!(
                restore_class_resources(&bard, RestType::Short, level(5)),
                ClassResources::Barde {
                    used_bardic_inspiration: 0
                }
            );
        }

        #[test]
        fn paladin_short_rest_keeps_lay_on_hands_spent() {
            let paladin = ClassResources::Paladin {
                lay_on_hands: Pool::with_used(15, 5),
                channel_divinity: ChannelDivinity::Available(Pool::with_used(2, 2)),
            };
            assert_eq!(
                restore_class_resources(&paladin, RestType::Short, level(3)),
                ClassResources::Paladin {
                    lay_on_hands: Pool::with_used(15, 5),
                    channel_divinity: ChannelDivinity::Available(Pool::new(2)),
                }
            );
        }

        #[test]
        fn long_rest_clears_arcane_recovery() {
            let wizard = ClassResources::Magicien {
                arcane_recovery: ArcaneRecovery::new(true, 3),
            };
            assert_eq!(
                restore_class_resources(&wizard, RestType::Short, level(6)),
                wizard
            );
            assert_eq!(
                restore_class_resources(&wizard, RestType::Long, level(6)).arcane_recovery(),
                Some(ArcaneRecovery::default())
            );
        }
    }
}
