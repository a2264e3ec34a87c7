//! The `LevelN -> LevelN+1` transition.

use super::Character;
use crate::common::none_if_blank;
use crate::error::LevelUpError;
use crate::events::LevelUpOutcome;
use crate::game_systems::{
    find_subclass, resolve_class_resources, resolve_spell_slots, SubclassCatalog,
};
use crate::value_objects::{Ability, SUBCLASS_MILESTONE_LEVEL};

/// Player input for a level-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelUpRequest {
    pub hp_gain: i32,
    /// Only read when the new level is the subclass milestone.
    pub subclass: Option<String>,
}

impl LevelUpRequest {
    pub fn new(hp_gain: i32) -> Self {
        Self {
            hp_gain,
            subclass: None,
        }
    }

    pub fn with_subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclass = Some(subclass.into());
        self
    }
}

impl Character {
    /// Largest HP gain accepted on level-up: hit die plus Constitution.
    pub fn max_hp_gain(&self) -> i32 {
        i32::from(self.hit_die()).saturating_add(self.modifier(Ability::Constitution))
    }

    /// Whether leveling up now requires a subclass choice.
    pub fn needs_subclass_choice(&self, catalog: &dyn SubclassCatalog) -> bool {
        let Some(next) = self.level.next() else {
            return false;
        };
        next.get() == SUBCLASS_MILESTONE_LEVEL
            && self.subclass.is_none()
            && self
                .class
                .is_some_and(|class| !catalog.options(class).is_empty())
    }

    /// Advance one level.
    ///
    /// Every precondition is checked before anything is written: a rejected
    /// level-up leaves the character unchanged.
    pub fn level_up(
        &mut self,
        request: LevelUpRequest,
        catalog: &dyn SubclassCatalog,
    ) -> Result<LevelUpOutcome, LevelUpError> {
        let to = self.level.next().ok_or(LevelUpError::MaxLevelReached)?;

        if request.hp_gain < 1 {
            return Err(LevelUpError::HpGainTooLow);
        }
        let max = self.max_hp_gain();
        if request.hp_gain > max {
            return Err(LevelUpError::HpGainTooHigh { max });
        }

        let subclass_chosen = match self.class {
            Some(class) if self.needs_subclass_choice(catalog) => {
                let wanted = request
                    .subclass
                    .as_deref()
                    .and_then(none_if_blank)
                    .ok_or(LevelUpError::SubclassRequired(SUBCLASS_MILESTONE_LEVEL))?;
                let canonical = find_subclass(catalog, class, wanted)
                    .ok_or_else(|| LevelUpError::UnknownSubclass(wanted.to_string()))?;
                Some(canonical)
            }
            _ => None,
        };

        // All checks passed; compute the new state, then commit it at once.
        let spell_slots = resolve_spell_slots(self.class, to, &self.spell_slots);
        let class_resources = resolve_class_resources(
            self.class,
            to,
            &self.class_resources,
            self.modifier(Ability::Charisma),
        );
        let mut hit_dice = self.hit_dice;
        hit_dice.grow_to(to);

        let from = self.level;
        self.level = to;
        self.max_hp = self.max_hp.saturating_add(request.hp_gain);
        self.current_hp = self.current_hp.saturating_add(request.hp_gain);
        self.hit_dice = hit_dice;
        self.spell_slots = spell_slots;
        self.class_resources = class_resources;
        if let Some(subclass) = &subclass_chosen {
            self.subclass = Some(subclass.clone());
        }

        Ok(LevelUpOutcome {
            from,
            to,
            hp_gain: request.hp_gain,
            spell_knowledge: self.spell_knowledge(),
            subclass_chosen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{abilities, character};
    use super::*;
    use crate::entities::{Pool, ResourceId};
    use crate::game_systems::{BuiltinSubclasses, MockSubclassCatalog, SpellKnowledge};
    use crate::value_objects::{CharacterClass, CharacterLevel, HitDice, MODIFIER_BOUND};

    fn catalog() -> BuiltinSubclasses {
        BuiltinSubclasses::new()
    }

    mod hp_bounds {
        use super::*;

        #[test]
        fn barbarian_accepts_one_to_fourteen() {
            // Hit die 12, Constitution +2
            let barbarian = character(CharacterClass::Barbare, 4);
            assert_eq!(barbarian.max_hp_gain(), 14);

            for gain in [1, 7, 14] {
                let mut candidate = barbarian.clone();
                assert!(candidate
                    .level_up(LevelUpRequest::new(gain), &catalog())
                    .is_ok());
            }

            let mut low = barbarian.clone();
            assert_eq!(
                low.level_up(LevelUpRequest::new(0), &catalog()),
                Err(LevelUpError::HpGainTooLow)
            );
            assert_eq!(low, barbarian);

            let mut high = barbarian.clone();
            assert_eq!(
                high.level_up(LevelUpRequest::new(15), &catalog()),
                Err(LevelUpError::HpGainTooHigh { max: 14 })
            );
            assert_eq!(high, barbarian);
        }

        #[test]
        fn current_hp_grows_past_old_maximum() {
            let mut fighter = character(CharacterClass::Guerrier, 4).with_hp(40, 40);
            fighter
                .level_up(LevelUpRequest::new(8), &catalog())
                .expect("valid gain");
            assert_eq!(fighter.max_hp(), 48);
            assert_eq!(fighter.current_hp(), 48);
        }

        #[test]
        fn wounded_character_heals_by_the_gain() {
            let mut fighter = character(CharacterClass::Guerrier, 4).with_hp(40, 12);
            fighter
                .level_up(LevelUpRequest::new(6), &catalog())
                .expect("valid gain");
            assert_eq!(fighter.max_hp(), 46);
            assert_eq!(fighter.current_hp(), 18);
        }

        #[test]
        fn extreme_constitution_saturates_instead_of_overflowing() {
            let mut fighter = character(CharacterClass::Guerrier, 4).with_hp(i32::MAX - 5, 1);
            fighter.set_abilities(abilities(i32::MAX, 0));
            assert_eq!(fighter.max_hp_gain(), 10 + MODIFIER_BOUND);
            fighter
                .level_up(LevelUpRequest::new(60), &catalog())
                .expect("within the bound");
            assert_eq!(fighter.max_hp(), i32::MAX);
            assert_eq!(fighter.current_hp(), 61);
        }
    }

    mod subclass_gate {
        use super::*;

        #[test]
        fn milestone_requires_a_choice() {
            let mut cleric = character(CharacterClass::Clerc, 2);
            let before = cleric.clone();
            assert_eq!(
                cleric.level_up(LevelUpRequest::new(5), &catalog()),
                Err(LevelUpError::SubclassRequired(3))
            );
            assert_eq!(cleric, before);

            let outcome = cleric
                .level_up(
                    LevelUpRequest::new(5).with_subclass("domaine de la vie"),
                    &catalog(),
                )
                .expect("subclass supplied");
            assert_eq!(outcome.subclass_chosen.as_deref(), Some("Domaine de la Vie"));
            assert_eq!(cleric.subclass(), Some("Domaine de la Vie"));
        }

        #[test]
        fn unknown_subclass_is_rejected() {
            let mut cleric = character(CharacterClass::Clerc, 2);
            assert_eq!(
                cleric.level_up(
                    LevelUpRequest::new(5).with_subclass("Domaine du Pain"),
                    &catalog()
                ),
                Err(LevelUpError::UnknownSubclass("Domaine du Pain".to_string()))
            );
            assert_eq!(cleric.level().get(), 2);
        }

        #[test]
        fn blank_choice_counts_as_missing() {
            let mut rogue = character(CharacterClass::Roublard, 2);
            assert_eq!(
                rogue.level_up(LevelUpRequest::new(3).with_subclass("   "), &catalog()),
                Err(LevelUpError::SubclassRequired(3))
            );
        }

        #[test]
        fn empty_catalog_disables_the_gate() {
            let mut empty = MockSubclassCatalog::new();
            empty.expect_options().returning(|_| Vec::new());

            let mut druid = character(CharacterClass::Druide, 2);
            let outcome = druid
                .level_up(LevelUpRequest::new(4), &empty)
                .expect("no options, no gate");
            assert_eq!(outcome.subclass_chosen, None);
            assert_eq!(druid.subclass(), None);
        }

        #[test]
        fn existing_subclass_is_carried_forward() {
            let mut paladin =
                character(CharacterClass::Paladin, 5).with_subclass("Serment de vengeance");
            let outcome = paladin
                .level_up(
                    LevelUpRequest::new(3).with_subclass("Serment de gloire"),
                    &catalog(),
                )
                .expect("valid");
            assert_eq!(outcome.subclass_chosen, None);
            assert_eq!(paladin.subclass(), Some("Serment de vengeance"));
        }

        #[test]
        fn choice_outside_milestone_is_ignored() {
            let mut monk = character(CharacterClass::Moine, 1);
            monk.level_up(
                LevelUpRequest::new(3).with_subclass("Credo de l'Ombre"),
                &catalog(),
            )
            .expect("level 2");
            assert_eq!(monk.subclass(), None);
        }
    }

    mod recompute {
        use super::*;

        #[test]
        fn tables_follow_the_new_level() {
            let mut wizard = character(CharacterClass::Magicien, 4);
            wizard.consume_slot(1, 2).expect("slots");
            let outcome = wizard
                .level_up(LevelUpRequest::new(4), &catalog())
                .expect("valid");

            assert_eq!(outcome.to, CharacterLevel::clamped(5));
            assert_eq!(wizard.spell_slots().max(3), Some(2));
            assert_eq!(wizard.spell_slots().used(1), Some(2));
            assert!(matches!(
                outcome.spell_knowledge,
                SpellKnowledge::Prepared {
                    cantrips: Some(4),
                    prepared: 9,
                    ..
                }
            ));
        }

        #[test]
        fn class_pools_are_rebuilt_with_reset() {
            let mut monk = character(CharacterClass::Moine, 4);
            monk.consume_resource(ResourceId::KiPoints, 4).expect("ki");
            monk.level_up(LevelUpRequest::new(5), &catalog())
                .expect("valid");
            assert_eq!(
                monk.class_resources().pool(ResourceId::KiPoints, 0),
                Some(Pool::new(5))
            );
        }

        #[test]
        fn hit_dice_grow_and_keep_spent_count() {
            let mut rogue = character(CharacterClass::Roublard, 3)
                .with_subclass("Voleur")
                .with_hit_dice(HitDice::with_used(3, 2));
            rogue.level_up(LevelUpRequest::new(5), &catalog())
                .expect("valid");
            assert_eq!(rogue.hit_dice(), HitDice::with_used(4, 2));
        }

        #[test]
        fn level_twenty_is_the_ceiling() {
            let mut capped = character(CharacterClass::Barde, 20);
            assert_eq!(
                capped.level_up(LevelUpRequest::new(1), &catalog()),
                Err(LevelUpError::MaxLevelReached)
            );
        }

        #[test]
        fn paladin_gains_channel_divinity_at_three() {
            let mut paladin = character(CharacterClass::Paladin, 2);
            paladin
                .level_up(
                    LevelUpRequest::new(6).with_subclass("Serment de dévotion"),
                    &catalog(),
                )
                .expect("valid");
            let record = paladin.class_resources().to_record();
            assert_eq!(record.get("channel_divinity"), Some(&serde_json::json!(2)));
            assert_eq!(record.get("used_channel_divinity"), Some(&serde_json::json!(0)));
        }

        #[test]
        fn low_constitution_narrows_the_range() {
            let mut wizard = character(CharacterClass::Magicien, 1);
            wizard.set_abilities(abilities(-1, 0));
            assert_eq!(wizard.max_hp_gain(), 5);
            assert_eq!(
                wizard.level_up(LevelUpRequest::new(6), &catalog()),
                Err(LevelUpError::HpGainTooHigh { max: 5 })
            );
        }
    }
}
