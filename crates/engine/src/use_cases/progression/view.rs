//! Read model of a character sheet's progression state.

use serde::Serialize;
use serde_json::{Map, Value};
use sheetwright_domain::{arcane_recovery_budget, Character, SpellKnowledge, SpellSlots};

/// Everything a sheet renders about progression, with live caps applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetView {
    pub id: String,
    pub name: String,
    pub class: Option<String>,
    pub subclass: Option<String>,
    pub level: u8,
    pub current_hp: i32,
    pub max_hp: i32,
    pub hit_dice_total: u8,
    pub hit_dice_used: u8,
    pub spell_slots: SpellSlots,
    pub resources: Vec<ResourceView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sneak_attack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcane_recovery: Option<ArcaneRecoveryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_knowledge: Option<KnowledgeView>,
    /// Stored record, as persisted.
    pub class_resources: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceView {
    pub key: &'static str,
    pub used: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArcaneRecoveryView {
    pub used: bool,
    pub levels_recovered: u8,
    pub budget: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeView {
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantrips: Option<u8>,
    pub prepared: u8,
    pub note: &'static str,
}

impl From<&Character> for SheetView {
    fn from(character: &Character) -> Self {
        let resources = character.class_resources();
        let cap = character.bardic_inspiration_cap();

        Self {
            id: character.id().to_string(),
            name: character.name().to_string(),
            class: character
                .class()
                .map(|c| c.to_string())
                .or_else(|| character.unrecognized_class().map(str::to_string)),
            subclass: character.subclass().map(str::to_string),
            level: character.level().get(),
            current_hp: character.current_hp(),
            max_hp: character.max_hp(),
            hit_dice_total: character.hit_dice().total(),
            hit_dice_used: character.hit_dice().used(),
            spell_slots: character.spell_slots().clone(),
            resources: resources
                .tracked()
                .into_iter()
                .filter_map(|id| {
                    resources.pool(id, cap).map(|pool| ResourceView {
                        key: id.key(),
                        used: pool.used(),
                        max: pool.max(),
                    })
                })
                .collect(),
            sneak_attack: resources.sneak_attack().map(|dice| dice.to_string()),
            arcane_recovery: resources.arcane_recovery().map(|recovery| ArcaneRecoveryView {
                used: recovery.is_used(),
                levels_recovered: recovery.levels_recovered(),
                budget: arcane_recovery_budget(character.level()),
            }),
            spell_knowledge: match character.spell_knowledge() {
                SpellKnowledge::None => None,
                SpellKnowledge::Prepared {
                    cantrips,
                    prepared,
                    label,
                    note,
                } => Some(KnowledgeView {
                    label,
                    cantrips,
                    prepared,
                    note,
                }),
            },
            class_resources: resources.to_record(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheetwright_domain::CharacterClass;

    fn character(class: CharacterClass, level: i64, cha: i32) -> Character {
        let abilities = json!({ "cha": { "modifier": cha }, "con": { "score": 14 } });
        let mut character = Character::new("Maëlle", Some(class), abilities);
        character.set_level(level);
        character
    }

    #[test]
    fn bard_pool_uses_live_charisma_cap() {
        let view = SheetView::from(&character(CharacterClass::Barde, 2, 3));
        assert_eq!(
            view.resources,
            vec![ResourceView {
                key: "bardic_inspiration",
                used: 0,
                max: 3,
            }]
        );
    }

    #[test]
    fn wizard_shows_recovery_budget_and_knowledge() {
        let view = SheetView::from(&character(CharacterClass::Magicien, 6, 0));
        assert_eq!(
            view.arcane_recovery,
            Some(ArcaneRecoveryView {
                used: false,
                levels_recovered: 0,
                budget: 3,
            })
        );
        let knowledge = view.spell_knowledge.expect("wizard prepares spells");
        assert_eq!(knowledge.cantrips, Some(4));
        assert_eq!(knowledge.prepared, 10);
    }

    #[test]
    fn rogue_serializes_sneak_attack_without_knowledge() {
        let view = SheetView::from(&character(CharacterClass::Roublard, 5, 0));
        let json = serde_json::to_value(&view).expect("serialize");
        assert_eq!(json["sneak_attack"], json!("3d6"));
        assert!(json.get("spell_knowledge").is_none());
        assert!(view.resources.is_empty());
    }
}
