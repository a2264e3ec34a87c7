//! Built-in subclass catalog.

use super::traits::SubclassCatalog;
use crate::value_objects::CharacterClass;

/// Subclasses from the core rules, by class.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSubclasses;

impl BuiltinSubclasses {
    pub fn new() -> Self {
        Self
    }

    fn names(class: CharacterClass) -> &'static [&'static str] {
        match class {
            CharacterClass::Barbare => &[
                "Voie du Berserker",
                "Voie du Cœur sauvage",
                "Voie de l'Arbre-Monde",
                "Voie du Zélateur",
            ],
            CharacterClass::Barde => &[
                "Collège de la Danse",
                "Collège du Savoir",
                "Collège de la Séduction",
                "Collège de la Vaillance",
            ],
            CharacterClass::Clerc => &[
                "Domaine de la Vie",
                "Domaine de la Lumière",
                "Domaine de la Ruse",
                "Domaine de la Guerre",
            ],
            CharacterClass::Druide => &[
                "Cercle de la Terre",
                "Cercle de la Lune",
                "Cercle de la Mer",
                "Cercle des Étoiles",
            ],
            CharacterClass::Ensorceleur => &[
                "Sorcellerie aberrante",
                "Sorcellerie mécanique",
                "Sorcellerie draconique",
                "Magie sauvage",
            ],
            CharacterClass::Guerrier => &[
                "Maître de guerre",
                "Champion",
                "Chevalier occulte",
                "Guerrier psi",
            ],
            CharacterClass::Magicien => &[
                "Abjurateur",
                "Devin",
                "Évocateur",
                "Illusionniste",
            ],
            CharacterClass::Moine => &[
                "Credo de la Miséricorde",
                "Credo de l'Ombre",
                "Credo des Éléments",
                "Credo de la Paume",
            ],
            CharacterClass::Occultiste => &[
                "Protecteur Archifée",
                "Protecteur Céleste",
                "Protecteur Fiélon",
                "Protecteur Grand Ancien",
            ],
            CharacterClass::Paladin => &[
                "Serment de dévotion",
                "Serment de gloire",
                "Serment des Anciens",
                "Serment de vengeance",
            ],
            CharacterClass::Rodeur => &[
                "Belluaire",
                "Traqueur des ténèbres",
                "Vagabond féerique",
                "Chasseur",
            ],
            CharacterClass::Roublard => &[
                "Arnaqueur arcanique",
                "Assassin",
                "Âme acérée",
                "Voleur",
            ],
        }
    }
}

impl SubclassCatalog for BuiltinSubclasses {
    fn options(&self, class: CharacterClass) -> Vec<String> {
        Self::names(class).iter().map(|s| s.to_string()).collect()
    }
}
