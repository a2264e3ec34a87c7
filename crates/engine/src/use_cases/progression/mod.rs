//! Character progression use cases.
//!
//! Every mutation follows the same path: load the stored snapshot, apply the
//! domain operation to that copy, save it, and return it only once the save
//! went through. A rejected or unsaved operation hands nothing back, so the
//! caller keeps its previous view.

mod error;
mod types;
mod view;

use std::sync::Arc;

use serde_json::Value;
use sheetwright_domain::{
    ArcaneRecoveryOutcome, Character, CharacterClass, CharacterId, HitDieOutcome, LedgerOutcome,
    LevelUpOutcome, LevelUpRequest, ProgressionChange, RestOutcome, RestType, SubclassCatalog,
};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

pub use error::ProgressionError;
pub use types::{Applied, LedgerTarget};
pub use view::{ArcaneRecoveryView, KnowledgeView, ResourceView, SheetView};

/// Container for progression use cases.
pub struct ProgressionUseCases {
    repo: Arc<dyn CharacterRepo>,
    catalog: Arc<dyn SubclassCatalog>,
}

impl ProgressionUseCases {
    pub fn new(repo: Arc<dyn CharacterRepo>, catalog: Arc<dyn SubclassCatalog>) -> Self {
        Self { repo, catalog }
    }

    /// Subclass names offered to a class.
    pub fn subclass_options(&self, class: CharacterClass) -> Vec<String> {
        self.catalog.options(class)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Create and store a level 1 character.
    pub async fn create(
        &self,
        name: &str,
        class: Option<CharacterClass>,
        abilities: Value,
    ) -> Result<Character, ProgressionError> {
        let character = Character::new(name, class, abilities);
        self.commit(&character, "create").await?;
        tracing::info!(
            character_id = %character.id(),
            name = %character.name(),
            class = ?character.class(),
            max_hp = character.max_hp(),
            "Character created"
        );
        Ok(character)
    }

    /// Load a character for display.
    ///
    /// The bardic inspiration cap follows the live Charisma modifier, so the
    /// stored counter is re-clamped here and written back only when it moved.
    pub async fn show(&self, id: CharacterId) -> Result<Character, ProgressionError> {
        let mut character = self.load(id).await?;
        if character.sync_live_caps() {
            self.commit(&character, "sync_live_caps").await?;
            tracing::info!(
                character_id = %id,
                cap = character.bardic_inspiration_cap(),
                "Bardic inspiration re-clamped to live cap"
            );
        }
        Ok(character)
    }

    pub async fn list(&self) -> Result<Vec<Character>, ProgressionError> {
        self.repo.list().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list characters");
            ProgressionError::from(e)
        })
    }

    // =========================================================================
    // Progression refresh
    // =========================================================================

    /// Recompute slot maxima and class resources for the current class and
    /// level. Nothing is written when the record is already current.
    pub async fn resolve(&self, id: CharacterId) -> Result<Applied<bool>, ProgressionError> {
        let mut character = self.load(id).await?;
        let refreshed = character.resolve_progression();
        let clamped = character.sync_live_caps();
        let changed = refreshed || clamped;
        if changed {
            self.commit(&character, "resolve").await?;
            tracing::info!(character_id = %id, level = %character.level(), "Progression resolved");
        } else {
            tracing::debug!(character_id = %id, "Progression already current");
        }
        Ok(Applied {
            character,
            outcome: changed,
        })
    }

    pub async fn change_class(
        &self,
        id: CharacterId,
        class: Option<CharacterClass>,
    ) -> Result<Applied<ProgressionChange>, ProgressionError> {
        let mut character = self.load(id).await?;
        let change = character.change_class(class);
        self.commit_change(&character, &change, "change_class").await?;
        Ok(Applied {
            character,
            outcome: change,
        })
    }

    /// Set the level directly; out-of-range values are clamped to 1-20.
    pub async fn set_level(
        &self,
        id: CharacterId,
        level: i64,
    ) -> Result<Applied<ProgressionChange>, ProgressionError> {
        let mut character = self.load(id).await?;
        let change = character.set_level(level);
        self.commit_change(&character, &change, "set_level").await?;
        Ok(Applied {
            character,
            outcome: change,
        })
    }

    /// Replace ability data. Skips the write when the data is identical.
    pub async fn set_abilities(
        &self,
        id: CharacterId,
        abilities: Value,
    ) -> Result<Character, ProgressionError> {
        let mut character = self.load(id).await?;
        if character.abilities() == &abilities {
            tracing::debug!(character_id = %id, "Ability data unchanged");
            return Ok(character);
        }
        let clamped = character.set_abilities(abilities);
        self.commit(&character, "set_abilities").await?;
        tracing::info!(
            character_id = %id,
            bardic_inspiration_clamped = clamped,
            "Ability data updated"
        );
        Ok(character)
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    pub async fn consume(
        &self,
        id: CharacterId,
        target: LedgerTarget,
        amount: u32,
    ) -> Result<Applied<LedgerOutcome>, ProgressionError> {
        let applied = self
            .apply(id, "consume", |character| match target {
                LedgerTarget::Resource(resource) => character.consume_resource(resource, amount),
                LedgerTarget::Slot(level) => character.consume_slot(level, amount),
            })
            .await?;
        tracing::info!(
            character_id = %id,
            target = %target,
            amount,
            used = applied.outcome.used(),
            max = applied.outcome.max(),
            "Consumed"
        );
        Ok(applied)
    }

    pub async fn recover(
        &self,
        id: CharacterId,
        target: LedgerTarget,
        amount: u32,
    ) -> Result<Applied<LedgerOutcome>, ProgressionError> {
        let applied = self
            .apply(id, "recover", |character| match target {
                LedgerTarget::Resource(resource) => character.recover_resource(resource, amount),
                LedgerTarget::Slot(level) => character.recover_slot(level, amount),
            })
            .await?;
        tracing::info!(
            character_id = %id,
            target = %target,
            amount,
            used = applied.outcome.used(),
            max = applied.outcome.max(),
            "Recovered"
        );
        Ok(applied)
    }

    pub async fn exchange_arcane_recovery(
        &self,
        id: CharacterId,
        spell_level: u8,
    ) -> Result<Applied<ArcaneRecoveryOutcome>, ProgressionError> {
        let applied = self
            .apply(id, "arcane_recovery", |character| {
                character.exchange_arcane_recovery(spell_level)
            })
            .await?;
        tracing::info!(
            character_id = %id,
            spell_level,
            budget_spent = applied.outcome.budget_spent,
            budget_remaining = applied.outcome.budget_remaining,
            exhausted = applied.outcome.exhausted,
            "Arcane recovery exchanged"
        );
        Ok(applied)
    }

    // =========================================================================
    // Level-up and rests
    // =========================================================================

    pub async fn level_up(
        &self,
        id: CharacterId,
        request: LevelUpRequest,
    ) -> Result<Applied<LevelUpOutcome>, ProgressionError> {
        let applied = self
            .apply(id, "level_up", |character| {
                character.level_up(request, self.catalog.as_ref())
            })
            .await?;
        tracing::info!(
            character_id = %id,
            from = %applied.outcome.from,
            to = %applied.outcome.to,
            hp_gain = applied.outcome.hp_gain,
            max_hp = applied.character.max_hp(),
            subclass = ?applied.outcome.subclass_chosen,
            "Level up committed"
        );
        Ok(applied)
    }

    /// Whether the next level-up of this character must name a subclass.
    pub async fn needs_subclass_choice(&self, id: CharacterId) -> Result<bool, ProgressionError> {
        let character = self.load(id).await?;
        Ok(character.needs_subclass_choice(self.catalog.as_ref()))
    }

    pub async fn rest(
        &self,
        id: CharacterId,
        rest: RestType,
    ) -> Result<Applied<RestOutcome>, ProgressionError> {
        let mut character = self.load(id).await?;
        let outcome = character.take_rest(rest);
        self.commit(&character, "rest").await?;
        tracing::info!(
            character_id = %id,
            rest = ?outcome.rest,
            hp_restored = outcome.hp_restored,
            hit_dice_recovered = outcome.hit_dice_recovered,
            "Rest taken"
        );
        Ok(Applied { character, outcome })
    }

    /// Spend a hit die during a short rest; `roll` is the die result.
    pub async fn spend_hit_die(
        &self,
        id: CharacterId,
        roll: u8,
    ) -> Result<Applied<HitDieOutcome>, ProgressionError> {
        let applied = self
            .apply(id, "spend_hit_die", |character| character.spend_hit_die(roll))
            .await?;
        tracing::info!(
            character_id = %id,
            roll,
            healed = applied.outcome.healed,
            remaining = applied.outcome.remaining,
            "Hit die spent"
        );
        Ok(applied)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load(&self, id: CharacterId) -> Result<Character, ProgressionError> {
        let character = self.repo.get(id).await.map_err(|e| {
            tracing::error!(character_id = %id, error = %e, "Failed to load character");
            ProgressionError::from(e)
        })?;
        tracing::debug!(character_id = %id, found = character.is_some(), "Loaded character");
        character.ok_or(ProgressionError::CharacterNotFound(id))
    }

    async fn commit(
        &self,
        character: &Character,
        operation: &'static str,
    ) -> Result<(), ProgressionError> {
        self.repo.save(character).await.map_err(|e: RepoError| {
            tracing::error!(
                character_id = %character.id(),
                operation,
                error = %e,
                "Failed to save character"
            );
            ProgressionError::from(e)
        })?;
        tracing::debug!(character_id = %character.id(), operation, "Saved character");
        Ok(())
    }

    async fn commit_change(
        &self,
        character: &Character,
        change: &ProgressionChange,
        operation: &'static str,
    ) -> Result<(), ProgressionError> {
        if *change == ProgressionChange::Unchanged {
            tracing::debug!(character_id = %character.id(), operation, "Nothing to change");
            return Ok(());
        }
        self.commit(character, operation).await?;
        tracing::info!(
            character_id = %character.id(),
            operation,
            change = ?change,
            "Progression changed"
        );
        Ok(())
    }

    /// Run a fallible domain operation on a loaded copy and persist it.
    async fn apply<T, E>(
        &self,
        id: CharacterId,
        operation: &'static str,
        f: impl FnOnce(&mut Character) -> Result<T, E>,
    ) -> Result<Applied<T>, ProgressionError>
    where
        ProgressionError: From<E>,
    {
        let mut character = self.load(id).await?;
        let outcome = f(&mut character).map_err(|e| {
            let e = ProgressionError::from(e);
            tracing::warn!(character_id = %id, operation, reason = %e, "Operation rejected");
            e
        })?;
        self.commit(&character, operation).await?;
        Ok(Applied { character, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCharacterRepo;
    use mockall::predicate::*;
    use serde_json::json;
    use sheetwright_domain::{
        BuiltinSubclasses, LedgerError, LevelUpError, ResourceId, SlotPoolRef,
    };

    fn abilities(con: i32, cha: i32) -> Value {
        json!([
            { "name": "Constitution", "modifier": con },
            { "name": "Charisme", "modifier": cha },
        ])
    }

    fn stored(class: CharacterClass, level: i64) -> Character {
        let mut character = Character::new("Ysolde", Some(class), abilities(2, 2));
        character.set_level(level);
        character
    }

    fn use_cases(repo: MockCharacterRepo) -> ProgressionUseCases {
        ProgressionUseCases::new(Arc::new(repo), Arc::new(BuiltinSubclasses::new()))
    }

    /// A repo whose `get` returns `character` and which expects `saves` writes.
    fn repo_with(character: &Character, saves: usize) -> MockCharacterRepo {
        let mut repo = MockCharacterRepo::new();
        let id = character.id();
        let snapshot = character.clone();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(snapshot.clone())));
        repo.expect_save().times(saves).returning(|_| Ok(()));
        repo
    }

    mod ledger {
        use super::*;

        #[tokio::test]
        async fn consume_saves_the_updated_snapshot() {
            let monk = stored(CharacterClass::Moine, 5);
            let id = monk.id();
            let mut repo = MockCharacterRepo::new();
            let snapshot = monk.clone();
            repo.expect_get()
                .with(eq(id))
                .returning(move |_| Ok(Some(snapshot.clone())));
            repo.expect_save()
                .withf(|c| {
                    c.class_resources()
                        .pool(ResourceId::KiPoints, 0)
                        .map(|p| p.used())
                        == Some(2)
                })
                .times(1)
                .returning(|_| Ok(()));

            let applied = use_cases(repo)
                .consume(id, LedgerTarget::Resource(ResourceId::KiPoints), 2)
                .await
                .expect("ki available");
            assert_eq!(applied.outcome.used(), 2);
            assert_eq!(applied.outcome.max(), 5);
        }

        #[tokio::test]
        async fn rejected_consume_is_not_saved() {
            let fighter = stored(CharacterClass::Guerrier, 2);
            let repo = repo_with(&fighter, 0);

            let err = use_cases(repo)
                .consume(fighter.id(), LedgerTarget::Resource(ResourceId::ActionSurge), 2)
                .await
                .expect_err("only one surge");
            assert!(err.is_rejection());
            assert!(matches!(
                err,
                ProgressionError::Ledger(LedgerError::Exhausted { .. })
            ));
        }

        #[tokio::test]
        async fn slot_recovery_targets_pact_pool() {
            let mut warlock = stored(CharacterClass::Occultiste, 5);
            warlock.consume_slot(3, 1).expect("pact slot");
            let repo = repo_with(&warlock, 1);

            let applied = use_cases(repo)
                .recover(warlock.id(), LedgerTarget::Slot(3), 1)
                .await
                .expect("one expended");
            assert!(matches!(
                applied.outcome,
                LedgerOutcome::Slot {
                    pool: SlotPoolRef::Pact,
                    used: 0,
                    ..
                }
            ));
        }

        #[tokio::test]
        async fn failed_save_returns_the_store_error() {
            let barbarian = stored(CharacterClass::Barbare, 3);
            let id = barbarian.id();
            let mut repo = MockCharacterRepo::new();
            let snapshot = barbarian.clone();
            repo.expect_get()
                .returning(move |_| Ok(Some(snapshot.clone())));
            repo.expect_save()
                .times(1)
                .returning(|_| Err(RepoError::io("write", "disk full")));

            let err = use_cases(repo)
                .consume(id, LedgerTarget::Resource(ResourceId::Rage), 1)
                .await
                .expect_err("store down");
            assert!(matches!(err, ProgressionError::Repo(RepoError::Io { .. })));
            assert!(!err.is_rejection());
        }

        #[tokio::test]
        async fn missing_character_is_reported() {
            let mut repo = MockCharacterRepo::new();
            repo.expect_get().returning(|_| Ok(None));
            repo.expect_save().never();

            let id = CharacterId::new();
            let err = use_cases(repo)
                .consume(id, LedgerTarget::Slot(1), 1)
                .await
                .expect_err("nothing stored");
            assert!(matches!(err, ProgressionError::CharacterNotFound(missing) if missing == id));
        }

        #[tokio::test]
        async fn arcane_recovery_spends_level_sized_budget() {
            let mut wizard = stored(CharacterClass::Magicien, 6);
            wizard.consume_slot(2, 1).expect("slot");
            let repo = repo_with(&wizard, 1);

            let applied = use_cases(repo)
                .exchange_arcane_recovery(wizard.id(), 2)
                .await
                .expect("budget of three");
            assert_eq!(applied.outcome.budget_spent, 2);
            assert_eq!(applied.outcome.budget_remaining, 1);
            assert_eq!(applied.character.spell_slots().used(2), Some(0));
        }
    }

    mod level_up {
        use super::*;

        #[tokio::test]
        async fn commits_with_the_chosen_subclass() {
            let cleric = stored(CharacterClass::Clerc, 2);
            let repo = repo_with(&cleric, 1);

            let applied = use_cases(repo)
                .level_up(
                    cleric.id(),
                    LevelUpRequest::new(6).with_subclass("Domaine de la Lumière"),
                )
                .await
                .expect("valid level-up");
            assert_eq!(applied.character.level().get(), 3);
            assert_eq!(applied.character.subclass(), Some("Domaine de la Lumière"));
        }

        #[tokio::test]
        async fn missing_subclass_is_rejected_without_saving() {
            let cleric = stored(CharacterClass::Clerc, 2);
            let repo = repo_with(&cleric, 0);

            let err = use_cases(repo)
                .level_up(cleric.id(), LevelUpRequest::new(6))
                .await
                .expect_err("milestone");
            assert!(matches!(
                err,
                ProgressionError::LevelUp(LevelUpError::SubclassRequired(3))
            ));
        }

        #[tokio::test]
        async fn reports_pending_subclass_choice() {
            let rogue = stored(CharacterClass::Roublard, 2);
            let repo = repo_with(&rogue, 0);
            assert!(use_cases(repo)
                .needs_subclass_choice(rogue.id())
                .await
                .expect("loaded"));
        }
    }

    mod refresh {
        use super::*;

        #[tokio::test]
        async fn resolve_skips_the_write_when_current() {
            let sorcerer = stored(CharacterClass::Ensorceleur, 4);
            let repo = repo_with(&sorcerer, 0);

            let applied = use_cases(repo)
                .resolve(sorcerer.id())
                .await
                .expect("resolved");
            assert!(!applied.outcome);
            assert_eq!(applied.character, sorcerer);
        }

        #[tokio::test]
        async fn unchanged_class_is_not_saved() {
            let druid = stored(CharacterClass::Druide, 4);
            let repo = repo_with(&druid, 0);

            let applied = use_cases(repo)
                .change_class(druid.id(), Some(CharacterClass::Druide))
                .await
                .expect("no-op");
            assert_eq!(applied.outcome, ProgressionChange::Unchanged);
        }

        #[tokio::test]
        async fn set_level_clears_subclass_below_milestone() {
            let paladin =
                stored(CharacterClass::Paladin, 5).with_subclass("Serment de dévotion");
            let repo = repo_with(&paladin, 1);

            let applied = use_cases(repo)
                .set_level(paladin.id(), 2)
                .await
                .expect("level set");
            assert_eq!(applied.character.subclass(), None);
            assert!(matches!(
                applied.outcome,
                ProgressionChange::LevelSet {
                    subclass_cleared: Some(_),
                    ..
                }
            ));
        }

        #[tokio::test]
        async fn show_writes_back_a_lowered_bardic_cap() {
            let mut bard = stored(CharacterClass::Barde, 4);
            bard.consume_resource(ResourceId::BardicInspiration, 2)
                .expect("cap of two");

            // Charisma dropped to +1 outside the engine; the record still says 2.
            let mut record = serde_json::to_value(&bard).expect("serialize");
            record["abilities"] = abilities(2, 1);
            let stale: Character = serde_json::from_value(record).expect("deserialize");

            let mut repo = MockCharacterRepo::new();
            let snapshot = stale.clone();
            repo.expect_get()
                .returning(move |_| Ok(Some(snapshot.clone())));
            repo.expect_save()
                .withf(|c| {
                    c.class_resources().to_record().get("used_bardic_inspiration")
                        == Some(&json!(1))
                })
                .times(1)
                .returning(|_| Ok(()));

            let shown = use_cases(repo).show(bard.id()).await.expect("loaded");
            assert_eq!(shown.bardic_inspiration_cap(), 1);
        }

        #[tokio::test]
        async fn identical_abilities_skip_the_write() {
            let fighter = stored(CharacterClass::Guerrier, 1);
            let repo = repo_with(&fighter, 0);

            use_cases(repo)
                .set_abilities(fighter.id(), abilities(2, 2))
                .await
                .expect("unchanged");
        }
    }

    mod rests {
        use super::*;

        #[tokio::test]
        async fn exhausted_hit_dice_are_not_saved() {
            let fighter = stored(CharacterClass::Guerrier, 1)
                .with_hit_dice(sheetwright_domain::HitDice::with_used(1, 1));
            let repo = repo_with(&fighter, 0);

            let err = use_cases(repo)
                .spend_hit_die(fighter.id(), 5)
                .await
                .expect_err("no dice left");
            assert!(matches!(
                err,
                ProgressionError::Ledger(LedgerError::NoHitDiceLeft)
            ));
        }

        #[tokio::test]
        async fn long_rest_is_saved() {
            let mut ranger = stored(CharacterClass::Rodeur, 5);
            ranger
                .consume_resource(ResourceId::FavoredFoe, 1)
                .expect("one use");
            let repo = repo_with(&ranger, 1);

            let applied = use_cases(repo)
                .rest(ranger.id(), RestType::Long)
                .await
                .expect("rested");
            assert_eq!(
                applied
                    .character
                    .class_resources()
                    .pool(ResourceId::FavoredFoe, 0)
                    .map(|p| p.used()),
                Some(0)
            );
        }
    }

    #[tokio::test]
    async fn create_saves_a_level_one_character() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_save()
            .withf(|c| c.level().get() == 1 && c.name() == "Aldric")
            .times(1)
            .returning(|_| Ok(()));

        let created = use_cases(repo)
            .create("Aldric", Some(CharacterClass::Guerrier), abilities(3, 0))
            .await
            .expect("created");
        // Hit die 10, Constitution +3
        assert_eq!(created.max_hp(), 13);
    }
}
