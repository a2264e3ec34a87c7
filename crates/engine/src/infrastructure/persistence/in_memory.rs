use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use sheetwright_domain::{Character, CharacterId};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

/// Process-local store, used for tests and `SHEETWRIGHT_STORE=memory`.
#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self {
            characters: RwLock::new(HashMap::new()),
        }
    }

    /// A store pre-filled with `characters`.
    pub fn with_characters(characters: impl IntoIterator<Item = Character>) -> Self {
        Self {
            characters: RwLock::new(characters.into_iter().map(|c| (c.id(), c)).collect()),
        }
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.read().await.get(&id).cloned())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters
            .write()
            .await
            .insert(character.id(), character.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        let mut characters: Vec<Character> =
            self.characters.read().await.values().cloned().collect();
        characters.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(characters)
    }
}
