//! Repository port traits for character storage.

use async_trait::async_trait;
use sheetwright_domain::{Character, CharacterId};

use super::error::RepoError;

/// Durable storage for character snapshots.
///
/// `save` is all-or-nothing: on error the stored snapshot is the previous one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<Character>, RepoError>;
}
