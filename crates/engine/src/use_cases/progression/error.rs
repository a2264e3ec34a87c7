//! Progression operation errors.

use crate::infrastructure::ports::RepoError;
use sheetwright_domain::{CharacterId, DomainError, LedgerError, LevelUpError};

/// Errors that can occur during progression operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("{0}")]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    LevelUp(#[from] LevelUpError),
    #[error("Invalid input: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl ProgressionError {
    /// True when the operation was refused by a game rule rather than by
    /// storage or bad input.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Ledger(_) | Self::LevelUp(_))
    }
}
