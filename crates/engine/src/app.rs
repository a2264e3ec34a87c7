//! Application state and composition.

use std::sync::Arc;

use sheetwright_domain::{BuiltinSubclasses, SubclassCatalog};

use crate::infrastructure::{
    config::{EngineConfig, StoreBackend},
    persistence::{InMemoryCharacterRepo, JsonFileCharacterRepo},
    ports::CharacterRepo,
};
use crate::use_cases::ProgressionUseCases;

/// Main application state.
///
/// Holds the character store and the use cases built on top of it.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for storage ports.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub progression: Arc<ProgressionUseCases>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        character_repo: Arc<dyn CharacterRepo>,
        catalog: Arc<dyn SubclassCatalog>,
    ) -> Self {
        let progression = Arc::new(ProgressionUseCases::new(character_repo.clone(), catalog));

        Self {
            repositories: Repositories {
                character: character_repo,
            },
            use_cases: UseCases { progression },
        }
    }

    /// Wire the store selected by configuration with the built-in subclass
    /// catalog.
    pub fn from_config(config: &EngineConfig) -> Self {
        let character_repo: Arc<dyn CharacterRepo> = match config.store {
            StoreBackend::File => {
                tracing::info!(data_dir = %config.data_dir.display(), "Using JSON file store");
                Arc::new(JsonFileCharacterRepo::new(config.data_dir.clone()))
            }
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store");
                Arc::new(InMemoryCharacterRepo::new())
            }
        };
        Self::new(character_repo, Arc::new(BuiltinSubclasses::new()))
    }
}
