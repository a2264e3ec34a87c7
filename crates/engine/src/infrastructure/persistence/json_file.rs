//! JSON file store: one pretty-printed file per character, named by id.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use sheetwright_domain::{Character, CharacterId};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

const EXTENSION: &str = "json";

/// Tokio-based file store.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// failed save leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileCharacterRepo {
    root: PathBuf,
}

impl JsonFileCharacterRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: CharacterId) -> PathBuf {
        self.root.join(format!("{}.{}", id, EXTENSION))
    }

    async fn read_character(path: &Path) -> Result<Character, RepoError> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                RepoError::not_found("Character", path.display())
            } else {
                RepoError::io("read", e)
            }
        })?;
        serde_json::from_str(&content).map_err(RepoError::serialization)
    }
}

#[async_trait]
impl CharacterRepo for JsonFileCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let path = self.path_for(id);
        if !fs::try_exists(&path)
            .await
            .map_err(|e| RepoError::io("get", e))?
        {
            return Ok(None);
        }
        match Self::read_character(&path).await {
            Ok(character) => Ok(Some(character)),
            // Deleted between the existence check and the read.
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let json = serde_json::to_string_pretty(character).map_err(RepoError::serialization)?;

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| RepoError::io("create_dir", e))?;

        let path = self.path_for(character.id());
        let staging = path.with_extension("json.tmp");
        let mut file = fs::File::create(&staging)
            .await
            .map_err(|e| RepoError::io("save", e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| RepoError::io("save", e))?;
        file.flush().await.map_err(|e| RepoError::io("save", e))?;
        drop(file);

        fs::rename(&staging, &path)
            .await
            .map_err(|e| RepoError::io("rename", e))
    }

    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        if !fs::try_exists(&self.root)
            .await
            .map_err(|e| RepoError::io("list", e))?
        {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| RepoError::io("list", e))?;
        let mut characters = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepoError::io("list", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                characters.push(Self::read_character(&path).await?);
            }
        }
        characters.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(characters)
    }
}
