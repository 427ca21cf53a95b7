//! JSON file persistence for the tracker state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use spelltracker_domain::Spellcaster;
use tokio::fs;

use crate::infrastructure::ports::{StateStore, StoreError};

/// Stores the whole spellcaster as one pretty-printed JSON document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Spellcaster>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io("load", e)),
        };
        let state = serde_json::from_str(&content).map_err(StoreError::serialization)?;
        Ok(Some(state))
    }

    async fn save(&self, state: &Spellcaster) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state).map_err(StoreError::serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io("save", e))?;
        }

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io("save", e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io("save", e))?;

        tracing::debug!(path = %self.path.display(), "Tracker state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spelltracker_domain::{CharacterLevel, Spell, SpellLevel, SpellName};

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("spell-tracker.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("spell-tracker.json"));

        let mut state = Spellcaster::default();
        state.set_level(CharacterLevel::new(5).unwrap());
        state
            .add_known_spell(Spell::new(
                SpellName::new("Fireball").unwrap(),
                SpellLevel::Level(3),
            ))
            .unwrap();
        state.use_slot(3).unwrap();

        store.save(&state).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, state);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  \"profile\""));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spell-tracker.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
