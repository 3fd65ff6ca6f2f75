//! File-backed snapshot store
//!
//! Stores key-value pairs in a JSON file at:
//! - Linux: ~/.config/stampalooza/storage.json
//! - macOS: ~/Library/Application Support/io.stampalooza.player/storage.json
//! - Windows: C:\Users\<User>\AppData\Roaming\stampalooza\player\config\storage.json
//!
//! The roster snapshot and the inventory projection live under separate keys
//! (`storage_keys::GAME`, `storage_keys::INVENTORY`).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;
use stampalooza_domain::{GameSnapshot, Inventory};

use crate::ports::outbound::{storage_keys, PersistedGame, SnapshotStorePort, StorageError};

#[derive(Clone)]
pub struct FileSnapshotStore {
    /// Path to the storage file
    storage_path: PathBuf,
    /// In-memory cache of stored values
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl FileSnapshotStore {
    /// Open the store at `path`, loading whatever it already holds.
    ///
    /// An unreadable or corrupt file is logged and treated as empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let storage_path = path.into();

        let cache = if storage_path.exists() {
            match fs::read_to_string(&storage_path) {
                Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::warn!("Failed to parse storage file: {}", e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read storage file: {}", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::debug!("Snapshot storage initialized at: {:?}", storage_path);

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Platform config directory, or the working directory when unavailable
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = ProjectDirs::from("io", "stampalooza", "player") {
            dirs.config_dir().join("storage.json")
        } else {
            PathBuf::from("stampalooza_storage.json")
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                None
            }
        }
    }

    /// Apply `update` to the cache and write the whole map back to disk.
    fn write_with<F>(&self, update: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let data = {
            let mut guard = self
                .cache
                .write()
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            update(&mut guard);
            serde_json::to_string_pretty(&*guard)?
        };

        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.storage_path, data)?;
        Ok(())
    }
}

impl Default for FileSnapshotStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl SnapshotStorePort for FileSnapshotStore {
    fn save(&self, state: &PersistedGame) -> Result<(), StorageError> {
        let game = serde_json::to_string(&state.game)?;
        let inventory = serde_json::to_string(&state.inventory)?;
        self.write_with(|map| {
            map.insert(storage_keys::GAME.to_string(), game);
            map.insert(storage_keys::INVENTORY.to_string(), inventory);
        })
    }

    fn load(&self) -> Result<Option<PersistedGame>, StorageError> {
        let Some(game) = self.read_key(storage_keys::GAME) else {
            return Ok(None);
        };
        let game: GameSnapshot = serde_json::from_str(&game)?;
        let inventory = match self.read_key(storage_keys::INVENTORY) {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Inventory::fallback(),
        };
        Ok(Some(PersistedGame { game, inventory }))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.write_with(|map| {
            map.remove(storage_keys::GAME);
            map.remove(storage_keys::INVENTORY);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampalooza_domain::{FlavorTag, Game, GameRules};

    fn persisted() -> PersistedGame {
        let mut game = Game::new(GameRules::default(), Inventory::fallback());
        game.submit_players(&["Amy", "Bo"]).expect("players");
        let mut inventory = Inventory::fallback();
        inventory.apply_server_quantity(FlavorTag::Rich, 1);
        PersistedGame {
            game: game.snapshot(),
            inventory,
        }
    }

    #[test]
    fn empty_store_loads_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(dir.path().join("storage.json"));
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn saved_state_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("storage.json");
        let state = persisted();

        FileSnapshotStore::new(&path).save(&state).expect("save");
        let reopened = FileSnapshotStore::new(&path);
        assert_eq!(reopened.load().expect("load"), Some(state));
    }

    #[test]
    fn keys_are_namespaced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        FileSnapshotStore::new(&path).save(&persisted()).expect("save");

        let raw = fs::read_to_string(&path).expect("read");
        let map: HashMap<String, String> = serde_json::from_str(&raw).expect("map");
        assert!(map.contains_key("stampalooza.game"));
        assert!(map.contains_key("stampalooza.inventory"));
    }

    #[test]
    fn clear_removes_both_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        let store = FileSnapshotStore::new(&path);
        store.save(&persisted()).expect("save");
        store.clear().expect("clear");
        assert!(store.load().expect("load").is_none());
        assert!(FileSnapshotStore::new(&path).load().expect("load").is_none());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").expect("write");
        assert!(FileSnapshotStore::new(&path).load().expect("load").is_none());
    }
}
