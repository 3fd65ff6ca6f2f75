//! Snapshot store port - client-side persistence of the game in progress
//!
//! The store is a last-write-wins mirror. The game service writes it after
//! every transition and clears it when a new game starts.

use serde::{Deserialize, Serialize};
use stampalooza_domain::{GameSnapshot, Inventory};
use thiserror::Error;

/// Storage key constants
pub mod storage_keys {
    pub const GAME: &str = "stampalooza.game";
    pub const INVENTORY: &str = "stampalooza.inventory";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedGame {
    pub game: GameSnapshot,
    pub inventory: Inventory,
}

#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStorePort: Send + Sync {
    fn save(&self, state: &PersistedGame) -> Result<(), StorageError>;

    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<PersistedGame>, StorageError>;

    fn clear(&self) -> Result<(), StorageError>;
}
