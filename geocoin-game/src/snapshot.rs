//! Game state store: snapshot format and the persistence seam.
//!
//! The snapshot is the only serialized form of the world. It records the
//! player (position and held coins) and every evaluated cell, barren cells
//! included. Persisting barren cells matters: restore must never re-run
//! the spawn draw for a cell that was already evaluated, otherwise a
//! player-caused transfer would be silently overwritten by a fresh mint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{Cache, CacheRegistry, CacheSlot, WorldConfig};
use crate::coin::Coin;
use crate::grid::Cell;
use crate::player::Player;

/// Key-value persistence collaborator. The game state store is the only
/// component that talks to it.
pub trait StateStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the string stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove the value under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory storage. Backs tests and the degraded mode a session falls
/// into when its real storage stops accepting writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: std::collections::HashMap<String, String>,
}

impl StateStorage for MemoryStorage {
    type Error = std::convert::Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Persistence failures. Both are recoverable: callers fall back to the
/// default initial state or degrade to in-memory play.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(#[from] serde_json::Error),
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// One evaluated cell in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub cell: Cell,
    /// True when the cell was evaluated and did not spawn.
    #[serde(default, skip_serializing_if = "is_false")]
    pub barren: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coins: Vec<Coin>,
}

/// Serializable aggregate of the whole game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: Player,
    /// Evaluated cells sorted by cell index, so equal states produce
    /// byte-equal snapshots regardless of visitation order.
    pub caches: Vec<CacheEntry>,
}

impl Snapshot {
    /// Capture the current world. Pure read; ordering is normalized.
    #[must_use]
    pub fn capture(player: &Player, registry: &CacheRegistry) -> Self {
        let mut caches: Vec<CacheEntry> = registry
            .active_caches()
            .map(|cache| CacheEntry {
                cell: cache.cell,
                barren: false,
                coins: cache.coins.to_vec(),
            })
            .chain(registry.barren_cells().map(|cell| CacheEntry {
                cell,
                barren: true,
                coins: Vec::new(),
            }))
            .collect();
        caches.sort_by_key(|entry| entry.cell);
        Self {
            player: player.clone(),
            caches,
        }
    }

    /// Rebuild the world a snapshot describes.
    ///
    /// Every recorded cell is restored verbatim, spawn draws are not re-run,
    /// and the minted total is re-derived from the restored coins so the
    /// conservation audit keeps holding across sessions.
    #[must_use]
    pub fn restore(&self, world: WorldConfig) -> (Player, CacheRegistry) {
        let mut registry = CacheRegistry::new(world);
        for entry in &self.caches {
            let slot = if entry.barren {
                CacheSlot::Barren
            } else {
                CacheSlot::Spawned(Cache {
                    cell: entry.cell,
                    coins: entry.coins.iter().copied().collect(),
                })
            };
            registry.restore_slot(entry.cell, slot);
        }
        let player = self.player.clone();
        registry.credit_minted(player.total_value());
        (player, registry)
    }

    /// Encode to the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns `CorruptSnapshot` if encoding fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns `CorruptSnapshot` for malformed input.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Write a snapshot under `key`.
///
/// # Errors
///
/// `StorageUnavailable` when the store rejects the write.
pub fn save_snapshot<S: StateStorage>(
    storage: &mut S,
    key: &str,
    snapshot: &Snapshot,
) -> Result<(), SnapshotError> {
    let json = snapshot.to_json()?;
    storage
        .set(key, &json)
        .map_err(|e| SnapshotError::StorageUnavailable(e.to_string()))
}

/// Read the snapshot under `key`. Absent data is `Ok(None)`; corrupt data
/// is an error the caller is expected to treat as absent.
///
/// # Errors
///
/// `StorageUnavailable` when the store cannot be read, `CorruptSnapshot`
/// when the stored string does not decode.
pub fn load_snapshot<S: StateStorage>(
    storage: &S,
    key: &str,
) -> Result<Option<Snapshot>, SnapshotError> {
    let json = storage
        .get(key)
        .map_err(|e| SnapshotError::StorageUnavailable(e.to_string()))?;
    match json {
        Some(json) => Ok(Some(Snapshot::from_json(&json)?)),
        None => Ok(None),
    }
}

/// Delete any snapshot under `key`.
///
/// # Errors
///
/// `StorageUnavailable` when the store rejects the write.
pub fn clear_snapshot<S: StateStorage>(storage: &mut S, key: &str) -> Result<(), SnapshotError> {
    storage
        .remove(key)
        .map_err(|e| SnapshotError::StorageUnavailable(e.to_string()))
}
