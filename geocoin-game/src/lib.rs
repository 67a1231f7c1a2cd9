//! Geocoin Game Engine
//!
//! Platform-agnostic core logic for the Geocoin location-grid collectible
//! game: a deterministic procedural world of coin caches laid over a
//! geographic grid, with persistent, idempotent world and player state.
//! This crate has no UI or platform dependencies; a renderer only reads
//! bounds and positions out and routes user intents back in as commands.

pub mod cache;
pub mod coin;
pub mod constants;
pub mod grid;
pub mod ledger;
pub mod luck;
pub mod player;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use cache::{Cache, CacheRegistry, CacheSlot, CoinVec, WorldConfig};
pub use coin::{Coin, CoinId, CoinIdParseError};
pub use grid::{Cell, CellParseError, GeoBounds, GeoPosition, GridConfig};
pub use ledger::{CoinPick, LedgerError, collect, deposit};
pub use luck::{initial_value_key, luck, spawn_key};
pub use player::Player;
pub use session::{Command, GameSession, Outcome};
pub use snapshot::{
    CacheEntry, MemoryStorage, Snapshot, SnapshotError, StateStorage, clear_snapshot,
    load_snapshot, save_snapshot,
};
