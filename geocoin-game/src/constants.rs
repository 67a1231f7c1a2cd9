//! Centralized tuning constants for the Geocoin world.
//!
//! These values define the deterministic world math. Keeping them together
//! ensures the world can only change through reviewed code changes, not
//! external assets.

use crate::grid::GeoPosition;

// World geometry ----------------------------------------------------------
/// South-west corner of cell (0, 0): the classroom origin of the original
/// playfield.
pub const DEFAULT_ORIGIN: GeoPosition = GeoPosition::new(36.989_493_795_784_01, -122.062_771_285_485_04);
/// Angular size of one cell on both axes.
pub const TILE_DEGREES: f64 = 1e-4;

// World economy -----------------------------------------------------------
/// Probability threshold for the per-cell spawn draw.
pub const CACHE_SPAWN_PROBABILITY: f64 = 0.1;
/// Initial coin value is `floor(draw * VALUE_SCALE)`.
pub const VALUE_SCALE: f64 = 100.0;
/// Coins minted when a cache first spawns.
pub const INITIAL_COIN_COUNT: u32 = 1;
/// Cells materialized in each direction around the player.
pub const NEIGHBORHOOD_RADIUS: i32 = 8;

// Persistence -------------------------------------------------------------
/// Key under which the snapshot is stored in the key-value collaborator.
pub const SAVE_KEY: &str = "geocoin.save.v1";

// Event log keys ----------------------------------------------------------
pub(crate) const LOG_MOVED: &str = "log.moved";
pub(crate) const LOG_COLLECTED: &str = "log.collected";
pub(crate) const LOG_DEPOSITED: &str = "log.deposited";
pub(crate) const LOG_RESET: &str = "log.reset";
pub(crate) const LOG_RESTORED: &str = "log.restored";
pub(crate) const LOG_SNAPSHOT_CORRUPT: &str = "log.snapshot.corrupt";
pub(crate) const LOG_STORAGE_DEGRADED: &str = "log.storage.degraded";
/// Bounded length of the session event log.
pub(crate) const EVENT_LOG_CAP: usize = 64;
