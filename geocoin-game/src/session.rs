//! Game session: the single surface a driver (UI, script, test harness)
//! talks to.
//!
//! The session owns the registry and the player, executes user intents as
//! discrete synchronous commands, and persists a snapshot after every
//! mutation. Storage trouble never aborts a mutation; the session degrades
//! to in-memory play and records the fact once.

use std::collections::VecDeque;

use crate::cache::{CacheRegistry, WorldConfig};
use crate::coin::{Coin, CoinId};
use crate::constants::{
    EVENT_LOG_CAP, LOG_COLLECTED, LOG_DEPOSITED, LOG_MOVED, LOG_RESET, LOG_RESTORED,
    LOG_SNAPSHOT_CORRUPT, LOG_STORAGE_DEGRADED, SAVE_KEY,
};
use crate::grid::{Cell, GeoBounds, GeoPosition, GridConfig};
use crate::ledger::{self, CoinPick, LedgerError};
use crate::player::Player;
use crate::snapshot::{
    SnapshotError, StateStorage, Snapshot, clear_snapshot, load_snapshot, save_snapshot,
};

/// A user intent, as routed by whatever drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Shift the player by whole-cell deltas.
    Move { di: i32, dj: i32 },
    /// Take coins from the cache at `cell`.
    Collect { cell: Cell, pick: CoinPick },
    /// Return a held coin to the cache at `cell`.
    Deposit { cell: Cell, coin: CoinId },
    /// Wipe the save and regenerate the world from its deterministic draws.
    Reset,
}

/// What a successful command did, for the driver to project.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Moved { position: GeoPosition, cell: Cell },
    Collected { coins: Vec<Coin>, held_total: u64 },
    Deposited { cell: Cell, coin: CoinId },
    WorldReset,
}

/// One game in progress, bound to a storage collaborator.
pub struct GameSession<S: StateStorage> {
    grid: GridConfig,
    registry: CacheRegistry,
    player: Player,
    storage: S,
    degraded: bool,
    events: VecDeque<&'static str>,
}

impl<S: StateStorage> GameSession<S> {
    /// Start a session with default grid and world tuning.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, GridConfig::default(), WorldConfig::default())
    }

    /// Start a session, restoring a prior snapshot when one is present.
    ///
    /// Missing or corrupt saves fall back to the default initial state:
    /// player at the origin cell's center, empty registry. Unreadable
    /// storage additionally degrades the session to in-memory play.
    pub fn with_config(storage: S, grid: GridConfig, world: WorldConfig) -> Self {
        let mut session = Self {
            grid,
            registry: CacheRegistry::new(world),
            player: Player::at(grid.cell_center(Cell::new(0, 0))),
            storage,
            degraded: false,
            events: VecDeque::new(),
        };
        match load_snapshot(&session.storage, SAVE_KEY) {
            Ok(Some(snapshot)) => {
                let (player, registry) = snapshot.restore(world);
                session.player = player;
                session.registry = registry;
                session.push_event(LOG_RESTORED);
            }
            Ok(None) => {}
            Err(SnapshotError::CorruptSnapshot(_)) => {
                session.push_event(LOG_SNAPSHOT_CORRUPT);
            }
            Err(SnapshotError::StorageUnavailable(_)) => {
                session.degraded = true;
                session.push_event(LOG_STORAGE_DEGRADED);
            }
        }
        let here = session.player.current_cell(&session.grid);
        session.registry.materialize_neighborhood(here);
        session.save_state();
        session
    }

    /// Execute one command. On error the game state is unchanged; on
    /// success the mutation has already been persisted (or the session has
    /// degraded and remembers so).
    ///
    /// # Errors
    ///
    /// Propagates [`LedgerError`] from collect/deposit. Movement and reset
    /// cannot fail.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, LedgerError> {
        let outcome = match command {
            Command::Move { di, dj } => {
                self.player.move_by(di, dj, &self.grid);
                let cell = self.player.current_cell(&self.grid);
                self.registry.materialize_neighborhood(cell);
                self.push_event(LOG_MOVED);
                Outcome::Moved {
                    position: self.player.position,
                    cell,
                }
            }
            Command::Collect { cell, pick } => {
                let coins = ledger::collect(&mut self.registry, &mut self.player, cell, pick)?;
                self.push_event(LOG_COLLECTED);
                Outcome::Collected {
                    coins,
                    held_total: self.player.total_value(),
                }
            }
            Command::Deposit { cell, coin } => {
                ledger::deposit(&mut self.registry, &mut self.player, cell, coin)?;
                self.push_event(LOG_DEPOSITED);
                Outcome::Deposited { cell, coin }
            }
            Command::Reset => {
                self.reset_world();
                Outcome::WorldReset
            }
        };
        self.save_state();
        Ok(outcome)
    }

    fn reset_world(&mut self) {
        if !self.degraded && clear_snapshot(&mut self.storage, SAVE_KEY).is_err() {
            self.degraded = true;
            self.push_event(LOG_STORAGE_DEGRADED);
        }
        self.player = Player::at(self.grid.cell_center(Cell::new(0, 0)));
        self.registry = CacheRegistry::new(*self.registry.world());
        self.registry.materialize_neighborhood(Cell::new(0, 0));
        self.push_event(LOG_RESET);
    }

    fn save_state(&mut self) {
        if self.degraded {
            return;
        }
        let snapshot = Snapshot::capture(&self.player, &self.registry);
        if save_snapshot(&mut self.storage, SAVE_KEY, &snapshot).is_err() {
            self.degraded = true;
            self.push_event(LOG_STORAGE_DEGRADED);
        }
    }

    fn push_event(&mut self, event: &'static str) {
        if self.events.len() == EVENT_LOG_CAP {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    // Read surface ---------------------------------------------------------

    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub const fn registry(&self) -> &CacheRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Rectangle to draw for a cell, present only when a cache spawned
    /// there. This is all a renderer may know about a cache's geometry.
    #[must_use]
    pub fn cache_bounds(&self, cell: Cell) -> Option<GeoBounds> {
        self.registry
            .get(cell)
            .map(|cache| self.grid.cell_to_bounds(cache.cell))
    }

    /// Marker position for the player.
    #[must_use]
    pub const fn player_marker(&self) -> GeoPosition {
        self.player.position
    }

    /// Status panel text, singular/plural aware.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.player.total_value() {
            0 => "You have 0 points".to_string(),
            1 => "You have 1 point. Collect more around the map and deposit them too!".to_string(),
            n => {
                format!("You have {n} points. Collect more around the map and deposit them too!")
            }
        }
    }

    /// Recent event keys, oldest first. Bounded.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.events.iter().copied()
    }

    /// True once the session has fallen back to in-memory-only state.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Check the global conservation invariant: coins in caches plus coins
    /// held equal everything ever minted.
    #[must_use]
    pub fn conservation_holds(&self) -> bool {
        self.registry.cached_value() + self.player.total_value() == self.registry.minted_value()
    }
}
