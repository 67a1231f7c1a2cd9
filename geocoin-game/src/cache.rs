//! Cache registry: lazy, memoized world materialization.
//!
//! The grid is unbounded, so caches come into existence the first time
//! their cell is evaluated, never eagerly. The registry remembers the
//! outcome of every evaluation, including "no cache here", so a spawn
//! decision is drawn at most once per cell for the life of the world.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::coin::{Coin, CoinId};
use crate::constants;
use crate::grid::Cell;
use crate::luck::{initial_value_key, luck, spawn_key};

/// Coins a cache holds. Inline capacity covers the common case of a cache
/// holding its single minted coin plus a few deposits.
pub type CoinVec = SmallVec<[Coin; 4]>;

/// World economy tuning. All draws are deterministic per cell; this only
/// sets thresholds and scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// A cell spawns a cache when its spawn draw is below this threshold.
    pub spawn_probability: f64,
    /// Initial coin value is `floor(draw * value_scale)`.
    pub value_scale: f64,
    /// Coins minted when a cache spawns.
    pub initial_coin_count: u32,
    /// Cells materialized in each direction around the player.
    pub neighborhood_radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            spawn_probability: constants::CACHE_SPAWN_PROBABILITY,
            value_scale: constants::VALUE_SCALE,
            initial_coin_count: constants::INITIAL_COIN_COUNT,
            neighborhood_radius: constants::NEIGHBORHOOD_RADIUS,
        }
    }
}

/// A materialized cache: the coins currently sitting at one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cache {
    pub cell: Cell,
    pub coins: CoinVec,
}

impl Cache {
    /// Sum of the values of the coins currently in this cache.
    #[must_use]
    pub fn total_value(&self) -> u64 {
        self.coins.iter().map(|c| u64::from(c.value)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

/// Outcome of evaluating a cell, memoized forever.
///
/// `Barren` records that the spawn draw already ran and said no; callers
/// must be able to tell that apart from "never evaluated".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CacheSlot {
    Spawned(Cache),
    Barren,
}

impl CacheSlot {
    #[must_use]
    pub const fn as_cache(&self) -> Option<&Cache> {
        match self {
            Self::Spawned(cache) => Some(cache),
            Self::Barren => None,
        }
    }
}

/// Lazily materialized map from cells to their evaluated state.
///
/// Inventories are only ever mutated through the ledger operations in
/// [`crate::ledger`]; nothing else may add or remove coins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheRegistry {
    world: WorldConfig,
    slots: HashMap<Cell, CacheSlot>,
    /// Materialization order, for deterministic iteration within a session.
    order: Vec<Cell>,
    /// Total value ever created at materialization time. The conservation
    /// invariant compares against this.
    minted: u64,
}

impl CacheRegistry {
    #[must_use]
    pub fn new(world: WorldConfig) -> Self {
        Self {
            world,
            slots: HashMap::new(),
            order: Vec::new(),
            minted: 0,
        }
    }

    #[must_use]
    pub const fn world(&self) -> &WorldConfig {
        &self.world
    }

    /// Evaluate a cell, drawing its spawn decision and minting its initial
    /// inventory on first sight. Idempotent: later calls return the
    /// memoized slot untouched.
    pub fn materialize(&mut self, cell: Cell) -> &CacheSlot {
        if !self.slots.contains_key(&cell) {
            let slot = self.evaluate(cell);
            if let CacheSlot::Spawned(cache) = &slot {
                self.minted += cache.total_value();
            }
            self.slots.insert(cell, slot);
            self.order.push(cell);
        }
        &self.slots[&cell]
    }

    /// Evaluate every cell within the configured radius of `center`.
    pub fn materialize_neighborhood(&mut self, center: Cell) {
        let r = self.world.neighborhood_radius;
        for di in -r..=r {
            for dj in -r..=r {
                self.materialize(center.offset(di, dj));
            }
        }
    }

    /// Read a spawned cache without triggering materialization.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<&Cache> {
        self.slots.get(&cell).and_then(CacheSlot::as_cache)
    }

    /// The memoized evaluation for a cell, if any.
    #[must_use]
    pub fn slot(&self, cell: Cell) -> Option<&CacheSlot> {
        self.slots.get(&cell)
    }

    /// Spawned caches in materialization order. Callers that persist this
    /// sequence sort by cell key first; materialization order depends on
    /// visitation order.
    pub fn active_caches(&self) -> impl Iterator<Item = &Cache> {
        self.order.iter().filter_map(|cell| self.get(*cell))
    }

    /// Cells evaluated as barren, in materialization order.
    pub fn barren_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|cell| matches!(self.slots.get(cell), Some(CacheSlot::Barren)))
    }

    /// Total value ever minted by materialization.
    #[must_use]
    pub const fn minted_value(&self) -> u64 {
        self.minted
    }

    /// Sum of the values of all coins currently in caches.
    #[must_use]
    pub fn cached_value(&self) -> u64 {
        self.active_caches().map(Cache::total_value).sum()
    }

    fn evaluate(&self, cell: Cell) -> CacheSlot {
        if luck(&spawn_key(cell)) >= self.world.spawn_probability {
            return CacheSlot::Barren;
        }
        let mut coins = CoinVec::new();
        for serial in 0..self.world.initial_coin_count {
            let value = self.initial_value(cell, serial);
            coins.push(Coin::new(CoinId::new(cell, serial), value));
        }
        CacheSlot::Spawned(Cache { cell, coins })
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn initial_value(&self, cell: Cell, serial: u32) -> u32 {
        let key = if serial == 0 {
            initial_value_key(cell)
        } else {
            // Additional mints get their own domain-separated draw.
            format!("{},{},initialValue#{serial}", cell.i, cell.j)
        };
        (luck(&key) * self.world.value_scale).floor() as u32
    }

    pub(crate) fn restore_slot(&mut self, cell: Cell, slot: CacheSlot) {
        if let CacheSlot::Spawned(cache) = &slot {
            self.minted += cache.total_value();
        }
        if self.slots.insert(cell, slot).is_none() {
            self.order.push(cell);
        }
    }

    /// Used by restore to account for value held by the player.
    pub(crate) fn credit_minted(&mut self, value: u64) {
        self.minted += value;
    }

    pub(crate) fn cache_mut(&mut self, cell: Cell) -> Option<&mut Cache> {
        match self.slots.get_mut(&cell) {
            Some(CacheSlot::Spawned(cache)) => Some(cache),
            _ => None,
        }
    }
}
