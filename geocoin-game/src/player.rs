//! Player session state: position plus the held coin set.

use serde::{Deserialize, Serialize};

use crate::coin::{Coin, CoinId};
use crate::grid::{Cell, GeoPosition, GridConfig};

/// The single player of a session.
///
/// Mutated only by movement and by the ledger transfer operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: GeoPosition,
    /// Coins currently held, in collection order.
    #[serde(default)]
    pub held: Vec<Coin>,
}

impl Player {
    /// A fresh player standing at `position` holding nothing.
    #[must_use]
    pub const fn at(position: GeoPosition) -> Self {
        Self {
            position,
            held: Vec::new(),
        }
    }

    /// Shift position by whole-cell deltas. `di` moves north, `dj` east.
    pub fn move_by(&mut self, di: i32, dj: i32, grid: &GridConfig) {
        self.position.lat += f64::from(di) * grid.tile_degrees;
        self.position.lng += f64::from(dj) * grid.tile_degrees;
    }

    /// The cell the player currently occupies.
    #[must_use]
    pub fn current_cell(&self, grid: &GridConfig) -> Cell {
        grid.position_to_cell(self.position)
    }

    /// Sum of held coin values, for display.
    #[must_use]
    pub fn total_value(&self) -> u64 {
        self.held.iter().map(|c| u64::from(c.value)).sum()
    }

    #[must_use]
    pub fn holds(&self, coin: CoinId) -> bool {
        self.held.iter().any(|c| c.id == coin)
    }
}
