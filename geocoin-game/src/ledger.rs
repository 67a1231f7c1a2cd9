//! Coin ledger: the only code allowed to move coins between containers.
//!
//! A coin is held by exactly one container at a time, a cache inventory or
//! the player's held set. Transfers move whole coins by identity and never
//! touch their values, so total system value is conserved by construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheRegistry;
use crate::coin::{Coin, CoinId};
use crate::grid::Cell;
use crate::player::Player;

/// Which coins to take from a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinPick {
    /// The first coin in inventory order.
    First,
    /// The coin with this mint serial, wherever it was minted.
    Serial(u32),
    /// Every coin in the cache.
    All,
}

/// Recoverable transfer failures. State is unchanged when these fire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("cache at {cell} has no coins")]
    EmptyCache { cell: Cell },
    #[error("player does not hold coin {coin}")]
    NotHeld { coin: CoinId },
    #[error("no cache exists at {cell}")]
    UnknownCache { cell: Cell },
}

/// Move coins from the cache at `cell` into the player's held set.
///
/// # Errors
///
/// `UnknownCache` if the cell has no spawned cache, `EmptyCache` if its
/// inventory is empty or the picked serial is absent.
pub fn collect(
    registry: &mut CacheRegistry,
    player: &mut Player,
    cell: Cell,
    pick: CoinPick,
) -> Result<Vec<Coin>, LedgerError> {
    let cache = registry
        .cache_mut(cell)
        .ok_or(LedgerError::UnknownCache { cell })?;
    if cache.is_empty() {
        return Err(LedgerError::EmptyCache { cell });
    }
    let taken: Vec<Coin> = match pick {
        CoinPick::First => vec![cache.coins.remove(0)],
        CoinPick::Serial(serial) => {
            let index = cache
                .coins
                .iter()
                .position(|c| c.id.serial == serial)
                .ok_or(LedgerError::EmptyCache { cell })?;
            vec![cache.coins.remove(index)]
        }
        CoinPick::All => cache.coins.drain(..).collect(),
    };
    player.held.extend(taken.iter().copied());
    Ok(taken)
}

/// Move one held coin, by identity, into the cache at `cell`.
///
/// # Errors
///
/// `NotHeld` if the player does not hold the coin, `UnknownCache` if the
/// cell has no spawned cache.
pub fn deposit(
    registry: &mut CacheRegistry,
    player: &mut Player,
    cell: Cell,
    coin: CoinId,
) -> Result<(), LedgerError> {
    let index = player
        .held
        .iter()
        .position(|c| c.id == coin)
        .ok_or(LedgerError::NotHeld { coin })?;
    let cache = registry
        .cache_mut(cell)
        .ok_or(LedgerError::UnknownCache { cell })?;
    let coin = player.held.remove(index);
    cache.coins.push(coin);
    Ok(())
}
