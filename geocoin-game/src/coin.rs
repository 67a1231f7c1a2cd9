//! Coin identity and value.
//!
//! A coin's identity is the cell it was minted in plus a serial unique
//! within that cell. Identity is deterministic by construction; random
//! identifiers would break save/restore and reproducibility.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Cell;

/// Stable composite identity of a coin: `(cell, serial)`.
///
/// Serializes as the string `"i,j#serial"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CoinId {
    /// Cell the coin was minted in. Does not change when the coin moves.
    pub cell: Cell,
    /// Mint index within the cell, starting at 0.
    pub serial: u32,
}

impl CoinId {
    #[must_use]
    pub const fn new(cell: Cell, serial: u32) -> Self {
        Self { cell, serial }
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.cell, self.serial)
    }
}

/// Error for malformed coin identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid coin id {id:?} (expected \"i,j#serial\")")]
pub struct CoinIdParseError {
    pub id: String,
}

impl FromStr for CoinId {
    type Err = CoinIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CoinIdParseError { id: s.to_string() };
        let (cell, serial) = s.split_once('#').ok_or_else(err)?;
        Ok(Self {
            cell: cell.parse().map_err(|_| err())?,
            serial: serial.trim().parse().map_err(|_| err())?,
        })
    }
}

impl From<CoinId> for String {
    fn from(id: CoinId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CoinId {
    type Error = CoinIdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A discrete value-bearing token.
///
/// Value never changes while the coin exists; transfers move the coin
/// whole between containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub id: CoinId,
    pub value: u32,
}

impl Coin {
    #[must_use]
    pub const fn new(id: CoinId, value: u32) -> Self {
        Self { id, value }
    }
}
