//! Grid coordinate mapper.
//!
//! The world is a fixed grid of cells laid over geographic coordinates.
//! A cell is identified by an integer pair `(i, j)`; the mapper converts
//! between cell indices and geographic rectangles using a fixed origin and
//! per-cell angular size. Both directions are pure, and adjacent cells
//! share edges exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPosition {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned geographic rectangle covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// A unit of the grid, identified by integer indices.
///
/// The canonical key is the string `"i,j"`; cells serialize as that key so
/// snapshots stay readable and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Canonical key, e.g. `"3,-7"`.
    #[must_use]
    pub fn key(self) -> String {
        self.to_string()
    }

    /// The cell offset by whole-cell deltas.
    #[must_use]
    pub const fn offset(self, di: i32, dj: i32) -> Self {
        Self {
            i: self.i + di,
            j: self.j + dj,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

/// Error for malformed cell keys.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid cell key {key:?} (expected \"i,j\")")]
pub struct CellParseError {
    pub key: String,
}

impl FromStr for Cell {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CellParseError { key: s.to_string() };
        let (i, j) = s.split_once(',').ok_or_else(err)?;
        Ok(Self {
            i: i.trim().parse().map_err(|_| err())?,
            j: j.trim().parse().map_err(|_| err())?,
        })
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.to_string()
    }
}

impl TryFrom<String> for Cell {
    type Error = CellParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fixed mapping between cells and geography.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// South-west corner of cell (0, 0).
    pub origin: GeoPosition,
    /// Angular size of one cell, in degrees, on both axes.
    pub tile_degrees: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: crate::constants::DEFAULT_ORIGIN,
            tile_degrees: crate::constants::TILE_DEGREES,
        }
    }
}

impl GridConfig {
    /// Bounding rectangle of a cell. `i` grows northward, `j` eastward.
    #[must_use]
    pub fn cell_to_bounds(&self, cell: Cell) -> GeoBounds {
        let south = self.origin.lat + f64::from(cell.i) * self.tile_degrees;
        let west = self.origin.lng + f64::from(cell.j) * self.tile_degrees;
        GeoBounds {
            south,
            west,
            north: south + self.tile_degrees,
            east: west + self.tile_degrees,
        }
    }

    /// Center of a cell, for marker placement.
    #[must_use]
    pub fn cell_center(&self, cell: Cell) -> GeoPosition {
        let bounds = self.cell_to_bounds(cell);
        GeoPosition::new(
            (bounds.south + bounds.north) / 2.0,
            (bounds.west + bounds.east) / 2.0,
        )
    }

    /// The cell containing a position. Floor semantics: a coordinate lying
    /// exactly on a boundary belongs to the cell on the greater side.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn position_to_cell(&self, pos: GeoPosition) -> Cell {
        let i = ((pos.lat - self.origin.lat) / self.tile_degrees).floor() as i32;
        let j = ((pos.lng - self.origin.lng) / self.tile_degrees).floor() as i32;
        Cell::new(i, j)
    }
}
