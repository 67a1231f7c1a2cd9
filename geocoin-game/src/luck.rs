//! Deterministic value generator.
//!
//! Every procedural decision in the world (does a cell spawn a cache, how
//! much is its first coin worth) is a pure function of a string key. The
//! same key yields the same value within a session, across save/load, and
//! across processes, so the generator must never mix in runtime entropy.

use twox_hash::XxHash64;

use crate::grid::Cell;

/// Fixed hash seed. Changing this value changes every world ever generated,
/// so it is a compile-time constant rather than configuration.
const LUCK_SEED: u64 = 0x6765_6F63_6F69_6E00; // "geocoin\0"

/// Number of hash bits folded into the mantissa. Low-order bits are
/// discarded to avoid clustering from weak low bits.
const MANTISSA_BITS: u32 = 53;

/// Map an arbitrary key to a value in `[0, 1)`.
///
/// Pure and side-effect free. Distinct purposes must use distinct keys;
/// see [`spawn_key`] and [`initial_value_key`] for the per-cell draws.
#[must_use]
pub fn luck(key: &str) -> f64 {
    let hash = XxHash64::oneshot(LUCK_SEED, key.as_bytes());
    let mantissa = hash >> (64 - MANTISSA_BITS);
    mantissa as f64 / (1u64 << MANTISSA_BITS) as f64
}

/// Key for a cell's spawn decision draw.
#[must_use]
pub fn spawn_key(cell: Cell) -> String {
    format!("{},{},spawn", cell.i, cell.j)
}

/// Key for a cell's initial coin value draw. Deliberately distinct from the
/// spawn key so spawn probability and value are independent draws.
#[must_use]
pub fn initial_value_key(cell: Cell) -> String {
    format!("{},{},initialValue", cell.i, cell.j)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_value() {
        let a = luck("0,0,spawn");
        let b = luck("0,0,spawn");
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn values_stay_in_unit_interval() {
        for i in -50..50 {
            for j in -50..50 {
                let v = luck(&spawn_key(Cell::new(i, j)));
                assert!((0.0..1.0).contains(&v), "luck out of range: {v}");
            }
        }
    }

    #[test]
    fn spawn_and_value_draws_are_independent() {
        let cell = Cell::new(3, -7);
        let spawn = luck(&spawn_key(cell));
        let value = luck(&initial_value_key(cell));
        assert_ne!(spawn.to_bits(), value.to_bits());
    }

    #[test]
    fn distribution_has_no_gross_bias() {
        // Coarse sanity check: over a 64x64 neighborhood roughly a tenth of
        // cells should pass a 0.1 threshold. Allow a wide band.
        let mut hits = 0u32;
        for i in -32..32 {
            for j in -32..32 {
                if luck(&spawn_key(Cell::new(i, j))) < 0.1 {
                    hits += 1;
                }
            }
        }
        let ratio = f64::from(hits) / 4096.0;
        assert!(
            (0.05..0.15).contains(&ratio),
            "spawn ratio {ratio} far from 0.1"
        );
    }
}
