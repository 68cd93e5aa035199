//! Multiplier math for all games.
//!
//! Multipliers are integer hundredths throughout (195 = 1.95x), and
//! every builder floors toward the house, so the same configuration
//! always yields byte-identical tables.

use std::collections::HashMap;

use moonplay_types::{
    CrashConfig, EngineError, MINES_GRID_SIZE, ONE_MINE_TABLE_X100, THREE_MINES_FIRST_REVEAL_X100,
    TWO_MINES_FIRST_REVEAL_X100,
};

/// Coin flip payout multiplier: 2x fair, reduced by the house edge.
pub fn coin_flip_multiplier_x100(house_edge_bps: u16) -> u64 {
    200 * (10_000 - house_edge_bps as u64) / 10_000
}

/// Memoized cash-out multiplier tables for mines.
///
/// `table(grid, mines)[k]` is the multiplier after `k + 1` safe
/// reveals. Tables for a given key are built once and reused; rebuilds
/// from the same configuration are identical.
pub struct MinesTables {
    house_edge_bps: u16,
    cache: HashMap<(u8, u8), Vec<u64>>,
}

impl MinesTables {
    pub fn new(house_edge_bps: u16) -> Self {
        Self {
            house_edge_bps,
            cache: HashMap::new(),
        }
    }

    pub fn table(&mut self, grid_size: u8, mine_count: u8) -> Result<&[u64], EngineError> {
        if mine_count == 0 || mine_count >= grid_size {
            return Err(EngineError::Configuration(
                "mine count must leave at least one safe tile",
            ));
        }
        let edge = self.house_edge_bps;
        let table = self
            .cache
            .entry((grid_size, mine_count))
            .or_insert_with(|| build_table(grid_size, mine_count, edge));
        Ok(table)
    }

    /// Pre-build every table for a grid so the first stake of each
    /// mine count pays no build cost.
    pub fn warm(&mut self, grid_size: u8) {
        let edge = self.house_edge_bps;
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let built: Vec<((u8, u8), Vec<u64>)> = (1u16..grid_size as u16)
                .into_par_iter()
                .map(|m| {
                    let m = m as u8;
                    ((grid_size, m), build_table(grid_size, m, edge))
                })
                .collect();
            self.cache.extend(built);
        }
        #[cfg(not(feature = "parallel"))]
        for mine_count in 1..grid_size {
            self.cache
                .entry((grid_size, mine_count))
                .or_insert_with(|| build_table(grid_size, mine_count, edge));
        }
    }
}

/// Fair odds of surviving `reveals` picks, scaled by the edge factor.
fn fair_multiplier_x100(grid_size: u8, mine_count: u8, reveals: u8, house_edge_bps: u16) -> u64 {
    let safe = (grid_size - mine_count) as f64;
    let grid = grid_size as f64;
    let mut survive = 1.0f64;
    for i in 0..reveals {
        survive *= (safe - i as f64) / (grid - i as f64);
    }
    let edge = (10_000 - house_edge_bps) as f64 / 10_000.0;
    let multiplier = (1.0 / survive) * edge;
    (multiplier * 100.0).floor() as u64
}

fn build_table(grid_size: u8, mine_count: u8, house_edge_bps: u16) -> Vec<u64> {
    let safe = grid_size - mine_count;
    let mut table: Vec<u64> = (1..=safe)
        .map(|k| fair_multiplier_x100(grid_size, mine_count, k, house_edge_bps))
        .collect();
    // Hand-tuned early entries for the standard grid, carried over from
    // the tuned payout schedule. The single-mine table trades a deeper
    // early discount for steeper growth; two and three mines pin the
    // first reveal just under and exactly at break-even.
    if grid_size == MINES_GRID_SIZE {
        match mine_count {
            1 => {
                for (slot, tuned) in table.iter_mut().zip(ONE_MINE_TABLE_X100) {
                    *slot = tuned;
                }
            }
            2 => table[0] = TWO_MINES_FIRST_REVEAL_X100,
            3 => table[0] = THREE_MINES_FIRST_REVEAL_X100,
            _ => {}
        }
    }
    table
}

/// Live crash multiplier at `elapsed_ms` into the round, in hundredths.
///
/// The curve is linear-plus-exponential in seconds:
/// `m(t) = 1 + 0.1t + (1.08^t - 1)`. Monotonically increasing, so the
/// crash instant can be solved by bisection.
pub fn crash_multiplier_x100(elapsed_ms: u64, cfg: &CrashConfig) -> u64 {
    let t = elapsed_ms as f64 / 1_000.0;
    let m = 1.0 + 0.1 * t + (1.08f64.powf(t) - 1.0);
    let x100 = (m * 100.0).floor() as u64;
    x100.min(cfg.max_multiplier_x100)
}

/// Draw a bust point from the crash distribution, in hundredths.
///
/// A small slice of rounds busts inside the instant band just above
/// 1.00x; the rest follow a heavy-tailed 1/(1-r) law with jitter,
/// capped at the configured maximum.
pub fn sample_bust_x100(r: f64, jitter: f64, cfg: &CrashConfig) -> u64 {
    let instant = cfg.instant_bust_bps as f64 / 10_000.0;
    if r < instant {
        // Remap r into [0, 1) over the instant band
        let band = (r / instant) * cfg.instant_band_x100 as f64;
        return 100 + band.floor() as u64;
    }
    let base = (1.0 / (1.0 - r)).min(1_000.0);
    let m = base * (0.95 + 0.1 * jitter);
    let x100 = (m * 100.0).floor() as u64;
    x100.clamp(100, cfg.max_multiplier_x100)
}

/// Smallest elapsed time (ms) at which the live curve reaches the bust
/// point. Bisects over milliseconds; the curve is monotonic.
pub fn crash_elapsed_ms(bust_x100: u64, cfg: &CrashConfig) -> u64 {
    if crash_multiplier_x100(0, cfg) >= bust_x100 {
        return 0;
    }
    let mut hi = 1_000u64;
    while crash_multiplier_x100(hi, cfg) < bust_x100 {
        hi *= 2;
    }
    let mut lo = 0u64;
    while lo + 1 < hi {
        let mid = lo + (hi - lo) / 2;
        if crash_multiplier_x100(mid, cfg) >= bust_x100 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi
}
