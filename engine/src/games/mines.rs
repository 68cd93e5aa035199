//! Mines: reveal safe tiles on a grid, cash out before hitting a mine.

use moonplay_types::{EngineError, MinesPhase, MinesState};

use super::Settlement;
use crate::ledger::payout_for;
use crate::odds::MinesTables;
use crate::rng::GameRng;

/// Outcome of a single tile reveal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Safe tile; the round continues at the given cash-out value.
    Safe { cash_out_x100: u64 },
    /// Hit a mine; the stake is lost.
    Busted(Settlement),
    /// Cleared every safe tile; forced cash-out at the table maximum.
    Cleared(Settlement),
}

/// Place all mines before the first reveal.
pub fn stake(
    rng: &mut GameRng,
    mine_count: u8,
    grid_size: u8,
    tables: &mut MinesTables,
) -> Result<MinesState, EngineError> {
    // Validates the count as a side effect
    tables.table(grid_size, mine_count)?;
    let mut tiles: Vec<u8> = (0..grid_size).collect();
    rng.shuffle(&mut tiles);
    let mut mines: Vec<u8> = tiles.into_iter().take(mine_count as usize).collect();
    mines.sort_unstable();
    Ok(MinesState {
        mine_count,
        mines,
        revealed: Vec::new(),
        phase: MinesPhase::Active,
    })
}

/// Reveal one tile. Busts settle immediately; clearing the last safe
/// tile forces the maximum cash-out.
pub fn reveal(
    state: &mut MinesState,
    tile: u8,
    grid_size: u8,
    stake: u64,
    tables: &mut MinesTables,
) -> Result<RevealOutcome, EngineError> {
    if state.phase != MinesPhase::Active {
        return Err(EngineError::InvalidStateTransition);
    }
    if tile >= grid_size || state.is_revealed(tile) {
        return Err(EngineError::InvalidStateTransition);
    }
    if state.is_mine(tile) {
        state.phase = MinesPhase::Busted;
        return Ok(RevealOutcome::Busted(Settlement::loss()));
    }
    state.revealed.push(tile);
    let table = tables.table(grid_size, state.mine_count)?;
    let multiplier = table[state.revealed.len() - 1];
    let safe = (grid_size - state.mine_count) as usize;
    if state.revealed.len() == safe {
        state.phase = MinesPhase::CashedOut;
        return Ok(RevealOutcome::Cleared(Settlement::win(
            payout_for(stake, multiplier),
            multiplier,
        )));
    }
    Ok(RevealOutcome::Safe {
        cash_out_x100: multiplier,
    })
}

/// Bank the current multiplier. Requires at least one revealed tile.
pub fn cash_out(
    state: &mut MinesState,
    grid_size: u8,
    stake: u64,
    tables: &mut MinesTables,
) -> Result<Settlement, EngineError> {
    if state.phase != MinesPhase::Active || state.revealed.is_empty() {
        return Err(EngineError::InvalidStateTransition);
    }
    let table = tables.table(grid_size, state.mine_count)?;
    let multiplier = table[state.revealed.len() - 1];
    state.phase = MinesPhase::CashedOut;
    Ok(Settlement::win(payout_for(stake, multiplier), multiplier))
}
