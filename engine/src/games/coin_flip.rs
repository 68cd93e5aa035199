//! Coin flip: a single even-odds pick paying just under 2x.

use moonplay_types::{CoinFlipState, CoinSide, EngineError, FlipPhase, RevealTiming};

use super::{Settlement, StepPlan};
use crate::ledger::payout_for;
use crate::odds::coin_flip_multiplier_x100;
use crate::rng::GameRng;
use crate::scheduler::StepKind;

/// Draw the result at stake time and schedule the reveal.
pub fn stake(rng: &mut GameRng, pick: CoinSide, timing: &RevealTiming) -> (CoinFlipState, StepPlan) {
    let result = if rng.next_bounded(2) == 0 {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    };
    let state = CoinFlipState {
        pick,
        result,
        phase: FlipPhase::Flipping,
    };
    let step = StepPlan {
        delay_ms: timing.flip_ms,
        kind: StepKind::FlipSettle,
    };
    (state, step)
}

/// Fires when the flip step comes due: reveal and settle.
pub fn settle(
    state: &mut CoinFlipState,
    stake: u64,
    house_edge_bps: u16,
) -> Result<Settlement, EngineError> {
    if state.phase != FlipPhase::Flipping {
        return Err(EngineError::InvalidStateTransition);
    }
    state.phase = FlipPhase::Settled;
    if state.pick == state.result {
        let multiplier = coin_flip_multiplier_x100(house_edge_bps);
        Ok(Settlement::win(payout_for(stake, multiplier), multiplier))
    } else {
        Ok(Settlement::loss())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ServerSeed;
    use moonplay_types::DEFAULT_HOUSE_EDGE_BPS;

    #[test]
    fn test_win_pays_195() {
        let seed = ServerSeed::derive(b"flip");
        // Find a seed stream where the result matches the pick
        for round_id in 0..16 {
            let mut rng = GameRng::new(&seed, round_id, 0);
            let (mut state, step) = stake(&mut rng, CoinSide::Heads, &RevealTiming::default());
            assert_eq!(step.delay_ms, 2_000);
            let settlement = settle(&mut state, 100, DEFAULT_HOUSE_EDGE_BPS).unwrap();
            if state.result == CoinSide::Heads {
                assert_eq!(settlement.payout, 195);
                assert_eq!(settlement.multiplier_x100, 195);
            } else {
                assert_eq!(settlement.payout, 0);
            }
            assert_eq!(state.phase, FlipPhase::Settled);
        }
    }

    #[test]
    fn test_double_settle_rejected() {
        let seed = ServerSeed::derive(b"flip");
        let mut rng = GameRng::new(&seed, 1, 0);
        let (mut state, _) = stake(&mut rng, CoinSide::Tails, &RevealTiming::immediate());
        settle(&mut state, 100, DEFAULT_HOUSE_EDGE_BPS).unwrap();
        assert_eq!(
            settle(&mut state, 100, DEFAULT_HOUSE_EDGE_BPS),
            Err(EngineError::InvalidStateTransition)
        );
    }

    #[test]
    fn test_results_roughly_even() {
        let seed = ServerSeed::derive(b"fair");
        let mut heads = 0u32;
        for round_id in 0..10_000 {
            let mut rng = GameRng::new(&seed, round_id, 0);
            let (state, _) = stake(&mut rng, CoinSide::Heads, &RevealTiming::immediate());
            if state.result == CoinSide::Heads {
                heads += 1;
            }
        }
        assert!((4_700..=5_300).contains(&heads), "heads {}", heads);
    }
}
