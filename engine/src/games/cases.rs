//! Case openings: up to four parallel spins against one container.

use moonplay_types::{
    CasesPhase, CasesState, Container, EngineError, RevealTiming, MAX_PARALLEL_OPENINGS,
};

use super::{Settlement, StepPlan};
use crate::rng::GameRng;
use crate::scheduler::StepKind;
use crate::selector;

/// Draw every winner up front and schedule a single reveal for all
/// parallel spins.
pub fn stake(
    rng: &mut GameRng,
    container: &Container,
    count: u8,
    timing: &RevealTiming,
) -> Result<(CasesState, StepPlan), EngineError> {
    if count == 0 || count > MAX_PARALLEL_OPENINGS {
        return Err(EngineError::InvalidStake);
    }
    container.validate()?;
    let mut winners = Vec::with_capacity(count as usize);
    for _ in 0..count {
        winners.push(selector::select(rng, container)?.id);
    }
    let state = CasesState {
        container: container.id,
        count,
        winners,
        phase: CasesPhase::Spinning,
    };
    let step = StepPlan {
        delay_ms: timing.spin_ms,
        kind: StepKind::SpinSettle,
    };
    Ok((state, step))
}

/// Fires when the spin completes: credit the summed item values.
pub fn settle(
    state: &mut CasesState,
    container: &Container,
    stake: u64,
) -> Result<Settlement, EngineError> {
    if state.phase != CasesPhase::Spinning {
        return Err(EngineError::InvalidStateTransition);
    }
    state.phase = CasesPhase::Revealed;
    let mut payout = 0u64;
    for id in &state.winners {
        let item = container
            .item(*id)
            .ok_or(EngineError::Configuration("winner not in container"))?;
        payout += item.value;
    }
    let multiplier_x100 = if stake > 0 {
        (payout as u128 * 100 / stake as u128) as u64
    } else {
        0
    };
    Ok(Settlement {
        payout,
        multiplier_x100,
        items: state.winners.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ServerSeed;
    use moonplay_types::{OutcomeItem, Rarity};

    fn container() -> Container {
        Container {
            id: 3,
            name: "Duotone".to_string(),
            price: 100,
            items: vec![
                OutcomeItem {
                    id: 1,
                    name: "Low".to_string(),
                    value: 50,
                    weight: 40,
                    rarity: Rarity::Common,
                },
                OutcomeItem {
                    id: 2,
                    name: "High".to_string(),
                    value: 15,
                    weight: 60,
                    rarity: Rarity::Common,
                },
            ],
        }
    }

    #[test]
    fn test_winners_drawn_at_stake() {
        let seed = ServerSeed::derive(b"cases");
        let mut rng = GameRng::new(&seed, 1, 0);
        let container = container();
        let (state, step) = stake(&mut rng, &container, 3, &RevealTiming::default()).unwrap();
        assert_eq!(state.winners.len(), 3);
        assert_eq!(step.delay_ms, 3_600);
        assert!(state.winners.iter().all(|&w| w == 1 || w == 2));
    }

    #[test]
    fn test_settle_sums_item_values() {
        let seed = ServerSeed::derive(b"cases");
        let mut rng = GameRng::new(&seed, 2, 0);
        let container = container();
        let (mut state, _) = stake(&mut rng, &container, 4, &RevealTiming::default()).unwrap();
        let settlement = settle(&mut state, &container, 400).unwrap();
        let expected: u64 = state
            .winners
            .iter()
            .map(|&w| container.item(w).unwrap().value)
            .sum();
        assert_eq!(settlement.payout, expected);
        assert_eq!(settlement.items, state.winners);
        assert_eq!(state.phase, CasesPhase::Revealed);
        // Settle is one-shot
        assert!(settle(&mut state, &container, 400).is_err());
    }

    #[test]
    fn test_count_bounds() {
        let seed = ServerSeed::derive(b"cases");
        let mut rng = GameRng::new(&seed, 3, 0);
        let container = container();
        assert!(stake(&mut rng, &container, 0, &RevealTiming::default()).is_err());
        assert!(stake(&mut rng, &container, 5, &RevealTiming::default()).is_err());
    }

    #[test]
    fn test_weight_convergence_on_drop_rates() {
        // 40/60 weights over 100k single openings
        let seed = ServerSeed::derive(b"drops");
        let container = container();
        let mut low = 0u64;
        let trials = 100_000u64;
        for round_id in 0..trials {
            let mut rng = GameRng::new(&seed, round_id, 0);
            let (state, _) = stake(&mut rng, &container, 1, &RevealTiming::immediate()).unwrap();
            if state.winners[0] == 1 {
                low += 1;
            }
        }
        assert!((39_500..=40_500).contains(&low), "low drops {}", low);
    }
}
