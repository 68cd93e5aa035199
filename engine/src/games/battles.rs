//! Case battles: several participants open the same case list round by
//! round, and the highest-scoring team takes the whole pot of drop
//! value. Ties split the pot evenly across every tied team's members.

use std::collections::BTreeMap;

use moonplay_types::{
    BattleMode, BattleOccupant, BattlePhase, BattleSlot, BattleState, Container, EngineError,
    RevealTiming, BOT_NAMES, MAX_BATTLE_CASES,
};

use super::{Settlement, StepPlan};
use crate::rng::GameRng;
use crate::scheduler::StepKind;

/// Build a lobby with the creator in slot 0. Returns the state and the
/// entry cost (the summed case prices each human participant pays).
pub fn create(
    mode: BattleMode,
    cases: Vec<u16>,
    creator: String,
    containers: &BTreeMap<u16, Container>,
) -> Result<(BattleState, u64), EngineError> {
    if cases.is_empty() || cases.len() > MAX_BATTLE_CASES {
        return Err(EngineError::Configuration("battle case list out of range"));
    }
    let mut cost = 0u64;
    for id in &cases {
        let container = containers.get(id).ok_or(EngineError::UnknownContainer)?;
        container.validate()?;
        cost += container.price;
    }
    let mut slots: Vec<BattleSlot> = mode
        .slot_teams()
        .iter()
        .map(|&team| BattleSlot {
            team,
            occupant: None,
        })
        .collect();
    slots[0].occupant = Some(BattleOccupant {
        name: creator,
        is_bot: false,
        drops: Vec::new(),
        total: 0,
    });
    let state = BattleState {
        mode,
        cases,
        slots,
        round_index: 0,
        winning_team: None,
        phase: BattlePhase::Lobby,
    };
    Ok((state, cost))
}

/// Fill every empty slot with a bot carrying a distinct name.
pub fn fill_bots(state: &mut BattleState, rng: &mut GameRng) -> Result<(), EngineError> {
    if state.phase != BattlePhase::Lobby {
        return Err(EngineError::InvalidStateTransition);
    }
    let mut names: Vec<&str> = BOT_NAMES.to_vec();
    rng.shuffle(&mut names);
    let mut next = names.into_iter();
    for slot in state.slots.iter_mut().filter(|s| s.occupant.is_none()) {
        let name = next
            .next()
            .ok_or(EngineError::Configuration("ran out of bot names"))?;
        slot.occupant = Some(BattleOccupant {
            name: name.to_string(),
            is_bot: true,
            drops: Vec::new(),
            total: 0,
        });
    }
    Ok(())
}

/// Leave the lobby and schedule every battle round plus the final
/// settle. Requires a full roster.
pub fn start(state: &mut BattleState, timing: &RevealTiming) -> Result<Vec<StepPlan>, EngineError> {
    if state.phase != BattlePhase::Lobby || state.open_slots() > 0 {
        return Err(EngineError::InvalidStateTransition);
    }
    state.phase = BattlePhase::Playing;
    let mut steps = Vec::with_capacity(state.cases.len() + 1);
    let mut at = 0u64;
    for _ in 0..state.cases.len() {
        at += timing.battle_spin_ms;
        steps.push(StepPlan {
            delay_ms: at,
            kind: StepKind::BattleRound,
        });
        at += timing.battle_gap_ms;
    }
    steps.push(StepPlan {
        delay_ms: at,
        kind: StepKind::BattleSettle,
    });
    Ok(steps)
}

/// Resolve one battle round: every occupant opens the current case.
pub fn battle_round(
    state: &mut BattleState,
    rng: &mut GameRng,
    containers: &BTreeMap<u16, Container>,
) -> Result<(), EngineError> {
    if state.phase != BattlePhase::Playing
        || state.round_index as usize >= state.cases.len()
    {
        return Err(EngineError::InvalidStateTransition);
    }
    let case = state.cases[state.round_index as usize];
    let container = containers.get(&case).ok_or(EngineError::UnknownContainer)?;
    for slot in &mut state.slots {
        let occupant = slot
            .occupant
            .as_mut()
            .ok_or(EngineError::Configuration("battle slot emptied mid-play"))?;
        let item = crate::selector::select(rng, container)?;
        occupant.drops.push(item.id);
        occupant.total += item.value;
    }
    state.round_index += 1;
    Ok(())
}

/// Award the pot once every round is resolved. The settlement covers
/// the creator's slot; bots keep nothing.
pub fn settle(state: &mut BattleState, stake: u64) -> Result<Settlement, EngineError> {
    if state.phase != BattlePhase::Playing
        || (state.round_index as usize) < state.cases.len()
    {
        return Err(EngineError::InvalidStateTransition);
    }

    let mut team_totals: BTreeMap<u8, u64> = BTreeMap::new();
    let mut pot = 0u64;
    for slot in &state.slots {
        let occupant = slot
            .occupant
            .as_ref()
            .ok_or(EngineError::Configuration("battle slot emptied mid-play"))?;
        *team_totals.entry(slot.team).or_default() += occupant.total;
        pot += occupant.total;
    }
    let best = team_totals
        .values()
        .copied()
        .max()
        .ok_or(EngineError::Configuration("battle has no teams"))?;
    let winners: Vec<u8> = team_totals
        .iter()
        .filter(|(_, total)| **total == best)
        .map(|(team, _)| *team)
        .collect();
    // A tie splits the pot across every tied team's members
    let member_count = state
        .slots
        .iter()
        .filter(|s| winners.contains(&s.team))
        .count() as u64;
    let share = pot / member_count;
    state.winning_team = if winners.len() == 1 {
        Some(winners[0])
    } else {
        None
    };
    state.phase = BattlePhase::Finished;

    let creator = &state.slots[0];
    let payout = if winners.contains(&creator.team) {
        share
    } else {
        0
    };
    let items = creator
        .occupant
        .as_ref()
        .map(|o| o.drops.clone())
        .unwrap_or_default();
    let multiplier_x100 = if stake > 0 {
        (payout as u128 * 100 / stake as u128) as u64
    } else {
        0
    };
    Ok(Settlement {
        payout,
        multiplier_x100,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ServerSeed;
    use moonplay_types::{OutcomeItem, Rarity};

    fn containers() -> BTreeMap<u16, Container> {
        let mut map = BTreeMap::new();
        map.insert(
            1,
            Container {
                id: 1,
                name: "Basic".to_string(),
                price: 100,
                items: vec![
                    OutcomeItem {
                        id: 10,
                        name: "Scrap".to_string(),
                        value: 20,
                        weight: 70,
                        rarity: Rarity::Common,
                    },
                    OutcomeItem {
                        id: 11,
                        name: "Relic".to_string(),
                        value: 400,
                        weight: 30,
                        rarity: Rarity::Rare,
                    },
                ],
            },
        );
        map
    }

    fn play_out(mode: BattleMode, cases: Vec<u16>, round_id: u64) -> (BattleState, Settlement) {
        let containers = containers();
        let (mut state, cost) =
            create(mode, cases.clone(), "Creator".to_string(), &containers).unwrap();
        assert_eq!(cost, 100 * cases.len() as u64);
        let seed = ServerSeed::derive(b"battle");
        let mut rng = GameRng::new(&seed, round_id, 0);
        fill_bots(&mut state, &mut rng).unwrap();
        let steps = start(&mut state, &RevealTiming::default()).unwrap();
        assert_eq!(steps.len(), cases.len() + 1);
        for i in 0..cases.len() {
            let mut rng = GameRng::new(&seed, round_id, (i + 1) as u32);
            battle_round(&mut state, &mut rng, &containers).unwrap();
        }
        let settlement = settle(&mut state, cost).unwrap();
        (state, settlement)
    }

    #[test]
    fn test_lobby_fills_with_distinct_bots() {
        let containers = containers();
        let (mut state, _) = create(
            BattleMode::ThreeVsThree,
            vec![1],
            "Creator".to_string(),
            &containers,
        )
        .unwrap();
        assert_eq!(state.open_slots(), 5);
        let seed = ServerSeed::derive(b"bots");
        let mut rng = GameRng::new(&seed, 0, 0);
        fill_bots(&mut state, &mut rng).unwrap();
        assert_eq!(state.open_slots(), 0);
        let mut names: Vec<String> = state
            .slots
            .iter()
            .filter_map(|s| s.occupant.as_ref())
            .filter(|o| o.is_bot)
            .map(|o| o.name.clone())
            .collect();
        assert_eq!(names.len(), 5);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_start_requires_full_roster() {
        let containers = containers();
        let (mut state, _) = create(
            BattleMode::OneVsOne,
            vec![1],
            "Creator".to_string(),
            &containers,
        )
        .unwrap();
        assert_eq!(
            start(&mut state, &RevealTiming::default()),
            Err(EngineError::InvalidStateTransition)
        );
    }

    #[test]
    fn test_pot_is_conserved() {
        for round_id in 0..20 {
            let (state, settlement) = play_out(BattleMode::OneVsOne, vec![1, 1, 1], round_id);
            let pot: u64 = state
                .slots
                .iter()
                .filter_map(|s| s.occupant.as_ref())
                .map(|o| o.total)
                .sum();
            // Winner takes the whole pot; a tie splits it
            match state.winning_team {
                Some(_) if settlement.payout > 0 => assert_eq!(settlement.payout, pot),
                Some(_) => {}
                None => assert_eq!(settlement.payout, pot / 2),
            }
            assert_eq!(state.phase, BattlePhase::Finished);
            // Every occupant opened every case
            for slot in &state.slots {
                assert_eq!(slot.occupant.as_ref().unwrap().drops.len(), 3);
            }
        }
    }

    #[test]
    fn test_tie_splits_pot() {
        let containers = containers();
        let (mut state, _) = create(
            BattleMode::OneVsOne,
            vec![1],
            "Creator".to_string(),
            &containers,
        )
        .unwrap();
        let seed = ServerSeed::derive(b"tie");
        let mut rng = GameRng::new(&seed, 0, 0);
        fill_bots(&mut state, &mut rng).unwrap();
        start(&mut state, &RevealTiming::default()).unwrap();
        // Force identical drops on both sides
        for slot in &mut state.slots {
            let occupant = slot.occupant.as_mut().unwrap();
            occupant.drops.push(10);
            occupant.total = 20;
        }
        state.round_index = 1;
        let settlement = settle(&mut state, 100).unwrap();
        assert_eq!(settlement.payout, 20);
        assert_eq!(state.winning_team, None);
    }

    #[test]
    fn test_team_modes_pool_totals() {
        let (state, settlement) = play_out(BattleMode::TwoVsTwo, vec![1, 1], 7);
        let mut totals: BTreeMap<u8, u64> = BTreeMap::new();
        for slot in &state.slots {
            *totals.entry(slot.team).or_default() += slot.occupant.as_ref().unwrap().total;
        }
        let pot: u64 = totals.values().sum();
        let best = *totals.values().max().unwrap();
        let creator_team = state.slots[0].team;
        if totals[&creator_team] == best && totals.values().filter(|v| **v == best).count() == 1 {
            // Two members on the winning team split the pot
            assert_eq!(settlement.payout, pot / 2);
        }
    }
}
