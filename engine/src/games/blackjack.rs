//! Blackjack: single hand against the dealer, dealt from a shuffled
//! 52-card shoe drawn entirely at stake time.
//!
//! The opening deal and the dealer's turn are paced by scheduled
//! steps, but every card order is fixed when the shoe is shuffled, so
//! the payout is decided the moment the player stands.

use moonplay_types::{
    BlackjackPending, BlackjackPhase, BlackjackState, EngineError, RevealTiming,
    BLACKJACK_BONUS_X100, BLACKJACK_DEALER_STAND, BLACKJACK_PUSH_X100, BLACKJACK_WIN_X100,
};

use super::{Settlement, StepPlan};
use crate::ledger::payout_for;
use crate::rng::GameRng;
use crate::scheduler::StepKind;

/// Best hand total, counting aces as 11 then reducing while bust.
pub fn hand_value(cards: &[u8]) -> u8 {
    let mut value = 0u8;
    let mut aces = 0u8;
    for &card in cards {
        let rank = card % 13;
        value += match rank {
            0 => {
                aces += 1;
                11
            }
            9..=12 => 10,
            r => r + 1,
        };
    }
    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }
    value
}

/// Shuffle the shoe and schedule the four-card opening deal.
pub fn stake(rng: &mut GameRng, timing: &RevealTiming) -> (BlackjackState, Vec<StepPlan>) {
    let deck = rng.create_deck();
    let state = BlackjackState {
        deck,
        player: Vec::new(),
        dealer: Vec::new(),
        dealt: 0,
        doubled: false,
        pending: None,
        phase: BlackjackPhase::Dealing,
    };
    let steps = (0..4)
        .map(|i| StepPlan {
            delay_ms: timing.deal_first_ms + i * timing.deal_step_ms,
            kind: StepKind::DealCard,
        })
        .collect();
    (state, steps)
}

/// Result of one opening-deal step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DealProgress {
    /// More opening cards to come.
    Dealing,
    /// Two-card 21: pays the bonus unconditionally, round over.
    InstantBlackjack(Settlement),
    /// Opening complete; the player acts.
    PlayerTurn,
}

/// Deal the next opening card: player, dealer, player, dealer.
pub fn deal_step(state: &mut BlackjackState, stake: u64) -> Result<DealProgress, EngineError> {
    if state.phase != BlackjackPhase::Dealing || state.dealt >= 4 {
        return Err(EngineError::InvalidStateTransition);
    }
    let card = state
        .deck
        .pop()
        .ok_or(EngineError::Configuration("shoe exhausted during deal"))?;
    if state.dealt % 2 == 0 {
        state.player.push(card);
    } else {
        state.dealer.push(card);
    }
    state.dealt += 1;
    if state.dealt < 4 {
        return Ok(DealProgress::Dealing);
    }
    if hand_value(&state.player) == 21 {
        state.phase = BlackjackPhase::Settled;
        return Ok(DealProgress::InstantBlackjack(Settlement::win(
            payout_for(stake, BLACKJACK_BONUS_X100),
            BLACKJACK_BONUS_X100,
        )));
    }
    state.phase = BlackjackPhase::Playing;
    Ok(DealProgress::PlayerTurn)
}

/// Result of a player action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Drew over 21: immediate loss.
    Busted(Settlement),
    /// Still under 21; the player may act again.
    Continue { total: u8 },
    /// Hand is locked in; the dealer's reveal steps follow.
    DealerTurn(Vec<StepPlan>),
}

/// Take one card. Busting settles immediately; landing exactly on 21
/// stands automatically.
pub fn hit(
    state: &mut BlackjackState,
    stake: u64,
    timing: &RevealTiming,
) -> Result<ActionOutcome, EngineError> {
    if state.phase != BlackjackPhase::Playing {
        return Err(EngineError::InvalidStateTransition);
    }
    let card = state
        .deck
        .pop()
        .ok_or(EngineError::Configuration("shoe exhausted during hit"))?;
    state.player.push(card);
    let total = hand_value(&state.player);
    if total > 21 {
        state.phase = BlackjackPhase::Settled;
        return Ok(ActionOutcome::Busted(Settlement::loss()));
    }
    if total == 21 {
        return Ok(ActionOutcome::DealerTurn(enter_dealer_turn(
            state, stake, timing,
        )?));
    }
    Ok(ActionOutcome::Continue { total })
}

/// Lock the player's hand and start the dealer's turn.
pub fn stand(
    state: &mut BlackjackState,
    stake: u64,
    timing: &RevealTiming,
) -> Result<ActionOutcome, EngineError> {
    if state.phase != BlackjackPhase::Playing {
        return Err(EngineError::InvalidStateTransition);
    }
    Ok(ActionOutcome::DealerTurn(enter_dealer_turn(
        state, stake, timing,
    )?))
}

/// Double the stake for exactly one more card. The caller must have
/// debited the second stake before invoking this.
pub fn double_down(
    state: &mut BlackjackState,
    stake: u64,
    timing: &RevealTiming,
) -> Result<ActionOutcome, EngineError> {
    if state.phase != BlackjackPhase::Playing || state.player.len() != 2 || state.doubled {
        return Err(EngineError::InvalidStateTransition);
    }
    state.doubled = true;
    let card = state
        .deck
        .pop()
        .ok_or(EngineError::Configuration("shoe exhausted during double"))?;
    state.player.push(card);
    if hand_value(&state.player) > 21 {
        state.phase = BlackjackPhase::Settled;
        return Ok(ActionOutcome::Busted(Settlement::loss()));
    }
    Ok(ActionOutcome::DealerTurn(enter_dealer_turn(
        state, stake, timing,
    )?))
}

/// Play the dealer out immediately and fix the payout; the returned
/// steps only pace the reveal.
fn enter_dealer_turn(
    state: &mut BlackjackState,
    stake: u64,
    timing: &RevealTiming,
) -> Result<Vec<StepPlan>, EngineError> {
    let mut draws = 0u64;
    while hand_value(&state.dealer) < BLACKJACK_DEALER_STAND {
        let card = state
            .deck
            .pop()
            .ok_or(EngineError::Configuration("shoe exhausted in dealer turn"))?;
        state.dealer.push(card);
        draws += 1;
    }

    let effective = if state.doubled { stake * 2 } else { stake };
    let player_total = hand_value(&state.player);
    let dealer_total = hand_value(&state.dealer);
    let multiplier_x100 = if dealer_total > 21 || player_total > dealer_total {
        BLACKJACK_WIN_X100
    } else if player_total == dealer_total {
        BLACKJACK_PUSH_X100
    } else {
        0
    };
    state.pending = Some(BlackjackPending {
        payout: payout_for(effective, multiplier_x100),
        multiplier_x100,
    });
    state.phase = BlackjackPhase::DealerTurn;

    let mut steps: Vec<StepPlan> = (0..draws)
        .map(|i| StepPlan {
            delay_ms: (i + 1) * timing.dealer_draw_ms,
            kind: StepKind::DealerDraw,
        })
        .collect();
    steps.push(StepPlan {
        delay_ms: draws * timing.dealer_draw_ms + timing.dealer_settle_ms,
        kind: StepKind::DealerSettle,
    });
    Ok(steps)
}

/// Fires on the final settle step: credit the fixed payout.
pub fn settle_step(state: &mut BlackjackState) -> Result<Settlement, EngineError> {
    if state.phase != BlackjackPhase::DealerTurn {
        return Err(EngineError::InvalidStateTransition);
    }
    let pending = state
        .pending
        .take()
        .ok_or(EngineError::Configuration("dealer turn without payout"))?;
    state.phase = BlackjackPhase::Settled;
    Ok(Settlement::win(pending.payout, pending.multiplier_x100))
}
