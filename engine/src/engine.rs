//! Round orchestration: stakes, actions, scheduled reveals, and
//! settlement against the host ledger.

use std::collections::BTreeMap;

use tracing::{debug, info};

use moonplay_types::{
    BattleMode, BattlePhase, BlackjackPhase, CoinSide, Container, CrashPhase, EngineConfig,
    EngineError, GameKind, LedgerDelta, MinesPhase, OutcomeEvent, Round, RoundState,
    TerminalOutcome, MAX_PARALLEL_OPENINGS,
};

use crate::games::{
    battles, blackjack, cases, coin_flip, crash,
    mines::{self, RevealOutcome},
    Settlement, StepPlan,
};
use crate::ledger::Ledger;
use crate::odds::MinesTables;
use crate::rng::{GameRng, ServerSeed};
use crate::scheduler::{RevealScheduler, StepKind};

/// Receives ledger movements and settled outcomes as they happen.
/// Hosts hook feeds and persistence here.
pub trait EventSink {
    fn ledger_delta(&mut self, _delta: LedgerDelta) {}
    fn outcome(&mut self, _event: OutcomeEvent) {}
}

/// Discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {}

/// Parameters for opening a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StakeParams {
    CoinFlip { stake: u64, pick: CoinSide },
    Crash { stake: u64 },
    Mines { stake: u64, mine_count: u8 },
    Blackjack { stake: u64 },
    Cases { container: u16, count: u8 },
    Battle { mode: BattleMode, cases: Vec<u16>, name: String },
}

/// The wager engine.
///
/// All entry points take `now` in milliseconds from the host clock;
/// the engine never reads wall time. Outcomes derive from the server
/// seed and round id alone, so a host replaying the same inputs gets
/// the same settlements.
pub struct Engine<L: Ledger, S: EventSink = NoopSink> {
    seed: ServerSeed,
    config: EngineConfig,
    ledger: L,
    sink: S,
    containers: BTreeMap<u16, Container>,
    rounds: BTreeMap<u64, Round>,
    scheduler: RevealScheduler,
    mines_tables: MinesTables,
    next_round_id: u64,
    crash_blocked_until: u64,
}

impl<L: Ledger> Engine<L, NoopSink> {
    pub fn new(seed: ServerSeed, config: EngineConfig, ledger: L) -> Self {
        Self::with_sink(seed, config, ledger, NoopSink)
    }
}

impl<L: Ledger, S: EventSink> Engine<L, S> {
    pub fn with_sink(seed: ServerSeed, config: EngineConfig, ledger: L, sink: S) -> Self {
        let mines_tables = MinesTables::new(config.house_edge_bps);
        Self {
            seed,
            config,
            ledger,
            sink,
            containers: BTreeMap::new(),
            rounds: BTreeMap::new(),
            scheduler: RevealScheduler::new(),
            mines_tables,
            next_round_id: 0,
            crash_blocked_until: 0,
        }
    }

    pub fn register_container(&mut self, container: Container) -> Result<(), EngineError> {
        container.validate()?;
        self.containers.insert(container.id, container);
        Ok(())
    }

    pub fn container(&self, id: u16) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn round(&self, id: u64) -> Option<&Round> {
        self.rounds.get(&id)
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    /// Earliest pending reveal time, for host scheduling.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Open a round: validate, debit the full cost, then draw the
    /// outcome and schedule its reveals. The debit always lands before
    /// any randomness is consumed.
    pub fn place_stake(&mut self, params: StakeParams, now: u64) -> Result<u64, EngineError> {
        let round_id = self.next_round_id;
        let timing = self.config.timing.clone();
        let (kind, cost, state, steps) = match params {
            StakeParams::CoinFlip { stake, pick } => {
                require_stake(stake)?;
                self.ledger.debit(stake)?;
                let mut rng = GameRng::new(&self.seed, round_id, 0);
                let (state, step) = coin_flip::stake(&mut rng, pick, &timing);
                (GameKind::CoinFlip, stake, RoundState::CoinFlip(state), vec![step])
            }
            StakeParams::Crash { stake } => {
                require_stake(stake)?;
                if now < self.crash_blocked_until {
                    return Err(EngineError::InvalidStateTransition);
                }
                self.ledger.debit(stake)?;
                let mut rng = GameRng::new(&self.seed, round_id, 0);
                let (state, step) = crash::stake(&mut rng, now, &self.config.crash);
                (GameKind::Crash, stake, RoundState::Crash(state), vec![step])
            }
            StakeParams::Mines { stake, mine_count } => {
                require_stake(stake)?;
                self.mines_tables.table(self.config.grid_size, mine_count)?;
                self.ledger.debit(stake)?;
                let mut rng = GameRng::new(&self.seed, round_id, 0);
                let state = mines::stake(
                    &mut rng,
                    mine_count,
                    self.config.grid_size,
                    &mut self.mines_tables,
                )?;
                (GameKind::Mines, stake, RoundState::Mines(state), vec![])
            }
            StakeParams::Blackjack { stake } => {
                require_stake(stake)?;
                self.ledger.debit(stake)?;
                let mut rng = GameRng::new(&self.seed, round_id, 0);
                let (state, steps) = blackjack::stake(&mut rng, &timing);
                (GameKind::Blackjack, stake, RoundState::Blackjack(state), steps)
            }
            StakeParams::Cases { container, count } => {
                let container = self
                    .containers
                    .get(&container)
                    .ok_or(EngineError::UnknownContainer)?
                    .clone();
                if count == 0 || count > MAX_PARALLEL_OPENINGS {
                    return Err(EngineError::InvalidStake);
                }
                let cost = container.price * count as u64;
                self.ledger.debit(cost)?;
                let mut rng = GameRng::new(&self.seed, round_id, 0);
                let (state, step) = cases::stake(&mut rng, &container, count, &timing)?;
                (GameKind::Cases, cost, RoundState::Cases(state), vec![step])
            }
            StakeParams::Battle { mode, cases, name } => {
                let (state, cost) = battles::create(mode, cases, name, &self.containers)?;
                self.ledger.debit(cost)?;
                (GameKind::CaseBattle, cost, RoundState::Battle(state), vec![])
            }
        };

        for step in &steps {
            self.scheduler
                .schedule(now + step.delay_ms, round_id, step.kind);
        }
        self.rounds.insert(
            round_id,
            Round {
                id: round_id,
                kind,
                stake: cost,
                created_at: now,
                version: 0,
                debited: cost,
                credited: None,
                refunded: false,
                outcome: None,
                state,
            },
        );
        self.next_round_id += 1;
        self.sink.ledger_delta(LedgerDelta {
            round_id,
            debit: cost,
            credit: 0,
        });
        debug!(round_id, ?kind, stake = cost, "stake placed");
        Ok(round_id)
    }

    /// Reveal a mines tile. Returns the running cash-out value while
    /// the round stays alive.
    pub fn reveal_tile(
        &mut self,
        round_id: u64,
        version: u32,
        tile: u8,
    ) -> Result<RevealOutcome, EngineError> {
        let grid = self.config.grid_size;
        let round = checked_round(&mut self.rounds, round_id, version)?;
        let stake = round.stake;
        let state = match &mut round.state {
            RoundState::Mines(state) => state,
            _ => return Err(EngineError::InvalidStateTransition),
        };
        let outcome = mines::reveal(state, tile, grid, stake, &mut self.mines_tables)?;
        self.bump(round_id);
        match &outcome {
            RevealOutcome::Busted(settlement) | RevealOutcome::Cleared(settlement) => {
                self.finalize(round_id, settlement.clone());
            }
            RevealOutcome::Safe { .. } => {}
        }
        Ok(outcome)
    }

    /// Bank the current mines multiplier. Cashing out before any
    /// reveal hands the stake back instead.
    pub fn mines_cash_out(&mut self, round_id: u64, version: u32) -> Result<u64, EngineError> {
        let grid = self.config.grid_size;
        let round = checked_round(&mut self.rounds, round_id, version)?;
        let stake = round.stake;
        let state = match &mut round.state {
            RoundState::Mines(state) => state,
            _ => return Err(EngineError::InvalidStateTransition),
        };
        if state.phase == MinesPhase::Active && state.revealed.is_empty() {
            self.refund(round_id, 0);
            return Ok(stake);
        }
        let settlement = mines::cash_out(state, grid, stake, &mut self.mines_tables)?;
        self.bump(round_id);
        let payout = settlement.payout;
        self.finalize(round_id, settlement);
        Ok(payout)
    }

    /// Lock the live crash multiplier and settle immediately.
    pub fn crash_cash_out(
        &mut self,
        round_id: u64,
        version: u32,
        now: u64,
    ) -> Result<u64, EngineError> {
        let cfg = self.config.crash.clone();
        let round = checked_round(&mut self.rounds, round_id, version)?;
        let (stake, created_at) = (round.stake, round.created_at);
        let state = match &mut round.state {
            RoundState::Crash(state) => state,
            _ => return Err(EngineError::InvalidStateTransition),
        };
        let settlement = crash::cash_out(state, stake, now, created_at, &cfg)?;
        // The round still occupies the table until its bust instant
        self.crash_blocked_until = state.crash_at + cfg.cooldown_ms;
        self.bump(round_id);
        let payout = settlement.payout;
        self.finalize(round_id, settlement);
        Ok(payout)
    }

    /// Blackjack: take one card.
    pub fn hit(
        &mut self,
        round_id: u64,
        version: u32,
        now: u64,
    ) -> Result<BlackjackPhase, EngineError> {
        let timing = self.config.timing.clone();
        let round = checked_round(&mut self.rounds, round_id, version)?;
        let stake = round.stake;
        let state = match &mut round.state {
            RoundState::Blackjack(state) => state,
            _ => return Err(EngineError::InvalidStateTransition),
        };
        let outcome = blackjack::hit(state, stake, &timing)?;
        self.apply_blackjack_action(round_id, outcome, now)
    }

    /// Blackjack: lock the hand and let the dealer play.
    pub fn stand(
        &mut self,
        round_id: u64,
        version: u32,
        now: u64,
    ) -> Result<BlackjackPhase, EngineError> {
        let timing = self.config.timing.clone();
        let round = checked_round(&mut self.rounds, round_id, version)?;
        let stake = round.stake;
        let state = match &mut round.state {
            RoundState::Blackjack(state) => state,
            _ => return Err(EngineError::InvalidStateTransition),
        };
        let outcome = blackjack::stand(state, stake, &timing)?;
        self.apply_blackjack_action(round_id, outcome, now)
    }

    /// Blackjack: double the stake for exactly one more card. The
    /// second stake is debited before any card moves.
    pub fn double_down(
        &mut self,
        round_id: u64,
        version: u32,
        now: u64,
    ) -> Result<BlackjackPhase, EngineError> {
        let timing = self.config.timing.clone();
        {
            let round = checked_round(&mut self.rounds, round_id, version)?;
            let stake = round.stake;
            match &round.state {
                RoundState::Blackjack(state)
                    if state.phase == BlackjackPhase::Playing
                        && state.player.len() == 2
                        && !state.doubled => {}
                RoundState::Blackjack(_) => return Err(EngineError::InvalidStateTransition),
                _ => return Err(EngineError::InvalidStateTransition),
            }
            self.ledger.debit(stake)?;
        }
        let round = match self.rounds.get_mut(&round_id) {
            Some(round) => round,
            None => return Err(EngineError::UnknownRound),
        };
        round.debited += round.stake;
        let stake = round.stake;
        self.sink.ledger_delta(LedgerDelta {
            round_id,
            debit: stake,
            credit: 0,
        });
        let state = match &mut round.state {
            RoundState::Blackjack(state) => state,
            _ => return Err(EngineError::InvalidStateTransition),
        };
        let outcome = blackjack::double_down(state, stake, &timing)?;
        self.apply_blackjack_action(round_id, outcome, now)
    }

    fn apply_blackjack_action(
        &mut self,
        round_id: u64,
        outcome: blackjack::ActionOutcome,
        now: u64,
    ) -> Result<BlackjackPhase, EngineError> {
        self.bump(round_id);
        match outcome {
            blackjack::ActionOutcome::Busted(settlement) => {
                self.finalize(round_id, settlement);
                Ok(BlackjackPhase::Settled)
            }
            blackjack::ActionOutcome::Continue { .. } => Ok(BlackjackPhase::Playing),
            blackjack::ActionOutcome::DealerTurn(steps) => {
                self.schedule_all(round_id, &steps, now);
                Ok(BlackjackPhase::DealerTurn)
            }
        }
    }

    /// Fill every open battle slot with bots and start the rounds.
    pub fn call_bots(&mut self, round_id: u64, version: u32, now: u64) -> Result<(), EngineError> {
        let timing = self.config.timing.clone();
        let round = checked_round(&mut self.rounds, round_id, version)?;
        let state = match &mut round.state {
            RoundState::Battle(state) => state,
            _ => return Err(EngineError::InvalidStateTransition),
        };
        let mut rng = GameRng::new(&self.seed, round_id, 0);
        battles::fill_bots(state, &mut rng)?;
        let steps = battles::start(state, &timing)?;
        self.bump(round_id);
        self.schedule_all(round_id, &steps, now);
        Ok(())
    }

    /// Cancel a round cleanly. Where the player still had agency the
    /// outstanding stake is refunded; where the outcome was already
    /// locked the round fast-forwards to its normal settlement.
    pub fn abandon(&mut self, round_id: u64, now: u64) -> Result<(), EngineError> {
        let round = self
            .rounds
            .get_mut(&round_id)
            .ok_or(EngineError::UnknownRound)?;
        if round.is_terminal() {
            return Err(EngineError::InvalidStateTransition);
        }
        let stake = round.stake;
        let edge = self.config.house_edge_bps;
        enum Plan {
            Refund,
            Settle(Settlement),
            FastForwardBattle,
        }
        let plan = match &mut round.state {
            RoundState::CoinFlip(state) => {
                // Result already locked: reveal early
                Plan::Settle(coin_flip::settle(state, stake, edge)?)
            }
            // A running crash round was never cashed out. Before the
            // bust instant the stake comes back; past it the loss is
            // already determined and stands.
            RoundState::Crash(state) if state.phase == CrashPhase::Running => {
                if now >= state.crash_at {
                    self.crash_blocked_until = state.crash_at + self.config.crash.cooldown_ms;
                    let settlement = crash::crash_step(state)
                        .ok_or(EngineError::InvalidStateTransition)?;
                    Plan::Settle(settlement)
                } else {
                    Plan::Refund
                }
            }
            RoundState::Crash(_) => return Err(EngineError::InvalidStateTransition),
            RoundState::Mines(_) => Plan::Refund,
            RoundState::Blackjack(state) => match state.phase {
                BlackjackPhase::Dealing | BlackjackPhase::Playing => Plan::Refund,
                BlackjackPhase::DealerTurn => Plan::Settle(blackjack::settle_step(state)?),
                BlackjackPhase::Settled => return Err(EngineError::InvalidStateTransition),
            },
            RoundState::Cases(state) => {
                let container = self
                    .containers
                    .get(&state.container)
                    .ok_or(EngineError::UnknownContainer)?;
                Plan::Settle(cases::settle(state, container, stake)?)
            }
            RoundState::Battle(state) => match state.phase {
                BattlePhase::Lobby => Plan::Refund,
                BattlePhase::Playing => Plan::FastForwardBattle,
                BattlePhase::Finished => return Err(EngineError::InvalidStateTransition),
            },
        };
        match plan {
            Plan::Refund => self.refund(round_id, now),
            Plan::Settle(settlement) => {
                self.bump(round_id);
                self.finalize(round_id, settlement);
            }
            Plan::FastForwardBattle => {
                self.bump(round_id);
                self.fast_forward_battle(round_id)?;
            }
        }
        Ok(())
    }

    /// Advance the clock: fire every due reveal step in order. Returns
    /// the rounds that reached settlement.
    pub fn tick(&mut self, now: u64) -> Vec<u64> {
        let due = self.scheduler.drain_due(now);
        let mut settled = Vec::new();
        for step in due {
            if self.run_step(step.round_id, step.kind, step.due_at) {
                settled.push(step.round_id);
            }
        }
        settled
    }

    /// Remove a terminal round from the engine, returning its record.
    pub fn acknowledge(&mut self, round_id: u64) -> Result<Round, EngineError> {
        let terminal = self
            .rounds
            .get(&round_id)
            .ok_or(EngineError::UnknownRound)?
            .is_terminal();
        if !terminal {
            return Err(EngineError::InvalidStateTransition);
        }
        self.rounds
            .remove(&round_id)
            .ok_or(EngineError::UnknownRound)
    }

    fn run_step(&mut self, round_id: u64, kind: StepKind, due_at: u64) -> bool {
        let round = match self.rounds.get_mut(&round_id) {
            Some(round) => round,
            None => return false,
        };
        if round.is_terminal() {
            return false;
        }
        let stake = round.stake;
        let edge = self.config.house_edge_bps;
        match (kind, &mut round.state) {
            (StepKind::FlipSettle, RoundState::CoinFlip(state)) => {
                match coin_flip::settle(state, stake, edge) {
                    Ok(settlement) => {
                        self.bump(round_id);
                        self.finalize(round_id, settlement)
                    }
                    Err(_) => false,
                }
            }
            (StepKind::CrashPoint, RoundState::Crash(state)) => match crash::crash_step(state) {
                Some(settlement) => {
                    self.crash_blocked_until = due_at + self.config.crash.cooldown_ms;
                    self.bump(round_id);
                    self.finalize(round_id, settlement)
                }
                None => false,
            },
            (StepKind::DealCard, RoundState::Blackjack(state)) => {
                match blackjack::deal_step(state, stake) {
                    Ok(blackjack::DealProgress::InstantBlackjack(settlement)) => {
                        self.bump(round_id);
                        self.finalize(round_id, settlement)
                    }
                    Ok(_) => {
                        self.bump(round_id);
                        false
                    }
                    Err(_) => false,
                }
            }
            // Presentation beat only: the cards are already in state
            (StepKind::DealerDraw, RoundState::Blackjack(_)) => false,
            (StepKind::DealerSettle, RoundState::Blackjack(state)) => {
                match blackjack::settle_step(state) {
                    Ok(settlement) => {
                        self.bump(round_id);
                        self.finalize(round_id, settlement)
                    }
                    Err(_) => false,
                }
            }
            (StepKind::SpinSettle, RoundState::Cases(state)) => {
                let container = match self.containers.get(&state.container) {
                    Some(container) => container,
                    None => return false,
                };
                match cases::settle(state, container, stake) {
                    Ok(settlement) => {
                        self.bump(round_id);
                        self.finalize(round_id, settlement)
                    }
                    Err(_) => false,
                }
            }
            (StepKind::BattleRound, RoundState::Battle(state)) => {
                let draw = state.round_index as u32 + 1;
                let mut rng = GameRng::new(&self.seed, round_id, draw);
                match battles::battle_round(state, &mut rng, &self.containers) {
                    Ok(()) => {
                        self.bump(round_id);
                        false
                    }
                    Err(_) => false,
                }
            }
            (StepKind::BattleSettle, RoundState::Battle(state)) => {
                match battles::settle(state, stake) {
                    Ok(settlement) => {
                        self.bump(round_id);
                        self.finalize(round_id, settlement)
                    }
                    Err(_) => false,
                }
            }
            _ => false,
        }
    }

    fn fast_forward_battle(&mut self, round_id: u64) -> Result<(), EngineError> {
        loop {
            let round = self
                .rounds
                .get_mut(&round_id)
                .ok_or(EngineError::UnknownRound)?;
            let state = match &mut round.state {
                RoundState::Battle(state) => state,
                _ => return Err(EngineError::InvalidStateTransition),
            };
            if (state.round_index as usize) < state.cases.len() {
                let draw = state.round_index as u32 + 1;
                let mut rng = GameRng::new(&self.seed, round_id, draw);
                battles::battle_round(state, &mut rng, &self.containers)?;
                continue;
            }
            let settlement = battles::settle(state, round.stake)?;
            self.finalize(round_id, settlement);
            return Ok(());
        }
    }

    fn bump(&mut self, round_id: u64) {
        if let Some(round) = self.rounds.get_mut(&round_id) {
            round.version += 1;
        }
    }

    fn schedule_all(&mut self, round_id: u64, steps: &[StepPlan], now: u64) {
        for step in steps {
            self.scheduler
                .schedule(now + step.delay_ms, round_id, step.kind);
        }
    }

    /// Mark a round settled and credit its payout exactly once.
    fn finalize(&mut self, round_id: u64, settlement: Settlement) -> bool {
        let round = match self.rounds.get_mut(&round_id) {
            Some(round) => round,
            None => return false,
        };
        if round.outcome.is_some() {
            return false;
        }
        round.outcome = Some(TerminalOutcome {
            payout: settlement.payout,
            multiplier_x100: settlement.multiplier_x100,
            items: settlement.items.clone(),
        });
        round.credited = Some(settlement.payout);
        let (kind, debited, payout) = (round.kind, round.debited, settlement.payout);
        if payout > 0 {
            self.ledger.credit(payout);
            self.sink.ledger_delta(LedgerDelta {
                round_id,
                debit: 0,
                credit: payout,
            });
        }
        self.sink.outcome(OutcomeEvent {
            round_id,
            kind,
            stake: debited,
            payout,
            multiplier_x100: settlement.multiplier_x100,
            items: settlement.items,
        });
        self.scheduler.cancel_round(round_id);
        info!(round_id, ?kind, stake = debited, payout, "round settled");
        true
    }

    /// Hand the full debited amount back and terminate the round.
    fn refund(&mut self, round_id: u64, now: u64) {
        let round = match self.rounds.get_mut(&round_id) {
            Some(round) => round,
            None => return,
        };
        if round.outcome.is_some() {
            return;
        }
        round.refunded = true;
        round.version += 1;
        round.outcome = Some(TerminalOutcome {
            payout: 0,
            multiplier_x100: 0,
            items: Vec::new(),
        });
        let debited = round.debited;
        self.ledger.credit(debited);
        self.sink.ledger_delta(LedgerDelta {
            round_id,
            debit: 0,
            credit: debited,
        });
        self.scheduler.cancel_round(round_id);
        info!(round_id, refunded = debited, at = now, "round abandoned");
    }
}

fn require_stake(stake: u64) -> Result<(), EngineError> {
    if stake == 0 {
        return Err(EngineError::InvalidStake);
    }
    Ok(())
}

/// Fetch a live round, enforcing optimistic concurrency: the caller's
/// expected version must match or the first writer has already won.
fn checked_round(
    rounds: &mut BTreeMap<u64, Round>,
    round_id: u64,
    version: u32,
) -> Result<&mut Round, EngineError> {
    let round = rounds.get_mut(&round_id).ok_or(EngineError::UnknownRound)?;
    if round.is_terminal() {
        return Err(EngineError::InvalidStateTransition);
    }
    if round.version != version {
        return Err(EngineError::ConcurrencyConflict {
            expected: version,
            found: round.version,
        });
    }
    Ok(round)
}
