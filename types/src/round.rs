use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};

use super::{
    read_string, string_encode_size, write_string, MAX_BATTLE_CASES, MAX_BATTLE_SLOTS,
    MAX_NAME_LENGTH, MAX_PARALLEL_OPENINGS, MINES_GRID_SIZE,
};

/// The six playable games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GameKind {
    CoinFlip = 0,
    Crash = 1,
    Mines = 2,
    Blackjack = 3,
    Cases = 4,
    CaseBattle = 5,
}

impl Write for GameKind {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for GameKind {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::CoinFlip),
            1 => Ok(Self::Crash),
            2 => Ok(Self::Mines),
            3 => Ok(Self::Blackjack),
            4 => Ok(Self::Cases),
            5 => Ok(Self::CaseBattle),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for GameKind {
    const SIZE: usize = 1;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CoinSide {
    Heads = 0,
    Tails = 1,
}

impl Write for CoinSide {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for CoinSide {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Heads),
            1 => Ok(Self::Tails),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for CoinSide {
    const SIZE: usize = 1;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FlipPhase {
    Flipping = 0,
    Settled = 1,
}

impl Write for FlipPhase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for FlipPhase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Flipping),
            1 => Ok(Self::Settled),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for FlipPhase {
    const SIZE: usize = 1;
}

/// Coin flip: outcome drawn at stake time, revealed when the scheduled
/// flip step fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinFlipState {
    pub pick: CoinSide,
    pub result: CoinSide,
    pub phase: FlipPhase,
}

impl Write for CoinFlipState {
    fn write(&self, writer: &mut impl BufMut) {
        self.pick.write(writer);
        self.result.write(writer);
        self.phase.write(writer);
    }
}

impl Read for CoinFlipState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            pick: CoinSide::read(reader)?,
            result: CoinSide::read(reader)?,
            phase: FlipPhase::read(reader)?,
        })
    }
}

impl EncodeSize for CoinFlipState {
    fn encode_size(&self) -> usize {
        self.pick.encode_size() + self.result.encode_size() + self.phase.encode_size()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CrashPhase {
    Running = 0,
    CashedOut = 1,
    Crashed = 2,
}

impl Write for CrashPhase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for CrashPhase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Running),
            1 => Ok(Self::CashedOut),
            2 => Ok(Self::Crashed),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for CrashPhase {
    const SIZE: usize = 1;
}

/// Crash: the bust point is drawn at stake time and the instant the
/// live curve reaches it is pre-solved, so the whole round is a race
/// between `cash_out` and `crash_at`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrashState {
    /// Drawn bust point, in hundredths.
    pub bust_x100: u64,
    /// Absolute time (ms) the live multiplier reaches the bust point.
    pub crash_at: u64,
    /// Multiplier locked by a cash-out, if one happened in time.
    pub cashed_out_x100: Option<u64>,
    pub phase: CrashPhase,
}

impl Write for CrashState {
    fn write(&self, writer: &mut impl BufMut) {
        self.bust_x100.write(writer);
        self.crash_at.write(writer);
        self.cashed_out_x100.write(writer);
        self.phase.write(writer);
    }
}

impl Read for CrashState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            bust_x100: u64::read(reader)?,
            crash_at: u64::read(reader)?,
            cashed_out_x100: Option::<u64>::read(reader)?,
            phase: CrashPhase::read(reader)?,
        })
    }
}

impl EncodeSize for CrashState {
    fn encode_size(&self) -> usize {
        self.bust_x100.encode_size()
            + self.crash_at.encode_size()
            + self.cashed_out_x100.encode_size()
            + self.phase.encode_size()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MinesPhase {
    Active = 0,
    Busted = 1,
    CashedOut = 2,
}

impl Write for MinesPhase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for MinesPhase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Active),
            1 => Ok(Self::Busted),
            2 => Ok(Self::CashedOut),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for MinesPhase {
    const SIZE: usize = 1;
}

/// Mines: mine positions are fixed before the first reveal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinesState {
    pub mine_count: u8,
    /// Tile indices holding mines, sorted ascending.
    pub mines: Vec<u8>,
    /// Safe tiles revealed so far, in reveal order.
    pub revealed: Vec<u8>,
    pub phase: MinesPhase,
}

impl MinesState {
    pub fn is_mine(&self, tile: u8) -> bool {
        self.mines.binary_search(&tile).is_ok()
    }

    pub fn is_revealed(&self, tile: u8) -> bool {
        self.revealed.contains(&tile)
    }
}

impl Write for MinesState {
    fn write(&self, writer: &mut impl BufMut) {
        self.mine_count.write(writer);
        self.mines.write(writer);
        self.revealed.write(writer);
        self.phase.write(writer);
    }
}

impl Read for MinesState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let grid = MINES_GRID_SIZE as usize;
        Ok(Self {
            mine_count: u8::read(reader)?,
            mines: Vec::<u8>::read_range(reader, 0..=grid)?,
            revealed: Vec::<u8>::read_range(reader, 0..=grid)?,
            phase: MinesPhase::read(reader)?,
        })
    }
}

impl EncodeSize for MinesState {
    fn encode_size(&self) -> usize {
        self.mine_count.encode_size()
            + self.mines.encode_size()
            + self.revealed.encode_size()
            + self.phase.encode_size()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BlackjackPhase {
    Dealing = 0,
    Playing = 1,
    DealerTurn = 2,
    Settled = 3,
}

impl Write for BlackjackPhase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for BlackjackPhase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Dealing),
            1 => Ok(Self::Playing),
            2 => Ok(Self::DealerTurn),
            3 => Ok(Self::Settled),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for BlackjackPhase {
    const SIZE: usize = 1;
}

/// Payout fixed at the end of the dealer's turn, credited when the
/// settle step fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlackjackPending {
    pub payout: u64,
    pub multiplier_x100: u64,
}

impl Write for BlackjackPending {
    fn write(&self, writer: &mut impl BufMut) {
        self.payout.write(writer);
        self.multiplier_x100.write(writer);
    }
}

impl Read for BlackjackPending {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            payout: u64::read(reader)?,
            multiplier_x100: u64::read(reader)?,
        })
    }
}

impl EncodeSize for BlackjackPending {
    fn encode_size(&self) -> usize {
        self.payout.encode_size() + self.multiplier_x100.encode_size()
    }
}

/// Blackjack: cards are `0..52` (rank = card % 13, 0 = ace). The shoe
/// is shuffled at stake time; `dealt` counts initial-deal steps so the
/// scheduler knows which card lands next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlackjackState {
    pub deck: Vec<u8>,
    pub player: Vec<u8>,
    pub dealer: Vec<u8>,
    pub dealt: u8,
    pub doubled: bool,
    pub pending: Option<BlackjackPending>,
    pub phase: BlackjackPhase,
}

impl Write for BlackjackState {
    fn write(&self, writer: &mut impl BufMut) {
        self.deck.write(writer);
        self.player.write(writer);
        self.dealer.write(writer);
        self.dealt.write(writer);
        self.doubled.write(writer);
        match &self.pending {
            Some(pending) => {
                true.write(writer);
                pending.write(writer);
            }
            None => false.write(writer),
        }
        self.phase.write(writer);
    }
}

impl Read for BlackjackState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let deck = Vec::<u8>::read_range(reader, 0..=52)?;
        let player = Vec::<u8>::read_range(reader, 0..=22)?;
        let dealer = Vec::<u8>::read_range(reader, 0..=22)?;
        let dealt = u8::read(reader)?;
        let doubled = bool::read(reader)?;
        let pending = if bool::read(reader)? {
            Some(BlackjackPending::read(reader)?)
        } else {
            None
        };
        Ok(Self {
            deck,
            player,
            dealer,
            dealt,
            doubled,
            pending,
            phase: BlackjackPhase::read(reader)?,
        })
    }
}

impl EncodeSize for BlackjackState {
    fn encode_size(&self) -> usize {
        self.deck.encode_size()
            + self.player.encode_size()
            + self.dealer.encode_size()
            + self.dealt.encode_size()
            + self.doubled.encode_size()
            + 1
            + self.pending.as_ref().map(|p| p.encode_size()).unwrap_or(0)
            + self.phase.encode_size()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CasesPhase {
    Spinning = 0,
    Revealed = 1,
}

impl Write for CasesPhase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for CasesPhase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Spinning),
            1 => Ok(Self::Revealed),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for CasesPhase {
    const SIZE: usize = 1;
}

/// Case opening: `count` parallel spins against a single container,
/// winners drawn up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CasesState {
    pub container: u16,
    pub count: u8,
    /// Winning item ids, one per opening.
    pub winners: Vec<u16>,
    pub phase: CasesPhase,
}

impl Write for CasesState {
    fn write(&self, writer: &mut impl BufMut) {
        self.container.write(writer);
        self.count.write(writer);
        self.winners.write(writer);
        self.phase.write(writer);
    }
}

impl Read for CasesState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            container: u16::read(reader)?,
            count: u8::read(reader)?,
            winners: Vec::<u16>::read_range(reader, 0..=MAX_PARALLEL_OPENINGS as usize)?,
            phase: CasesPhase::read(reader)?,
        })
    }
}

impl EncodeSize for CasesState {
    fn encode_size(&self) -> usize {
        self.container.encode_size()
            + self.count.encode_size()
            + self.winners.encode_size()
            + self.phase.encode_size()
    }
}

/// Battle formats. Slot order is fixed per mode; the creator always
/// takes slot 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BattleMode {
    OneVsOne = 0,
    ThreeWay = 1,
    FourWay = 2,
    TwoVsTwo = 3,
    ThreeVsThree = 4,
}

impl BattleMode {
    /// Team assignment per slot, in slot order.
    pub fn slot_teams(&self) -> &'static [u8] {
        match self {
            Self::OneVsOne => &[1, 2],
            Self::ThreeWay => &[1, 2, 3],
            Self::FourWay => &[1, 2, 3, 4],
            Self::TwoVsTwo => &[1, 1, 2, 2],
            Self::ThreeVsThree => &[1, 1, 1, 2, 2, 2],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_teams().len()
    }
}

impl Write for BattleMode {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for BattleMode {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::OneVsOne),
            1 => Ok(Self::ThreeWay),
            2 => Ok(Self::FourWay),
            3 => Ok(Self::TwoVsTwo),
            4 => Ok(Self::ThreeVsThree),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for BattleMode {
    const SIZE: usize = 1;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BattlePhase {
    Lobby = 0,
    Playing = 1,
    Finished = 2,
}

impl Write for BattlePhase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for BattlePhase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Lobby),
            1 => Ok(Self::Playing),
            2 => Ok(Self::Finished),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for BattlePhase {
    const SIZE: usize = 1;
}

/// A participant occupying a battle slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleOccupant {
    pub name: String,
    pub is_bot: bool,
    /// Winning item ids so far, one per completed battle round.
    pub drops: Vec<u16>,
    /// Running sum of drop values.
    pub total: u64,
}

impl Write for BattleOccupant {
    fn write(&self, writer: &mut impl BufMut) {
        write_string(&self.name, writer);
        self.is_bot.write(writer);
        self.drops.write(writer);
        self.total.write(writer);
    }
}

impl Read for BattleOccupant {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            name: read_string(reader, MAX_NAME_LENGTH)?,
            is_bot: bool::read(reader)?,
            drops: Vec::<u16>::read_range(reader, 0..=MAX_BATTLE_CASES)?,
            total: u64::read(reader)?,
        })
    }
}

impl EncodeSize for BattleOccupant {
    fn encode_size(&self) -> usize {
        string_encode_size(&self.name)
            + self.is_bot.encode_size()
            + self.drops.encode_size()
            + self.total.encode_size()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleSlot {
    pub team: u8,
    pub occupant: Option<BattleOccupant>,
}

impl Write for BattleSlot {
    fn write(&self, writer: &mut impl BufMut) {
        self.team.write(writer);
        match &self.occupant {
            Some(occupant) => {
                true.write(writer);
                occupant.write(writer);
            }
            None => false.write(writer),
        }
    }
}

impl Read for BattleSlot {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let team = u8::read(reader)?;
        let occupant = if bool::read(reader)? {
            Some(BattleOccupant::read(reader)?)
        } else {
            None
        };
        Ok(Self { team, occupant })
    }
}

impl EncodeSize for BattleSlot {
    fn encode_size(&self) -> usize {
        self.team.encode_size()
            + 1
            + self
                .occupant
                .as_ref()
                .map(|o| o.encode_size())
                .unwrap_or(0)
    }
}

/// Case battle: all occupants open the same case list round by round;
/// the highest-total team takes the whole pot of drop value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleState {
    pub mode: BattleMode,
    /// Container ids opened in order, one per battle round.
    pub cases: Vec<u16>,
    pub slots: Vec<BattleSlot>,
    /// Next battle round to resolve.
    pub round_index: u8,
    pub winning_team: Option<u8>,
    pub phase: BattlePhase,
}

impl BattleState {
    pub fn open_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.occupant.is_none()).count()
    }
}

impl Write for BattleState {
    fn write(&self, writer: &mut impl BufMut) {
        self.mode.write(writer);
        self.cases.write(writer);
        self.slots.write(writer);
        self.round_index.write(writer);
        self.winning_team.write(writer);
        self.phase.write(writer);
    }
}

impl Read for BattleState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            mode: BattleMode::read(reader)?,
            cases: Vec::<u16>::read_range(reader, 1..=MAX_BATTLE_CASES)?,
            slots: Vec::<BattleSlot>::read_range(reader, 2..=MAX_BATTLE_SLOTS)?,
            round_index: u8::read(reader)?,
            winning_team: Option::<u8>::read(reader)?,
            phase: BattlePhase::read(reader)?,
        })
    }
}

impl EncodeSize for BattleState {
    fn encode_size(&self) -> usize {
        self.mode.encode_size()
            + self.cases.encode_size()
            + self.slots.encode_size()
            + self.round_index.encode_size()
            + self.winning_team.encode_size()
            + self.phase.encode_size()
    }
}

/// Per-game round state. Fully typed and serializable so hosts can
/// persist and replay rounds without an opaque blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundState {
    CoinFlip(CoinFlipState),
    Crash(CrashState),
    Mines(MinesState),
    Blackjack(BlackjackState),
    Cases(CasesState),
    Battle(BattleState),
}

impl RoundState {
    pub fn kind(&self) -> GameKind {
        match self {
            Self::CoinFlip(_) => GameKind::CoinFlip,
            Self::Crash(_) => GameKind::Crash,
            Self::Mines(_) => GameKind::Mines,
            Self::Blackjack(_) => GameKind::Blackjack,
            Self::Cases(_) => GameKind::Cases,
            Self::Battle(_) => GameKind::CaseBattle,
        }
    }
}

impl Write for RoundState {
    fn write(&self, writer: &mut impl BufMut) {
        self.kind().write(writer);
        match self {
            Self::CoinFlip(s) => s.write(writer),
            Self::Crash(s) => s.write(writer),
            Self::Mines(s) => s.write(writer),
            Self::Blackjack(s) => s.write(writer),
            Self::Cases(s) => s.write(writer),
            Self::Battle(s) => s.write(writer),
        }
    }
}

impl Read for RoundState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match GameKind::read(reader)? {
            GameKind::CoinFlip => Ok(Self::CoinFlip(CoinFlipState::read(reader)?)),
            GameKind::Crash => Ok(Self::Crash(CrashState::read(reader)?)),
            GameKind::Mines => Ok(Self::Mines(MinesState::read(reader)?)),
            GameKind::Blackjack => Ok(Self::Blackjack(BlackjackState::read(reader)?)),
            GameKind::Cases => Ok(Self::Cases(CasesState::read(reader)?)),
            GameKind::CaseBattle => Ok(Self::Battle(BattleState::read(reader)?)),
        }
    }
}

impl EncodeSize for RoundState {
    fn encode_size(&self) -> usize {
        GameKind::SIZE
            + match self {
                Self::CoinFlip(s) => s.encode_size(),
                Self::Crash(s) => s.encode_size(),
                Self::Mines(s) => s.encode_size(),
                Self::Blackjack(s) => s.encode_size(),
                Self::Cases(s) => s.encode_size(),
                Self::Battle(s) => s.encode_size(),
            }
    }
}

/// Final result of a round. `payout` is the gross amount credited back
/// (zero on a loss); `items` lists won item ids for container games.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalOutcome {
    pub payout: u64,
    pub multiplier_x100: u64,
    pub items: Vec<u16>,
}

impl Write for TerminalOutcome {
    fn write(&self, writer: &mut impl BufMut) {
        self.payout.write(writer);
        self.multiplier_x100.write(writer);
        self.items.write(writer);
    }
}

impl Read for TerminalOutcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            payout: u64::read(reader)?,
            multiplier_x100: u64::read(reader)?,
            items: Vec::<u16>::read_range(reader, 0..=MAX_BATTLE_CASES)?,
        })
    }
}

impl EncodeSize for TerminalOutcome {
    fn encode_size(&self) -> usize {
        self.payout.encode_size() + self.multiplier_x100.encode_size() + self.items.encode_size()
    }
}

/// A wagered round from stake to settlement.
///
/// `version` increments on every mutation and backs optimistic
/// concurrency control. `debited`, `credited`, and `refunded` record
/// the ledger movements the round caused, so conservation can be
/// audited per round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub id: u64,
    pub kind: GameKind,
    pub stake: u64,
    pub created_at: u64,
    pub version: u32,
    /// Total debited from the player at stake time (stake, plus the
    /// second stake on a blackjack double down).
    pub debited: u64,
    /// Amount credited at settlement. `Some(0)` means a settled loss.
    pub credited: Option<u64>,
    pub refunded: bool,
    pub outcome: Option<TerminalOutcome>,
    pub state: RoundState,
}

impl Round {
    /// Terminal rounds accept no further actions.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Write for Round {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        self.kind.write(writer);
        self.stake.write(writer);
        self.created_at.write(writer);
        self.version.write(writer);
        self.debited.write(writer);
        self.credited.write(writer);
        self.refunded.write(writer);
        match &self.outcome {
            Some(outcome) => {
                true.write(writer);
                outcome.write(writer);
            }
            None => false.write(writer),
        }
        self.state.write(writer);
    }
}

impl Read for Round {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let id = u64::read(reader)?;
        let kind = GameKind::read(reader)?;
        let stake = u64::read(reader)?;
        let created_at = u64::read(reader)?;
        let version = u32::read(reader)?;
        let debited = u64::read(reader)?;
        let credited = Option::<u64>::read(reader)?;
        let refunded = bool::read(reader)?;
        let outcome = if bool::read(reader)? {
            Some(TerminalOutcome::read(reader)?)
        } else {
            None
        };
        Ok(Self {
            id,
            kind,
            stake,
            created_at,
            version,
            debited,
            credited,
            refunded,
            outcome,
            state: RoundState::read(reader)?,
        })
    }
}

impl EncodeSize for Round {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + self.kind.encode_size()
            + self.stake.encode_size()
            + self.created_at.encode_size()
            + self.version.encode_size()
            + self.debited.encode_size()
            + self.credited.encode_size()
            + self.refunded.encode_size()
            + 1
            + self
                .outcome
                .as_ref()
                .map(|o| o.encode_size())
                .unwrap_or(0)
            + self.state.encode_size()
    }
}
