use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};

use super::{GameKind, MAX_BATTLE_CASES};

/// A single ledger movement caused by a round: exactly one of `debit`
/// or `credit` is nonzero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerDelta {
    pub round_id: u64,
    pub debit: u64,
    pub credit: u64,
}

impl Write for LedgerDelta {
    fn write(&self, writer: &mut impl BufMut) {
        self.round_id.write(writer);
        self.debit.write(writer);
        self.credit.write(writer);
    }
}

impl Read for LedgerDelta {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            round_id: u64::read(reader)?,
            debit: u64::read(reader)?,
            credit: u64::read(reader)?,
        })
    }
}

impl EncodeSize for LedgerDelta {
    fn encode_size(&self) -> usize {
        self.round_id.encode_size() + self.debit.encode_size() + self.credit.encode_size()
    }
}

/// Emitted once per settled round for live feeds and history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeEvent {
    pub round_id: u64,
    pub kind: GameKind,
    pub stake: u64,
    pub payout: u64,
    pub multiplier_x100: u64,
    pub items: Vec<u16>,
}

impl Write for OutcomeEvent {
    fn write(&self, writer: &mut impl BufMut) {
        self.round_id.write(writer);
        self.kind.write(writer);
        self.stake.write(writer);
        self.payout.write(writer);
        self.multiplier_x100.write(writer);
        self.items.write(writer);
    }
}

impl Read for OutcomeEvent {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            round_id: u64::read(reader)?,
            kind: GameKind::read(reader)?,
            stake: u64::read(reader)?,
            payout: u64::read(reader)?,
            multiplier_x100: u64::read(reader)?,
            items: Vec::<u16>::read_range(reader, 0..=MAX_BATTLE_CASES)?,
        })
    }
}

impl EncodeSize for OutcomeEvent {
    fn encode_size(&self) -> usize {
        self.round_id.encode_size()
            + self.kind.encode_size()
            + self.stake.encode_size()
            + self.payout.encode_size()
            + self.multiplier_x100.encode_size()
            + self.items.encode_size()
    }
}
