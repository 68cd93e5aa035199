//! Chip accounting.
//!
//! The engine never touches balances directly: it debits stakes and
//! credits payouts through this trait, and the host decides where the
//! chips actually live.

use moonplay_types::EngineError;

/// Host-provided balance store. Debits are all-or-nothing; credits
/// cannot fail.
pub trait Ledger {
    /// Remove `amount` from the balance, rejecting overdrafts.
    fn debit(&mut self, amount: u64) -> Result<(), EngineError>;

    /// Add `amount` to the balance.
    fn credit(&mut self, amount: u64);

    fn balance(&self) -> u64;
}

/// In-memory ledger tracking lifetime totals for conservation audits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    balance: u64,
    pub total_debited: u64,
    pub total_credited: u64,
}

impl MemoryLedger {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            total_debited: 0,
            total_credited: 0,
        }
    }
}

impl Ledger for MemoryLedger {
    fn debit(&mut self, amount: u64) -> Result<(), EngineError> {
        if amount > self.balance {
            return Err(EngineError::InsufficientFunds);
        }
        self.balance -= amount;
        self.total_debited += amount;
        Ok(())
    }

    fn credit(&mut self, amount: u64) {
        self.balance += amount;
        self.total_credited += amount;
    }

    fn balance(&self) -> u64 {
        self.balance
    }
}

/// Gross payout for a stake at a multiplier in hundredths, floored.
/// Widens to u128 so stake * multiplier cannot overflow.
pub fn payout_for(stake: u64, multiplier_x100: u64) -> u64 {
    ((stake as u128 * multiplier_x100 as u128) / 100) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_rejects_overdraft() {
        let mut ledger = MemoryLedger::new(100);
        assert_eq!(ledger.debit(101), Err(EngineError::InsufficientFunds));
        assert_eq!(ledger.balance(), 100);
        assert!(ledger.debit(100).is_ok());
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_totals_track_movements() {
        let mut ledger = MemoryLedger::new(1_000);
        ledger.debit(300).unwrap();
        ledger.credit(585);
        assert_eq!(ledger.total_debited, 300);
        assert_eq!(ledger.total_credited, 585);
        assert_eq!(ledger.balance(), 1_285);
    }

    #[test]
    fn test_payout_floors() {
        // 1.95x on 100 chips
        assert_eq!(payout_for(100, 195), 195);
        // Fractional chip is dropped
        assert_eq!(payout_for(33, 195), 64);
        assert_eq!(payout_for(1, 91), 0);
        // No overflow near u64::MAX
        assert_eq!(payout_for(u64::MAX / 100, 100), u64::MAX / 100);
    }
}
