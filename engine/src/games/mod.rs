//! Game transition logic.
//!
//! Each module holds the pure rules of one game: functions take state,
//! an RNG stream, and configuration, and return new state plus reveal
//! steps to schedule. Ledger movements and event emission stay in the
//! engine.

pub mod battles;
pub mod blackjack;
pub mod cases;
pub mod coin_flip;
pub mod crash;
pub mod mines;


use crate::scheduler::StepKind;

/// A reveal step to schedule, relative to the current time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepPlan {
    pub delay_ms: u64,
    pub kind: StepKind,
}

/// A finished round's result, to be applied by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub payout: u64,
    pub multiplier_x100: u64,
    pub items: Vec<u16>,
}

impl Settlement {
    pub fn loss() -> Self {
        Self {
            payout: 0,
            multiplier_x100: 0,
            items: Vec::new(),
        }
    }

    pub fn win(payout: u64, multiplier_x100: u64) -> Self {
        Self {
            payout,
            multiplier_x100,
            items: Vec::new(),
        }
    }
}
