use thiserror::Error;

/// Engine error taxonomy.
///
/// `Configuration` is fatal: engine or round construction is aborted
/// entirely. Everything else is local and recoverable: the round and
/// ledger remain in their prior valid state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Stake exceeds the available balance. Rejected before any debit.
    #[error("insufficient funds for stake")]
    InsufficientFunds,
    /// Stake is zero (or otherwise not a positive amount).
    #[error("stake must be positive")]
    InvalidStake,
    /// Malformed container or engine configuration. Must never occur
    /// for shipped content.
    #[error("configuration error: {0}")]
    Configuration(&'static str),
    /// Action is not legal in the round's current state. The round is
    /// left untouched.
    #[error("action not legal in current round state")]
    InvalidStateTransition,
    /// Two actions raced against one round; the first writer won.
    #[error("round version conflict: expected {expected}, found {found}")]
    ConcurrencyConflict { expected: u32, found: u32 },
    /// No round with the given id.
    #[error("unknown round")]
    UnknownRound,
    /// No container with the given id.
    #[error("unknown container")]
    UnknownContainer,
}
