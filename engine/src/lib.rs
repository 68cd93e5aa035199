//! Deterministic wager outcome and settlement engine.
//!
//! The engine runs six games (coin flip, crash, mines, blackjack, case
//! openings, case battles) against a host-provided ledger and clock.
//! Every outcome derives from a SHA256 hash chain over the server seed
//! and round id, so any host replaying the same seed, stakes, and
//! timestamps reproduces the same settlements byte for byte.

pub mod engine;
pub mod games;
pub mod ledger;
pub mod odds;
pub mod rng;
pub mod scheduler;
pub mod selector;

pub use engine::{Engine, EventSink, NoopSink, StakeParams};
pub use ledger::{Ledger, MemoryLedger};
pub use rng::{GameRng, ServerSeed};
pub use scheduler::{RevealScheduler, ScheduledStep, StepKind};
