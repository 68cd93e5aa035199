//! Shared types for the moonplay wager engine.
//!
//! Everything that outlives a single function call lives here: outcome
//! items, containers, rounds and their per-game states, ledger deltas,
//! and feed events. All of it carries codec implementations so a host
//! can persist and replay it byte-for-byte.

mod codec;
mod config;
mod constants;
mod error;
mod events;
mod items;
mod round;

pub use codec::{read_string, string_encode_size, write_string};
pub use config::*;
pub use constants::*;
pub use error::EngineError;
pub use events::*;
pub use items::*;
pub use round::*;
