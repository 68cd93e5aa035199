//! Crash: a rising multiplier curve racing the player's cash-out
//! against a pre-drawn bust point.

use moonplay_types::{CrashConfig, CrashPhase, CrashState, EngineError};

use super::{Settlement, StepPlan};
use crate::ledger::payout_for;
use crate::odds::{crash_elapsed_ms, crash_multiplier_x100, sample_bust_x100};
use crate::rng::GameRng;
use crate::scheduler::StepKind;

/// Draw the bust point, pre-solve the instant the curve reaches it,
/// and schedule the crash step.
pub fn stake(rng: &mut GameRng, now: u64, cfg: &CrashConfig) -> (CrashState, StepPlan) {
    let r = rng.next_f64();
    let jitter = rng.next_f64();
    let bust_x100 = sample_bust_x100(r, jitter, cfg);
    let delay_ms = crash_elapsed_ms(bust_x100, cfg);
    let state = CrashState {
        bust_x100,
        crash_at: now + delay_ms,
        cashed_out_x100: None,
        phase: CrashPhase::Running,
    };
    let step = StepPlan {
        delay_ms,
        kind: StepKind::CrashPoint,
    };
    (state, step)
}

/// Lock the live multiplier. Rejected once the clock has reached the
/// crash instant, even if the crash step has not fired yet.
pub fn cash_out(
    state: &mut CrashState,
    stake: u64,
    now: u64,
    created_at: u64,
    cfg: &CrashConfig,
) -> Result<Settlement, EngineError> {
    if state.phase != CrashPhase::Running {
        return Err(EngineError::InvalidStateTransition);
    }
    if now >= state.crash_at {
        return Err(EngineError::InvalidStateTransition);
    }
    let multiplier = crash_multiplier_x100(now - created_at, cfg);
    state.cashed_out_x100 = Some(multiplier);
    state.phase = CrashPhase::CashedOut;
    Ok(Settlement::win(payout_for(stake, multiplier), multiplier))
}

/// Fires when the curve reaches the bust point. A round cashed out
/// earlier already settled; only a running round becomes a loss.
pub fn crash_step(state: &mut CrashState) -> Option<Settlement> {
    if state.phase != CrashPhase::Running {
        return None;
    }
    state.phase = CrashPhase::Crashed;
    Some(Settlement::loss())
}
