use super::{
    BATTLE_GAP_MS, BATTLE_SPIN_MS, CRASH_COOLDOWN_MS, CRASH_INSTANT_BAND_X100,
    CRASH_INSTANT_BUST_BPS, CRASH_MAX_X100, DEAL_FIRST_MS, DEAL_STEP_MS, DEALER_DRAW_MS,
    DEALER_SETTLE_MS, DEFAULT_HOUSE_EDGE_BPS, FLIP_DURATION_MS, MINES_GRID_SIZE, SPIN_DURATION_MS,
};

/// Engine-wide configuration.
///
/// Every per-game constant the source code hard-coded inline is hoisted
/// here so there is a single source of truth and tests can parameterize
/// the odds builders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// House edge in basis points, applied to fair multipliers.
    pub house_edge_bps: u16,
    /// Mines grid size (tiles).
    pub grid_size: u8,
    pub crash: CrashConfig,
    pub timing: RevealTiming,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            house_edge_bps: DEFAULT_HOUSE_EDGE_BPS,
            grid_size: MINES_GRID_SIZE,
            crash: CrashConfig::default(),
            timing: RevealTiming::default(),
        }
    }
}

/// Parameters of the crash bust-point distribution and round pacing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrashConfig {
    /// Probability of an instant bust, in basis points.
    pub instant_bust_bps: u16,
    /// Width of the instant-bust band above 1.00x, in hundredths.
    pub instant_band_x100: u64,
    /// Cap on the bust point, in hundredths.
    pub max_multiplier_x100: u64,
    /// Cooldown after a crash before the next stake is accepted.
    pub cooldown_ms: u64,
}

impl Default for CrashConfig {
    fn default() -> Self {
        Self {
            instant_bust_bps: CRASH_INSTANT_BUST_BPS,
            instant_band_x100: CRASH_INSTANT_BAND_X100,
            max_multiplier_x100: CRASH_MAX_X100,
            cooldown_ms: CRASH_COOLDOWN_MS,
        }
    }
}

/// Delays between reveal steps. Pacing only: outcomes are fixed before
/// the first step is scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealTiming {
    pub flip_ms: u64,
    pub deal_first_ms: u64,
    pub deal_step_ms: u64,
    pub dealer_draw_ms: u64,
    pub dealer_settle_ms: u64,
    pub spin_ms: u64,
    pub battle_spin_ms: u64,
    pub battle_gap_ms: u64,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            flip_ms: FLIP_DURATION_MS,
            deal_first_ms: DEAL_FIRST_MS,
            deal_step_ms: DEAL_STEP_MS,
            dealer_draw_ms: DEALER_DRAW_MS,
            dealer_settle_ms: DEALER_SETTLE_MS,
            spin_ms: SPIN_DURATION_MS,
            battle_spin_ms: BATTLE_SPIN_MS,
            battle_gap_ms: BATTLE_GAP_MS,
        }
    }
}

impl RevealTiming {
    /// Zero delays: every scheduled step becomes due immediately.
    /// Used by tests and headless simulations.
    pub fn immediate() -> Self {
        Self {
            flip_ms: 0,
            deal_first_ms: 0,
            deal_step_ms: 0,
            dealer_draw_ms: 0,
            dealer_settle_ms: 0,
            spin_ms: 0,
            battle_spin_ms: 0,
            battle_gap_ms: 0,
        }
    }
}
