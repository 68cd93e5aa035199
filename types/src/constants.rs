/// House edge in basis points (2.5%), applied to every fair multiplier.
pub const DEFAULT_HOUSE_EDGE_BPS: u16 = 250;

/// Number of tiles on the mines grid.
pub const MINES_GRID_SIZE: u8 = 25;

/// Maximum mine count (at least one tile must be safe).
pub const MINES_MAX_COUNT: u8 = 24;

/// Hand-tuned multiplier table for the 1-mine grid, in hundredths.
/// The first entries sit below fair value as an extra edge adjustment;
/// the 24th entry (all safe tiles revealed) is computed from the fair
/// odds at build time.
pub const ONE_MINE_TABLE_X100: [u64; 23] = [
    91, 95, 99, 104, 110, 115, 122, 129, 137, 146, 157, 169, 183, 199, 219, 244, 274, 314, 366,
    439, 549, 733, 1099,
];

/// Pinned first-reveal multiplier for the 2-mine grid (below fair value).
pub const TWO_MINES_FIRST_REVEAL_X100: u64 = 98;

/// Pinned first-reveal multiplier for the 3-mine grid (exactly break-even).
pub const THREE_MINES_FIRST_REVEAL_X100: u64 = 100;

/// Probability of an instant bust, in basis points (3%).
pub const CRASH_INSTANT_BUST_BPS: u16 = 300;

/// Width of the instant-bust band above 1.00x, in hundredths (1.00-1.04x).
pub const CRASH_INSTANT_BAND_X100: u64 = 4;

/// Cap on the crash bust point, in hundredths (1000x).
pub const CRASH_MAX_X100: u64 = 100_000;

/// Cooldown between crash rounds in milliseconds.
pub const CRASH_COOLDOWN_MS: u64 = 4_000;

/// Coin flip reveal delay in milliseconds.
pub const FLIP_DURATION_MS: u64 = 2_000;

/// Delay before the first blackjack card is dealt.
pub const DEAL_FIRST_MS: u64 = 400;

/// Delay between subsequent blackjack deal steps.
pub const DEAL_STEP_MS: u64 = 800;

/// Delay per dealer card reveal.
pub const DEALER_DRAW_MS: u64 = 1_200;

/// Delay between the last dealer card and settlement.
pub const DEALER_SETTLE_MS: u64 = 800;

/// Case opening spin duration in milliseconds.
pub const SPIN_DURATION_MS: u64 = 3_600;

/// Battle round spin duration in milliseconds.
pub const BATTLE_SPIN_MS: u64 = 4_000;

/// Pause between battle rounds in milliseconds.
pub const BATTLE_GAP_MS: u64 = 1_500;

/// Dealer stands at this total or above.
pub const BLACKJACK_DEALER_STAND: u8 = 17;

/// Payout multipliers for blackjack outcome categories, in hundredths.
pub const BLACKJACK_BONUS_X100: u64 = 250;
pub const BLACKJACK_WIN_X100: u64 = 200;
pub const BLACKJACK_PUSH_X100: u64 = 100;

/// Maximum display-name length for items, containers, and battle slots.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum items per container.
pub const MAX_CONTAINER_ITEMS: usize = 64;

/// Maximum parallel openings in a single case round.
pub const MAX_PARALLEL_OPENINGS: u8 = 4;

/// Maximum cases (rounds) per battle.
pub const MAX_BATTLE_CASES: usize = 50;

/// Maximum slots in any battle mode.
pub const MAX_BATTLE_SLOTS: usize = 6;

/// Names assigned to bots filling battle slots.
pub const BOT_NAMES: [&str; 8] = [
    "Alice", "Bob", "Charlie", "Dave", "Eve", "Frank", "Mixi", "Pinky",
];
