// Run values for whole-position evaluation.
// "Open" runs have both ends free, "half" runs have one end against the
// opponent or the board edge. Runs closed on both ends are worth nothing.
pub const VAL_FIVE: i32 = 1_000_000;
pub const VAL_OPEN_FOUR: i32 = 100_000;
pub const VAL_HALF_FOUR: i32 = 10_000;
pub const VAL_OPEN_THREE: i32 = 5_000;
pub const VAL_HALF_THREE: i32 = 500;
pub const VAL_OPEN_TWO: i32 = 200;
pub const VAL_HALF_TWO: i32 = 20;
pub const VAL_OPEN_ONE: i32 = 10;
pub const VAL_HALF_ONE: i32 = 1;

// Five-cell window values for move ordering, indexed by stone count
// already in the window (the candidate itself excluded).
pub const WINDOW_EMPTY: i32 = 7;
pub const WINDOW_OWN: [i32; 4] = [0, 35, 800, 15_000];
pub const WINDOW_OPPONENT: [i32; 5] = [0, 15, 400, 1_800, 100_000];

// Search bounds.
pub const WIN_SCORE: i32 = 100_000_000;
pub const INFINITY: i32 = 1_000_000_000;
