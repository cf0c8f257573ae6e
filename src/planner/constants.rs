// ─────────────────────────────────────────────────────────────────────────────
// Candidate scoring. Changing any of these changes which food gets picked.
// ─────────────────────────────────────────────────────────────────────────────

/// Weight of the relative calorie error in a candidate score.
pub const KCAL_ERROR_WEIGHT: f64 = 0.7;

/// Weight of the normalised ratio deviation in a candidate score.
pub const RATIO_ERROR_WEIGHT: f64 = 0.3;

/// Divisor bringing the ratio L1 distance onto the scale of the calorie error.
pub const RATIO_DEVIATION_SCALE: f64 = 300.0;

/// Deficit (kcal) above which main dishes and rice are evaluated first.
pub const LARGE_DEFICIT_KCAL: f64 = 250.0;

// ─────────────────────────────────────────────────────────────────────────────
// Suggestion parsing and matching
// ─────────────────────────────────────────────────────────────────────────────

/// Items kept per meal slot: staple, soup, main and two sides.
pub const MAX_ITEMS_PER_SLOT: usize = 5;

/// Tokens shorter than this (in characters) are noise.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Characters of a suggested name used as the catalog lookup key.
pub const LOOKUP_KEY_CHARS: usize = 3;

/// Jaro-Winkler similarity needed for a "did you mean" hint.
pub const HINT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Maximum hints shown per unmatched suggestion.
pub const MAX_HINTS: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Taste levels
// ─────────────────────────────────────────────────────────────────────────────

/// Upper bounds (mg sodium) for each salty level but the last.
pub const SALTY_LEVEL_BOUNDS: [f64; 4] = [100.0, 400.0, 800.0, 1200.0];

/// Upper bounds (g sugar) for each sweet level but the last.
pub const SWEET_LEVEL_BOUNDS: [f64; 4] = [5.0, 10.0, 20.0, 30.0];

/// Default number of similar foods listed.
pub const DEFAULT_SIMILAR_COUNT: usize = 10;
