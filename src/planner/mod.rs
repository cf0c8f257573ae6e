pub mod calculations;
pub mod constants;
pub mod matching;
pub mod rebalance;
pub mod taste;

pub use calculations::{Totals, plan_score, relative_kcal_error, totals};
pub use matching::{
    DropReason, DroppedSuggestion, MatchOutcome, lookup_key, match_suggestions, nearest_names,
};
pub use rebalance::{
    IterationLog, RebalanceAction, RebalanceOutcome, RebalanceStatus, candidate_pool, rebalance,
};
pub use taste::{SaltyLevel, SweetLevel, similar_by_sodium, similar_by_sugar};
