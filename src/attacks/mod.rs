pub mod mugs;
pub mod weighting;

pub use mugs::{mug_report, summarize_mugs, MugReport, MugTotals, UserMug};
pub use weighting::{
    build_attacks_report, group_by_opponent, rank_opponents, user_attacks_report,
    weighted_respect, Outcome, UserAttacksReport, WeightedUserAttack,
};
