pub mod calculator;
pub mod settings;
pub mod stats;

pub use calculator::{calculate_rewards, calculate_war_rewards, rate};
pub use settings::{PayoutType, RewardSettings};
pub use stats::{blank, RewardSummary, UserStats, WarStats};
