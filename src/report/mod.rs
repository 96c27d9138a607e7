pub mod activity;
pub mod chain;
pub mod war;

pub use activity::{aggregate_losses, aggregate_revives, PlayerCounts};
pub use chain::{aggregate_chains, bonus_respect, ChainTotals, PlayerChainReport};
pub use war::{assemble_war_report, assemble_war_report_at, WarReport};
