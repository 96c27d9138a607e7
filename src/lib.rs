//! Ranked war payout calculator for Torn factions.
//!
//! Pulls war, chain, attack and revive logs from the Torn v2 API, folds them
//! into per-player statistics and splits configured reward pools.

pub mod attacks;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod rewards;
pub mod server;
pub mod torn;

pub use error::{ApiError, SettingsError};
