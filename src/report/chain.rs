//! Per-player chain bonus respect and assists across every chain in a window.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::torn::fetcher::Transport;
use crate::torn::models::{ChainReport, PlayerId};
use crate::torn::TornApi;

/// Respect every chain bonus hit carries regardless of the milestone.
pub const BASE_BONUS_RESPECT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerChainReport {
    pub id: PlayerId,
    pub bonus: f64,
    pub assists: u32,
}

impl PlayerChainReport {
    fn empty(id: PlayerId) -> Self {
        Self {
            id,
            bonus: 0.0,
            assists: 0,
        }
    }
}

pub type ChainTotals = BTreeMap<PlayerId, PlayerChainReport>;

/// Reward-eligible part of a bonus hit: anything above the flat baseline.
pub fn bonus_respect(respect: f64) -> f64 {
    (respect - BASE_BONUS_RESPECT).max(0.0)
}

/// Folds one chain report into the running totals.
pub fn fold_chain_report(totals: &mut ChainTotals, report: &ChainReport) {
    for bonus in &report.bonuses {
        totals
            .entry(bonus.attacker_id)
            .or_insert_with(|| PlayerChainReport::empty(bonus.attacker_id))
            .bonus += bonus_respect(bonus.respect);
    }

    for attacker in &report.attackers {
        let assists = attacker.attacks.as_ref().map_or(0, |counts| counts.assists);
        totals
            .entry(attacker.id)
            .or_insert_with(|| PlayerChainReport::empty(attacker.id))
            .assists += assists;
    }
}

/// Fetches every chain in `[start, end]` and accumulates bonuses and assists per player.
pub async fn aggregate_chains<T: Transport>(
    api: &TornApi<T>,
    start: i64,
    end: i64,
) -> ApiResult<ChainTotals> {
    let mut totals = ChainTotals::new();
    for chain_id in api.chain_ids(start, end).await? {
        match api.chain_report(chain_id).await? {
            Some(report) => fold_chain_report(&mut totals, &report),
            None => warn!(chain_id, "chain report missing, skipping"),
        }
    }
    debug!(players = totals.len(), "chain totals aggregated");
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torn::models::{ChainAttacker, ChainAttackerCounts, ChainBonus};

    fn bonus(attacker_id: PlayerId, respect: f64) -> ChainBonus {
        ChainBonus {
            attacker_id,
            defender_id: 0,
            chain: 10,
            respect,
        }
    }

    fn attacker(id: PlayerId, assists: u32) -> ChainAttacker {
        ChainAttacker {
            id,
            attacks: Some(ChainAttackerCounts { total: 0, assists }),
        }
    }

    #[test]
    fn bonus_respect_clips_the_baseline() {
        assert_eq!(bonus_respect(4.0), 0.0);
        assert_eq!(bonus_respect(10.0), 0.0);
        assert_eq!(bonus_respect(40.0), 30.0);
    }

    #[test]
    fn totals_accumulate_across_chains() {
        let first = ChainReport {
            bonuses: vec![bonus(1, 5.0)],
            attackers: vec![attacker(1, 2), attacker(2, 1)],
            ..ChainReport::default()
        };
        let second = ChainReport {
            bonuses: vec![bonus(1, 15.0), bonus(3, 20.0)],
            attackers: vec![attacker(1, 3)],
            ..ChainReport::default()
        };

        let mut totals = ChainTotals::new();
        fold_chain_report(&mut totals, &first);
        fold_chain_report(&mut totals, &second);

        assert_eq!(totals[&1].bonus, 5.0);
        assert_eq!(totals[&1].assists, 5);
        assert_eq!(totals[&2].assists, 1);
        assert_eq!(totals[&2].bonus, 0.0);
        assert_eq!(totals[&3].bonus, 10.0);
        assert_eq!(totals[&3].assists, 0);
    }

    #[test]
    fn attacker_without_counts_adds_no_assists() {
        let report = ChainReport {
            attackers: vec![ChainAttacker { id: 9, attacks: None }],
            ..ChainReport::default()
        };
        let mut totals = ChainTotals::new();
        fold_chain_report(&mut totals, &report);
        assert_eq!(totals[&9], PlayerChainReport::empty(9));
    }
}
