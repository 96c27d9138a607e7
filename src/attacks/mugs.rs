use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::torn::fetcher::Transport;
use crate::torn::models::{MugLogEntry, PlayerId};
use crate::torn::TornApi;

/// Everything mugged from one victim; `link` and `timestamp` belong to the most recent mug.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMug {
    pub defender: PlayerId,
    pub timestamp: i64,
    pub amount: f64,
    pub times_mugged: u32,
    pub link: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MugTotals {
    pub mugs: u32,
    pub total_mugged: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MugReport {
    pub totals: MugTotals,
    pub attacks: Vec<UserMug>,
}

/// Groups mugs by victim, most recent victim first. Recency, not amount,
/// decides which link survives; equal timestamps keep the later entry.
pub fn summarize_mugs(entries: &[MugLogEntry]) -> MugReport {
    let mut totals = MugTotals::default();
    let mut groups: HashMap<PlayerId, UserMug> = HashMap::new();

    for entry in entries {
        totals.mugs += 1;
        totals.total_mugged += entry.data.money_mugged;

        let group = groups.entry(entry.data.defender).or_insert_with(|| UserMug {
            defender: entry.data.defender,
            timestamp: entry.timestamp,
            amount: 0.0,
            times_mugged: 0,
            link: entry.data.log.clone(),
        });
        group.amount += entry.data.money_mugged;
        group.times_mugged += 1;
        if entry.timestamp >= group.timestamp {
            group.timestamp = entry.timestamp;
            group.link = entry.data.log.clone();
        }
    }

    let mut attacks: Vec<UserMug> = groups.into_values().collect();
    attacks.sort_by(|left, right| {
        right
            .timestamp
            .cmp(&left.timestamp)
            .then_with(|| left.defender.cmp(&right.defender))
    });
    MugReport { totals, attacks }
}

pub async fn mug_report<T: Transport>(api: &TornApi<T>, count: usize) -> ApiResult<MugReport> {
    let entries = api.mug_log(count).await?;
    let report = summarize_mugs(&entries);
    debug!(
        mugs = report.totals.mugs,
        victims = report.attacks.len(),
        "mugs summarized"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torn::models::MugData;

    fn mug(defender: PlayerId, timestamp: i64, amount: f64, log: &str) -> MugLogEntry {
        MugLogEntry {
            id: log.to_string(),
            timestamp,
            data: MugData {
                defender,
                money_mugged: amount,
                log: log.to_string(),
            },
        }
    }

    #[test]
    fn latest_mug_link_survives_regardless_of_order() {
        let newest_first = summarize_mugs(&[mug(4, 200, 50.0, "late"), mug(4, 100, 900.0, "early")]);
        let oldest_first = summarize_mugs(&[mug(4, 100, 900.0, "early"), mug(4, 200, 50.0, "late")]);

        for report in [newest_first, oldest_first] {
            assert_eq!(report.attacks.len(), 1);
            let group = &report.attacks[0];
            assert_eq!(group.times_mugged, 2);
            assert_eq!(group.amount, 950.0);
            assert_eq!(group.link, "late");
            assert_eq!(group.timestamp, 200);
        }
    }

    #[test]
    fn totals_cover_every_mug() {
        let report = summarize_mugs(&[
            mug(1, 300, 10.0, "a"),
            mug(2, 200, 20.0, "b"),
            mug(1, 100, 30.0, "c"),
        ]);

        assert_eq!(report.totals.mugs, 3);
        assert_eq!(report.totals.total_mugged, 60.0);
        let victims: Vec<PlayerId> = report.attacks.iter().map(|m| m.defender).collect();
        assert_eq!(victims, vec![1, 2]);
    }
}
