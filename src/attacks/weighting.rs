//! Ranks the caller's recent opponents by respect with the situational
//! multipliers divided back out.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::torn::fetcher::Transport;
use crate::torn::models::{Modifiers, Opponent, PlayerId, UserAttack};
use crate::torn::TornApi;

const WIN_RESULTS: [&str; 3] = ["attacked", "hospitalized", "mugged"];
const LOSS_RESULT: &str = "lost";
const STALEMATE_RESULT: &str = "stalemate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Stalemate,
    Other,
}

impl Outcome {
    pub fn classify(result: &str) -> Self {
        let result = result.trim().to_ascii_lowercase();
        if WIN_RESULTS.contains(&result.as_str()) {
            Self::Win
        } else if result == LOSS_RESULT {
            Self::Loss
        } else if result == STALEMATE_RESULT {
            Self::Stalemate
        } else {
            Self::Other
        }
    }
}

/// `respect_gain` divided by the chain, group, overseas, retaliation, war and
/// warlord multipliers. A non-positive product yields `0`.
pub fn weighted_respect(respect_gain: f64, modifiers: &Modifiers) -> f64 {
    let product = modifiers.chain
        * modifiers.group
        * modifiers.overseas
        * modifiers.retaliation
        * modifiers.war
        * modifiers.warlord;
    if product > 0.0 {
        respect_gain / product
    } else {
        0.0
    }
}

/// Best attack against one opponent plus the outcome tallies against them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedUserAttack {
    pub id: String,
    pub defender: Opponent,
    pub weighted_respect: f64,
    pub fair_fight: f64,
    pub wins: u32,
    pub losses: u32,
    pub stalemates: u32,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAttacksReport {
    /// Attack count per raw result label.
    pub totals: BTreeMap<String, u32>,
    pub attacks: Vec<WeightedUserAttack>,
}

/// One record per opponent, in first-seen order. The representative is the
/// attack with the highest weighted respect; ties keep the earlier attack.
pub fn group_by_opponent(attacks: &[UserAttack], min_respect: Option<f64>) -> Vec<WeightedUserAttack> {
    let mut order: Vec<PlayerId> = Vec::new();
    let mut groups: HashMap<PlayerId, WeightedUserAttack> = HashMap::new();

    for attack in attacks {
        if min_respect.is_some_and(|min| attack.respect_gain < min) {
            continue;
        }
        let Some(defender) = attack.defender.as_ref() else {
            continue;
        };
        let outcome = Outcome::classify(&attack.result);
        let weighted = weighted_respect(attack.respect_gain, &attack.modifiers);

        let group = groups.entry(defender.id).or_insert_with(|| {
            order.push(defender.id);
            WeightedUserAttack {
                id: attack.code.clone(),
                defender: defender.clone(),
                weighted_respect: weighted,
                fair_fight: attack.modifiers.fair_fight,
                wins: 0,
                losses: 0,
                stalemates: 0,
                result: attack.result.clone(),
            }
        });

        match outcome {
            Outcome::Win => group.wins += 1,
            Outcome::Loss => group.losses += 1,
            Outcome::Stalemate => group.stalemates += 1,
            Outcome::Other => {}
        }

        if weighted > group.weighted_respect {
            group.id = attack.code.clone();
            group.defender = defender.clone();
            group.weighted_respect = weighted;
            group.fair_fight = attack.modifiers.fair_fight;
            group.result = attack.result.clone();
        }
    }

    order
        .into_iter()
        .filter_map(|id| groups.remove(&id))
        .collect()
}

/// Opponents worth attacking again: at least one win and positive weighted
/// respect, best first.
pub fn rank_opponents(attacks: &[UserAttack], min_respect: Option<f64>) -> Vec<WeightedUserAttack> {
    let mut ranked: Vec<WeightedUserAttack> = group_by_opponent(attacks, min_respect)
        .into_iter()
        .filter(|group| group.wins > 0 && group.weighted_respect > 0.0)
        .collect();
    ranked.sort_by(|left, right| right.weighted_respect.total_cmp(&left.weighted_respect));
    ranked
}

pub fn result_totals(attacks: &[UserAttack]) -> BTreeMap<String, u32> {
    let mut totals = BTreeMap::new();
    for attack in attacks {
        *totals.entry(attack.result.clone()).or_insert(0) += 1;
    }
    totals
}

pub fn build_attacks_report(attacks: &[UserAttack], min_respect: Option<f64>) -> UserAttacksReport {
    UserAttacksReport {
        totals: result_totals(attacks),
        attacks: rank_opponents(attacks, min_respect),
    }
}

/// Loads up to `count` recent attacks and ranks the opponents.
pub async fn user_attacks_report<T: Transport>(
    api: &TornApi<T>,
    count: usize,
    min_respect: Option<f64>,
) -> ApiResult<UserAttacksReport> {
    let attacks = api.user_attacks(count).await?;
    let report = build_attacks_report(&attacks, min_respect);
    debug!(
        loaded = attacks.len(),
        ranked = report.attacks.len(),
        "user attacks ranked"
    );
    Ok(report)
}
