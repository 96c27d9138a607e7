//! Splits the configured reward pools across the war's participants.

use tracing::info;

use crate::error::ApiResult;
use crate::report::chain::BASE_BONUS_RESPECT;
use crate::report::war::{assemble_war_report, WarReport};
use crate::rewards::settings::{PayoutType, RewardSettings};
use crate::rewards::stats::{blank, RewardSummary, UserStats, WarStats};
use crate::torn::fetcher::Transport;
use crate::torn::TornApi;

/// Pool per unit of activity. A zero (or NaN) denominator is treated as `1`,
/// so "no activity" shows up as the full pool rather than infinity.
pub fn rate(pool: f64, denominator: f64) -> f64 {
    let denominator = if denominator == 0.0 || denominator.is_nan() {
        1.0
    } else {
        denominator
    };
    pool / denominator
}

/// Respect that was not produced by chain bonus hits.
pub fn calculated_respect(total_respect: f64, total_bonus_respect: f64) -> f64 {
    (total_respect - total_bonus_respect).max(0.0)
}

/// Respect used for a per-respect payout.
///
/// With `ignore_chain_bonus` set, a player holding more than the baseline
/// bonus has `min(bonus - 10, 0)` subtracted. Under that guard the term is
/// always zero, so the adjustment currently never changes anything; a
/// `max` was probably intended. Kept as-is until the intended rule is
/// confirmed.
pub fn adjusted_respect(respect: f64, bonus: f64, ignore_chain_bonus: bool) -> f64 {
    if ignore_chain_bonus && bonus > BASE_BONUS_RESPECT {
        respect - (bonus - BASE_BONUS_RESPECT).min(0.0)
    } else {
        respect
    }
}

/// Med-outs that count under the `min_med_outs` gate.
fn qualifying_med_outs(count: u32, min_med_outs: f64) -> u32 {
    if f64::from(count) >= min_med_outs {
        count
    } else {
        0
    }
}

pub fn war_stats(settings: &RewardSettings, report: &WarReport) -> WarStats {
    let respect_pool = calculated_respect(report.total_respect, report.total_bonus_respect);
    let qualified_med_outs: u32 = report
        .med_outs
        .values()
        .map(|count| qualifying_med_outs(*count, settings.min_med_outs))
        .sum();

    let (reward_per_respect, reward_per_attack) = match settings.payout_type {
        PayoutType::PerRespect => (Some(rate(settings.attack_rewards, respect_pool)), None),
        PayoutType::PerAttack => (
            None,
            Some(rate(settings.attack_rewards, f64::from(report.total_attacks))),
        ),
    };

    WarStats {
        faction_name: report.faction_name.clone(),
        opponent_name: report.opponent_name.clone(),
        ranked_war_id: report.war_id,
        total_attacks: report.total_attacks,
        total_respect: report.total_respect,
        total_bonus_respect: report.total_bonus_respect,
        total_assists: report.total_assists,
        total_med_outs: report.total_med_outs,
        total_revives: report.total_revives,
        reward_per_respect,
        reward_per_attack,
        reward_per_assist: rate(settings.assist_rewards, f64::from(report.total_assists)),
        reward_per_med_out: rate(settings.med_out_rewards, f64::from(qualified_med_outs)),
        reward_per_revive: rate(settings.revive_rewards, f64::from(report.total_revives)),
    }
}

/// Per-player breakdown, omitting players who earned nothing. Sorted by total
/// reward descending, then player id.
pub fn user_stats(settings: &RewardSettings, report: &WarReport, stats: &WarStats) -> Vec<UserStats> {
    let mut users: Vec<UserStats> = report
        .members
        .iter()
        .map(|member| {
            let chain = report.chain_reports.get(&member.id);
            let bonus = chain.map(|chain| chain.bonus);
            let assists = chain.map(|chain| f64::from(chain.assists));
            let med_outs = report.med_outs.get(&member.id).copied().unwrap_or(0);
            let revives = report.revives.get(&member.id).copied().unwrap_or(0);

            let reward_attack_respect = match settings.payout_type {
                PayoutType::PerAttack => {
                    blank(member.attacks) * stats.reward_per_attack.unwrap_or(0.0)
                }
                PayoutType::PerRespect => {
                    let respect = adjusted_respect(
                        blank(member.score),
                        blank(bonus),
                        settings.ignore_chain_bonus,
                    );
                    respect * stats.reward_per_respect.unwrap_or(0.0)
                }
            };
            let reward_assists = blank(assists) * stats.reward_per_assist;
            let reward_med_outs = f64::from(qualifying_med_outs(med_outs, settings.min_med_outs))
                * stats.reward_per_med_out;
            let reward_revives = f64::from(revives) * stats.reward_per_revive;
            let total_rewards =
                reward_attack_respect + reward_assists + reward_med_outs + reward_revives;

            UserStats {
                id: member.id,
                name: member.name.clone(),
                attacks: blank(member.attacks),
                respect: blank(member.score),
                bonus_respect: blank(bonus),
                assists: blank(assists),
                med_outs: f64::from(med_outs),
                revives: f64::from(revives),
                reward_attack_respect: blank(reward_attack_respect),
                reward_assists: blank(reward_assists),
                reward_med_outs: blank(reward_med_outs),
                reward_revives: blank(reward_revives),
                total_rewards: blank(total_rewards),
            }
        })
        .filter(UserStats::earned_anything)
        .collect();

    users.sort_by(|left, right| {
        right
            .total_rewards
            .total_cmp(&left.total_rewards)
            .then_with(|| left.id.cmp(&right.id))
    });
    users
}

pub fn calculate_rewards(settings: &RewardSettings, report: &WarReport) -> RewardSummary {
    let war_stats = war_stats(settings, report);
    let user_stats = user_stats(settings, report, &war_stats);
    RewardSummary {
        war_stats,
        user_stats,
    }
}

/// Assembles the last war and computes payouts. `None` when there is no war data.
pub async fn calculate_war_rewards<T: Transport>(
    api: &TornApi<T>,
    settings: &RewardSettings,
) -> ApiResult<Option<RewardSummary>> {
    let Some(report) = assemble_war_report(api).await? else {
        return Ok(None);
    };
    let summary = calculate_rewards(settings, &report);
    info!(
        war_id = summary.war_stats.ranked_war_id,
        rewarded = summary.user_stats.len(),
        "rewards calculated"
    );
    Ok(Some(summary))
}
