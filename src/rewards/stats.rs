use serde::Serialize;

use crate::torn::models::PlayerId;

/// Collapses absent or NaN values to `0`. Applied wherever a computed value
/// becomes a reported field.
pub fn blank(value: impl Into<Option<f64>>) -> f64 {
    match value.into() {
        Some(value) if !value.is_nan() => value,
        _ => 0.0,
    }
}

/// Faction-level totals and per-unit rates for one war.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarStats {
    pub faction_name: String,
    pub opponent_name: String,
    pub ranked_war_id: u64,
    pub total_attacks: u32,
    pub total_respect: f64,
    pub total_bonus_respect: f64,
    pub total_assists: u32,
    pub total_med_outs: u32,
    pub total_revives: u32,
    /// Only set in per-respect mode.
    pub reward_per_respect: Option<f64>,
    /// Only set in per-attack mode.
    pub reward_per_attack: Option<f64>,
    pub reward_per_assist: f64,
    pub reward_per_med_out: f64,
    pub reward_per_revive: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub id: PlayerId,
    pub name: String,
    pub attacks: f64,
    pub respect: f64,
    pub bonus_respect: f64,
    pub assists: f64,
    pub med_outs: f64,
    pub revives: f64,
    pub reward_attack_respect: f64,
    pub reward_assists: f64,
    pub reward_med_outs: f64,
    pub reward_revives: f64,
    pub total_rewards: f64,
}

impl UserStats {
    /// True when at least one reward field is non-zero.
    pub fn earned_anything(&self) -> bool {
        [
            self.reward_attack_respect,
            self.reward_assists,
            self.reward_med_outs,
            self.reward_revives,
            self.total_rewards,
        ]
        .iter()
        .any(|reward| *reward != 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSummary {
    pub war_stats: WarStats,
    pub user_stats: Vec<UserStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_collapses_missing_and_nan() {
        assert_eq!(blank(f64::NAN), 0.0);
        assert_eq!(blank(None), 0.0);
        assert_eq!(blank(0.0), 0.0);
        assert_eq!(blank(5.0), 5.0);
        assert_eq!(blank(Some(-2.5)), -2.5);
    }
}
