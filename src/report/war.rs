//! Assembles one consistent dataset for the faction's last concluded ranked war.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::report::activity::{aggregate_losses, aggregate_revives, PlayerCounts};
use crate::report::chain::{aggregate_chains, ChainTotals};
use crate::rewards::stats::blank;
use crate::torn::fetcher::Transport;
use crate::torn::models::{FactionId, WarMember};
use crate::torn::TornApi;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarReport {
    pub faction_id: FactionId,
    pub faction_name: String,
    pub opponent_id: FactionId,
    pub opponent_name: String,
    pub war_id: u64,
    pub start: i64,
    pub end: i64,
    pub total_attacks: u32,
    pub total_respect: f64,
    pub total_assists: u32,
    pub total_bonus_respect: f64,
    pub total_med_outs: u32,
    pub total_revives: u32,
    pub members: Vec<WarMember>,
    pub chain_reports: ChainTotals,
    pub med_outs: PlayerCounts,
    pub revives: PlayerCounts,
}

/// Assembles the report "as of now" for a war still in progress.
pub async fn assemble_war_report<T: Transport>(api: &TornApi<T>) -> ApiResult<Option<WarReport>> {
    assemble_war_report_at(api, chrono::Utc::now().timestamp()).await
}

/// Walks faction -> last concluded war -> war report -> both factions and
/// returns `None` at the first missing link. `now` closes the window when the
/// report carries no end.
pub async fn assemble_war_report_at<T: Transport>(
    api: &TornApi<T>,
    now: i64,
) -> ApiResult<Option<WarReport>> {
    let Some(faction) = api.faction_basic().await? else {
        debug!("no faction for credential");
        return Ok(None);
    };
    let Some(war_id) = api.last_war_id(faction.id).await? else {
        debug!(faction_id = faction.id, "no concluded ranked war");
        return Ok(None);
    };
    let Some(report) = api.ranked_war_report(war_id).await? else {
        debug!(war_id, "ranked war report missing");
        return Ok(None);
    };
    let Some(ours) = report.factions.iter().find(|f| f.id == faction.id) else {
        debug!(war_id, faction_id = faction.id, "faction absent from war report");
        return Ok(None);
    };
    let Some(opponent) = report.factions.iter().find(|f| f.id != faction.id) else {
        debug!(war_id, "opponent absent from war report");
        return Ok(None);
    };

    let start = report.start;
    let end = report.end.filter(|end| *end > 0).unwrap_or(now);

    let (chain_reports, med_outs, revives) = tokio::try_join!(
        aggregate_chains(api, start, end),
        aggregate_losses(api, ours.id, opponent.id, start, end),
        aggregate_revives(api, ours.id, start, end),
    )?;

    let total_bonus_respect = chain_reports.values().map(|player| player.bonus).sum();
    let total_assists = chain_reports.values().map(|player| player.assists).sum();
    let total_med_outs = med_outs.values().sum();
    let total_revives = revives.values().sum();

    let assembled = WarReport {
        faction_id: ours.id,
        faction_name: ours.name.clone(),
        opponent_id: opponent.id,
        opponent_name: opponent.name.clone(),
        war_id: report.id,
        start,
        end,
        total_attacks: ours.attacks.unwrap_or_default(),
        total_respect: blank(ours.score),
        total_assists,
        total_bonus_respect,
        total_med_outs,
        total_revives,
        members: ours.members.clone(),
        chain_reports,
        med_outs,
        revives,
    };
    info!(
        war_id = assembled.war_id,
        faction = %assembled.faction_name,
        opponent = %assembled.opponent_name,
        attacks = assembled.total_attacks,
        "war report assembled"
    );
    Ok(Some(assembled))
}
