//! Med-out (loss) and revive counts folded from the faction's incoming logs.
//!
//! The logs mix in unrelated activity, so every entry is checked on both
//! sides before it counts.

use std::collections::BTreeMap;

use futures_util::{pin_mut, TryStreamExt};
use tracing::debug;

use crate::error::ApiResult;
use crate::torn::fetcher::Transport;
use crate::torn::models::{FactionAttack, FactionId, Party, PlayerId, Revive};
use crate::torn::TornApi;

pub type PlayerCounts = BTreeMap<PlayerId, u32>;

fn in_faction(party: Option<&Party>, faction_id: FactionId) -> Option<PlayerId> {
    party
        .filter(|party| party.faction_id == Some(faction_id))
        .map(|party| party.id)
}

/// Counts one loss per attack on a `defender` member by an `attacker` member.
pub fn count_losses(
    counts: &mut PlayerCounts,
    attacks: &[FactionAttack],
    defender: FactionId,
    attacker: FactionId,
) {
    for attack in attacks {
        if in_faction(attack.attacker.as_ref(), attacker).is_none() {
            continue;
        }
        if let Some(player) = in_faction(attack.defender.as_ref(), defender) {
            *counts.entry(player).or_insert(0) += 1;
        }
    }
}

/// Counts one revive per reviver when reviver and target are both in `faction`.
pub fn count_revives(counts: &mut PlayerCounts, revives: &[Revive], faction: FactionId) {
    for revive in revives {
        if in_faction(revive.target.as_ref(), faction).is_none() {
            continue;
        }
        if let Some(player) = in_faction(revive.reviver.as_ref(), faction) {
            *counts.entry(player).or_insert(0) += 1;
        }
    }
}

pub async fn aggregate_losses<T: Transport>(
    api: &TornApi<T>,
    defender: FactionId,
    attacker: FactionId,
    start: i64,
    end: i64,
) -> ApiResult<PlayerCounts> {
    let mut counts = PlayerCounts::new();
    let pages = api.incoming_attacks(start, end);
    pin_mut!(pages);
    while let Some(attacks) = pages.try_next().await? {
        count_losses(&mut counts, &attacks, defender, attacker);
    }
    debug!(players = counts.len(), defender, attacker, "losses aggregated");
    Ok(counts)
}

pub async fn aggregate_revives<T: Transport>(
    api: &TornApi<T>,
    faction: FactionId,
    start: i64,
    end: i64,
) -> ApiResult<PlayerCounts> {
    let mut counts = PlayerCounts::new();
    let pages = api.incoming_revives(start, end);
    pin_mut!(pages);
    while let Some(revives) = pages.try_next().await? {
        count_revives(&mut counts, &revives, faction);
    }
    debug!(players = counts.len(), faction, "revives aggregated");
    Ok(counts)
}
