use futures_util::stream::Stream;
use tracing::debug;

use crate::error::ApiResult;
use crate::torn::fetcher::{collect_records, Fetcher, HttpTransport, PageRequest, Transport};
use crate::torn::models::{
    AttackLogPage, ChainReport, ChainReportResponse, ChainsPage, FactionAttack, FactionBasic,
    FactionBasicResponse, FactionId, MugLogEntry, RankedWarReport, RankedWarReportResponse,
    RankedWarsResponse, Revive, ReviveLogPage, UserAttack, UserAttacksPage, UserLogPage,
};

pub const CHAIN_PAGE_SIZE: u32 = 100;
pub const LOG_PAGE_SIZE: u32 = 1000;
pub const USER_ATTACK_PAGE_SIZE: usize = 100;
/// User log type id for "Attack mug".
pub const ATTACK_MUG_LOG_ID: u32 = 8155;

/// Endpoint-level client for the Torn v2 API. Holds the credential for the
/// lifetime of one calculation; everything it returns is owned by the caller.
#[derive(Debug, Clone)]
pub struct TornApi<T = HttpTransport> {
    fetcher: Fetcher<T>,
}

impl<T: Transport> TornApi<T> {
    pub fn with_transport(
        transport: T,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher: Fetcher::new(transport, api_key, base_url),
        }
    }

    /// Identity of the faction the credential belongs to.
    pub async fn faction_basic(&self) -> ApiResult<Option<FactionBasic>> {
        let response: FactionBasicResponse =
            self.fetcher.get(&PageRequest::new("faction/basic")).await?;
        Ok(response.basic)
    }

    /// Most recent ranked war that has finished. The upstream list is newest first.
    pub async fn last_war_id(&self, faction_id: FactionId) -> ApiResult<Option<u64>> {
        let request = PageRequest::new(format!("faction/{faction_id}/rankedwars"));
        let response: RankedWarsResponse = self.fetcher.get(&request).await?;
        Ok(response
            .rankedwars
            .iter()
            .find(|war| war.end.is_some_and(|end| end > 0))
            .map(|war| war.id))
    }

    pub async fn ranked_war_report(&self, war_id: u64) -> ApiResult<Option<RankedWarReport>> {
        let request = PageRequest::new(format!("faction/{war_id}/rankedwarreport"));
        let response: RankedWarReportResponse = self.fetcher.get(&request).await?;
        Ok(response.rankedwarreport)
    }

    /// Ids of every chain the faction ran inside `[start, end]`, oldest first.
    pub async fn chain_ids(&self, start: i64, end: i64) -> ApiResult<Vec<u64>> {
        let request = PageRequest::new("faction/chains")
            .param("limit", CHAIN_PAGE_SIZE)
            .param("sort", "ASC")
            .param("from", start)
            .param("to", end);
        let chains = collect_records(self.fetcher.pages::<ChainsPage>(&request), None).await?;
        debug!(count = chains.len(), start, end, "chains in window");
        Ok(chains.into_iter().map(|chain| chain.id).collect())
    }

    pub async fn chain_report(&self, chain_id: u64) -> ApiResult<Option<ChainReport>> {
        let request = PageRequest::new(format!("faction/{chain_id}/chainreport"));
        let response: ChainReportResponse = self.fetcher.get(&request).await?;
        Ok(response.chainreport)
    }

    /// Attacks received by the faction. `end <= start` leaves the window open-ended.
    pub fn incoming_attacks(
        &self,
        start: i64,
        end: i64,
    ) -> impl Stream<Item = ApiResult<Vec<FactionAttack>>> + Send + '_ {
        let request = incoming_log_request("faction/attacksfull", start, end);
        self.fetcher.pages::<AttackLogPage>(&request)
    }

    /// Revives received by the faction, with the same window rule as attacks.
    pub fn incoming_revives(
        &self,
        start: i64,
        end: i64,
    ) -> impl Stream<Item = ApiResult<Vec<Revive>>> + Send + '_ {
        let request =
            incoming_log_request("faction/revivesFull", start, end).param("striptags", "true");
        self.fetcher.pages::<ReviveLogPage>(&request)
    }

    /// Up to `count` of the caller's most recent outgoing attacks.
    pub async fn user_attacks(&self, count: usize) -> ApiResult<Vec<UserAttack>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let request = PageRequest::new("user/attacks")
            .param("filters", "outgoing")
            .param("sort", "DESC")
            .param("limit", count.min(USER_ATTACK_PAGE_SIZE));
        collect_records(self.fetcher.pages::<UserAttacksPage>(&request), Some(count)).await
    }

    /// Up to `count` of the caller's most recent mugging log entries.
    pub async fn mug_log(&self, count: usize) -> ApiResult<Vec<MugLogEntry>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let request = PageRequest::new("user/log")
            .param("log", ATTACK_MUG_LOG_ID)
            .param("sort", "DESC")
            .param("limit", count.min(USER_ATTACK_PAGE_SIZE));
        collect_records(self.fetcher.pages::<UserLogPage>(&request), Some(count)).await
    }
}

fn incoming_log_request(path: &str, start: i64, end: i64) -> PageRequest {
    PageRequest::new(path)
        .param("filters", "incoming")
        .param("limit", LOG_PAGE_SIZE)
        .param("sort", "ASC")
        .param("from", start)
        .param_if(end > start, "to", end)
}
