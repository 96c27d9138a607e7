//! Torn v2 response payloads, trimmed to the fields the reports read.
//!
//! Every field tolerates absence: upstream data is frequently partial and a
//! missing record is a normal outcome, not a decode failure.

use serde::{Deserialize, Serialize};

use crate::torn::fetcher::Page;

pub type PlayerId = u64;
pub type FactionId = u64;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FactionBasicResponse {
    #[serde(default)]
    pub basic: Option<FactionBasic>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactionBasic {
    pub id: FactionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankedWarsResponse {
    #[serde(default)]
    pub rankedwars: Vec<RankedWarSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankedWarSummary {
    pub id: u64,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankedWarReportResponse {
    #[serde(default)]
    pub rankedwarreport: Option<RankedWarReport>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankedWarReport {
    pub id: u64,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: Option<i64>,
    #[serde(default)]
    pub factions: Vec<WarFaction>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WarFaction {
    pub id: FactionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub attacks: Option<u32>,
    #[serde(default)]
    pub members: Vec<WarMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarMember {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub attacks: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainsPage {
    #[serde(default)]
    pub chains: Vec<ChainSummary>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChainSummary {
    pub id: u64,
    #[serde(default)]
    pub chain: u32,
    #[serde(default)]
    pub respect: f64,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
}

impl Page for ChainsPage {
    type Record = ChainSummary;

    fn into_parts(self) -> (Vec<ChainSummary>, Option<String>) {
        (self.chains, self.metadata.links.next)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainReportResponse {
    #[serde(default)]
    pub chainreport: Option<ChainReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChainReport {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub faction_id: FactionId,
    #[serde(default)]
    pub bonuses: Vec<ChainBonus>,
    #[serde(default)]
    pub attackers: Vec<ChainAttacker>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChainBonus {
    pub attacker_id: PlayerId,
    #[serde(default)]
    pub defender_id: PlayerId,
    #[serde(default)]
    pub chain: u32,
    #[serde(default)]
    pub respect: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChainAttacker {
    pub id: PlayerId,
    #[serde(default)]
    pub attacks: Option<ChainAttackerCounts>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChainAttackerCounts {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub assists: u32,
}

/// One side of a logged attack or revive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Party {
    pub id: PlayerId,
    #[serde(default)]
    pub faction_id: Option<FactionId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttackLogPage {
    #[serde(default)]
    pub attacks: Vec<FactionAttack>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactionAttack {
    pub id: u64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub started: i64,
    #[serde(default)]
    pub ended: i64,
    #[serde(default)]
    pub attacker: Option<Party>,
    #[serde(default)]
    pub defender: Option<Party>,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub respect_gain: f64,
    #[serde(default)]
    pub respect_loss: f64,
}

impl Page for AttackLogPage {
    type Record = FactionAttack;

    fn into_parts(self) -> (Vec<FactionAttack>, Option<String>) {
        (self.attacks, self.metadata.links.next)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviveLogPage {
    #[serde(default)]
    pub revives: Vec<Revive>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Revive {
    pub id: u64,
    #[serde(default)]
    pub reviver: Option<Party>,
    #[serde(default)]
    pub target: Option<Party>,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl Page for ReviveLogPage {
    type Record = Revive;

    fn into_parts(self) -> (Vec<Revive>, Option<String>) {
        (self.revives, self.metadata.links.next)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserAttacksPage {
    #[serde(default)]
    pub attacks: Vec<UserAttack>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

impl Page for UserAttacksPage {
    type Record = UserAttack;

    fn into_parts(self) -> (Vec<UserAttack>, Option<String>) {
        (self.attacks, self.metadata.links.next)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserAttack {
    pub id: u64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub started: i64,
    #[serde(default)]
    pub ended: i64,
    #[serde(default)]
    pub defender: Option<Opponent>,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub respect_gain: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub faction: Option<FactionRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionRef {
    pub id: FactionId,
    #[serde(default)]
    pub name: String,
}

fn unit() -> f64 {
    1.0
}

/// Situational multipliers the game applied to an attack's respect.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Modifiers {
    #[serde(default = "unit")]
    pub fair_fight: f64,
    #[serde(default = "unit")]
    pub war: f64,
    #[serde(default = "unit")]
    pub retaliation: f64,
    #[serde(default = "unit")]
    pub group: f64,
    #[serde(default = "unit")]
    pub overseas: f64,
    #[serde(default = "unit")]
    pub chain: f64,
    #[serde(default = "unit")]
    pub warlord: f64,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            fair_fight: 1.0,
            war: 1.0,
            retaliation: 1.0,
            group: 1.0,
            overseas: 1.0,
            chain: 1.0,
            warlord: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserLogPage {
    #[serde(default)]
    pub log: Vec<MugLogEntry>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

impl Page for UserLogPage {
    type Record = MugLogEntry;

    fn into_parts(self) -> (Vec<MugLogEntry>, Option<String>) {
        (self.log, self.metadata.links.next)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MugLogEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub data: MugData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MugData {
    #[serde(default)]
    pub defender: PlayerId,
    #[serde(default)]
    pub money_mugged: f64,
    #[serde(default)]
    pub log: String,
}
