// Parsed league tables and the bundle threaded through every report.

use crate::data::store::PeriodStore;
use crate::stats::derive::CumulativeStats;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One player's season-to-date counters as of a period boundary.
#[derive(Debug, Clone, Default)]
pub struct StatRow {
    pub player_ref: String,
    /// NHL team abbreviation from the stats export.
    pub team: String,
    /// Raw position string from the stats export.
    pub pos: String,
    pub stats: CumulativeStats,
}

/// One fantasy roster assignment for a period.
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub player_id: String,
    pub team: String,
    /// Raw reserve flag: "R", "N/A", or anything else for active.
    pub reserve: String,
}

#[derive(Debug, Clone)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub birth_date: String,
    pub pos: String,
    pub nhl_team: String,
}

#[derive(Debug, Clone)]
pub struct Contract {
    pub id: String,
    pub salary: f64,
    pub contract: String,
}

/// A fantasy team. All source columns are kept and serialized verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct TeamInfo {
    #[serde(skip)]
    pub abbr: String,
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    pub division: String,
    #[serde(flatten)]
    pub columns: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct TeamCash {
    pub team: String,
    pub cash: f64,
}

#[derive(Debug, Clone)]
pub struct Owner {
    pub team: String,
    pub owner: String,
    pub email: String,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct DraftPick {
    pub pick: String,
    /// Abbreviation of the team currently holding the pick.
    pub owner: String,
}

/// A player known to have appeared for more than one NHL team.
#[derive(Debug, Clone)]
pub struct MultiTeamPlayer {
    pub player_ref: String,
    pub team: String,
}

// ---------------------------------------------------------------------------
// LeagueData
// ---------------------------------------------------------------------------

/// Everything a report needs: the period store plus the reference tables.
///
/// Lookups by key return the first matching row, mirroring how the exports
/// are read top to bottom.
#[derive(Debug, Clone)]
pub struct LeagueData {
    pub store: PeriodStore,
    pub players: Vec<PlayerInfo>,
    pub contracts: Vec<Contract>,
    pub teams: Vec<TeamInfo>,
    pub cash: Vec<TeamCash>,
    pub owners: Vec<Owner>,
    pub current_picks: Vec<DraftPick>,
    pub next_picks: Vec<DraftPick>,
    pub multi_team: Vec<MultiTeamPlayer>,
    player_index: HashMap<String, usize>,
    contract_index: HashMap<String, usize>,
}

fn first_index<'a, I>(keys: I) -> HashMap<String, usize>
where
    I: Iterator<Item = &'a str>,
{
    let mut index = HashMap::new();
    for (i, key) in keys.enumerate() {
        index.entry(key.to_string()).or_insert(i);
    }
    index
}

impl LeagueData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: PeriodStore,
        players: Vec<PlayerInfo>,
        contracts: Vec<Contract>,
        teams: Vec<TeamInfo>,
        cash: Vec<TeamCash>,
        owners: Vec<Owner>,
        current_picks: Vec<DraftPick>,
        next_picks: Vec<DraftPick>,
        multi_team: Vec<MultiTeamPlayer>,
    ) -> Self {
        let player_index = first_index(players.iter().map(|p| p.id.as_str()));
        let contract_index = first_index(contracts.iter().map(|c| c.id.as_str()));
        LeagueData {
            store,
            players,
            contracts,
            teams,
            cash,
            owners,
            current_picks,
            next_picks,
            multi_team,
            player_index,
            contract_index,
        }
    }

    pub fn player(&self, id: &str) -> Option<&PlayerInfo> {
        self.player_index.get(id).map(|&i| &self.players[i])
    }

    pub fn contract(&self, id: &str) -> Option<&Contract> {
        self.contract_index.get(id).map(|&i| &self.contracts[i])
    }

    pub fn team_cash(&self, team: &str) -> Option<&TeamCash> {
        self.cash.iter().find(|c| c.team == team)
    }

    pub fn owner(&self, team: &str) -> Option<&Owner> {
        self.owners.iter().find(|o| o.team == team)
    }

    /// Team abbreviations in alphabetical order.
    pub fn sorted_team_abbrs(&self) -> Vec<String> {
        let mut abbrs: Vec<String> = self.teams.iter().map(|t| t.abbr.clone()).collect();
        abbrs.sort();
        abbrs
    }
}
