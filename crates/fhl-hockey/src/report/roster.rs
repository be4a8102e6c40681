// Shared building blocks for roster-shaped report rows.

use crate::data::league::{LeagueData, PlayerInfo};
use crate::report::ReportError;
use crate::standings::aggregate::{
    aggregate_team_period, ReserveStatus, RosterSlot, TeamPeriodAggregate,
};
use crate::stats::derive::{
    derive_overall, derive_period, CumulativeStats, DerivedPlayerStats, Position,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::cmp::Ordering;

pub(crate) const PLAYER_INFO_TABLE: &str = "player_info";

const BIRTH_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

// ---------------------------------------------------------------------------
// Age
// ---------------------------------------------------------------------------

/// Whole years, or `"N/A"` when the birth date is blank or unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    Years(i32),
    Unknown,
}

impl Serialize for Age {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Age::Years(years) => serializer.serialize_i32(*years),
            Age::Unknown => serializer.serialize_str("N/A"),
        }
    }
}

pub fn age_on(birth_date: &str, cutoff: NaiveDate) -> Age {
    let trimmed = birth_date.trim();
    if trimmed.is_empty() {
        return Age::Unknown;
    }
    let Some(born) = BIRTH_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    else {
        return Age::Unknown;
    };

    let mut years = cutoff.year() - born.year();
    if (cutoff.month(), cutoff.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    Age::Years(years)
}

// ---------------------------------------------------------------------------
// Player columns
// ---------------------------------------------------------------------------

/// Biographical and contract columns common to every roster row.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerBio {
    #[serde(rename = "PLAYER_ID")]
    pub player_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "BirthDate")]
    pub birth_date: String,
    #[serde(rename = "Age")]
    pub age: Age,
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "NHLTeam")]
    pub nhl_team: String,
    #[serde(rename = "Salary")]
    pub salary: f64,
    #[serde(rename = "Contract")]
    pub contract: String,
}

/// Look up a player's bio. A player missing from player info is fatal.
pub fn player_bio(
    league: &LeagueData,
    player_id: &str,
    age_cutoff: NaiveDate,
) -> Result<PlayerBio, ReportError> {
    let info = league
        .player(player_id)
        .ok_or_else(|| ReportError::missing(PLAYER_INFO_TABLE, player_id))?;
    Ok(bio_from_info(league, info, age_cutoff))
}

/// Bio columns from one player-info row plus the player's contract.
pub fn bio_from_info(league: &LeagueData, info: &PlayerInfo, age_cutoff: NaiveDate) -> PlayerBio {
    let contract = league.contract(&info.id);

    PlayerBio {
        player_id: info.id.clone(),
        name: info.name.clone(),
        birth_date: info.birth_date.clone(),
        age: age_on(&info.birth_date, age_cutoff),
        position: Position::from_raw(&info.pos),
        nhl_team: info.nhl_team.clone(),
        salary: contract.map(|c| c.salary).unwrap_or(0.0),
        contract: contract
            .map(|c| c.contract.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "---".to_string()),
    }
}

/// Stat columns: skater fields are null for goalies and goalie fields are
/// null for skaters.
#[derive(Debug, Clone, Serialize)]
pub struct StatColumns {
    #[serde(rename = "Goals")]
    pub goals: Option<f64>,
    #[serde(rename = "Assists")]
    pub assists: Option<f64>,
    #[serde(rename = "PIM")]
    pub pim: Option<f64>,
    #[serde(rename = "Hits")]
    pub hits: Option<f64>,
    #[serde(rename = "Blocks")]
    pub blocks: Option<f64>,
    #[serde(rename = "Take")]
    pub take: Option<f64>,
    #[serde(rename = "Give")]
    pub give: Option<f64>,
    #[serde(rename = "TOI")]
    pub toi: Option<f64>,
    #[serde(rename = "Record")]
    pub record: Option<String>,
    #[serde(rename = "SO")]
    pub so: Option<f64>,
    #[serde(rename = "SA")]
    pub sa: Option<f64>,
    #[serde(rename = "GA")]
    pub ga: Option<f64>,
    #[serde(rename = "Toughness")]
    pub toughness: Option<f64>,
    #[serde(rename = "DStat")]
    pub dstat: Option<f64>,
    #[serde(rename = "GStat")]
    pub gstat: Option<f64>,
    #[serde(rename = "GamesPlayed")]
    pub games_played: f64,
}

impl From<&DerivedPlayerStats> for StatColumns {
    fn from(stats: &DerivedPlayerStats) -> Self {
        let skater = stats.skater();
        let goalie = stats.goalie();
        StatColumns {
            goals: skater.map(|s| s.goals),
            assists: skater.map(|s| s.assists),
            pim: skater.map(|s| s.penalty_minutes),
            hits: skater.map(|s| s.hits),
            blocks: skater.map(|s| s.blocks),
            take: skater.map(|s| s.takeaways),
            give: skater.map(|s| s.giveaways),
            toi: skater.map(|s| s.time_on_ice),
            record: stats.record_string(),
            so: goalie.map(|g| g.shutouts),
            sa: goalie.map(|g| g.shots_against),
            ga: goalie.map(|g| g.goals_against),
            toughness: skater.map(|s| s.toughness),
            dstat: skater.map(|s| s.dstat),
            gstat: goalie.map(|g| g.gstat),
            games_played: stats.games_played,
        }
    }
}

// ---------------------------------------------------------------------------
// Stat lines from the store
// ---------------------------------------------------------------------------

/// Season-to-date line from the latest period. Absent players are all zero.
pub fn overall_line(
    league: &LeagueData,
    player_ref: &str,
    position: Position,
) -> DerivedPlayerStats {
    let empty = CumulativeStats::default();
    let cumulative = league
        .store
        .latest()
        .and_then(|s| s.stat(player_ref))
        .map(|row| &row.stats)
        .unwrap_or(&empty);
    derive_overall(position, cumulative)
}

/// One period's line, differenced against the period before it.
pub fn period_line(
    league: &LeagueData,
    period: u32,
    player_ref: &str,
    position: Position,
) -> DerivedPlayerStats {
    let empty = CumulativeStats::default();
    let current = league
        .store
        .stat(period, player_ref)
        .map(|row| &row.stats)
        .unwrap_or(&empty);
    let previous = league
        .store
        .previous(period)
        .and_then(|s| s.stat(player_ref))
        .map(|row| &row.stats)
        .unwrap_or(&empty);
    derive_period(position, current, previous)
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Roster display order: defense, forwards, goalies; within a position,
/// players flagged `R` after everyone else.
pub fn roster_cmp(
    a_position: Position,
    a_reserve: &str,
    b_position: Position,
    b_reserve: &str,
) -> Ordering {
    a_position
        .roster_order()
        .cmp(&b_position.roster_order())
        .then_with(|| (a_reserve == "R").cmp(&(b_reserve == "R")))
}

// ---------------------------------------------------------------------------
// Team period aggregates
// ---------------------------------------------------------------------------

/// Aggregate every team's roster for one period, in team-info order.
///
/// Players are summed in roster order with fewer games played first.
pub fn team_period_aggregates(
    league: &LeagueData,
    period: u32,
) -> Result<Vec<TeamPeriodAggregate>, ReportError> {
    let snapshot = league.store.get(period).ok_or(ReportError::EmptyStore)?;

    league
        .teams
        .iter()
        .map(|team| -> Result<TeamPeriodAggregate, ReportError> {
            let mut slots: Vec<(String, RosterSlot)> = Vec::new();
            for row in snapshot.team_roster(&team.abbr) {
                let info = league
                    .player(&row.player_id)
                    .ok_or_else(|| ReportError::missing(PLAYER_INFO_TABLE, &row.player_id))?;
                let position = Position::from_raw(&info.pos);
                slots.push((
                    row.reserve.clone(),
                    RosterSlot {
                        player_id: row.player_id.clone(),
                        reserve: ReserveStatus::from_flag(&row.reserve),
                        stats: period_line(league, period, &row.player_id, position),
                    },
                ));
            }

            slots.sort_by(|(a_flag, a), (b_flag, b)| {
                roster_cmp(a.position(), a_flag, b.position(), b_flag).then_with(|| {
                    a.stats
                        .games_played
                        .partial_cmp(&b.stats.games_played)
                        .unwrap_or(Ordering::Equal)
                })
            });

            let slots: Vec<RosterSlot> = slots.into_iter().map(|(_, slot)| slot).collect();
            Ok(aggregate_team_period(&team.abbr, &slots))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
