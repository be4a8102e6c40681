// League-wide player list: every player-info row with season-to-date stats.

use crate::data::league::LeagueData;
use crate::report::roster::{bio_from_info, overall_line, PlayerBio, StatColumns};
use crate::report::ReportError;
use crate::stats::distribution::{build_distributions, rated_overall};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// Fantasy-team label for unrostered players.
pub const FREE_AGENT: &str = "FA";

const ALL_TEAMS: &str = "All";

#[derive(Debug, Clone, Serialize)]
pub struct PlayerRow {
    #[serde(flatten)]
    pub bio: PlayerBio,
    #[serde(rename = "FHL")]
    pub fantasy_team: String,
    #[serde(rename = "Wins")]
    pub wins: Option<f64>,
    #[serde(rename = "Losses")]
    pub losses: Option<f64>,
    #[serde(rename = "Ties")]
    pub ties: Option<f64>,
    #[serde(flatten)]
    pub stats: StatColumns,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersReport {
    pub player_data: Vec<PlayerRow>,
    /// `All`, the team abbreviations in order, then `FA`.
    pub teams: Vec<String>,
}

pub fn players_report(
    league: &LeagueData,
    age_cutoff: NaiveDate,
) -> Result<PlayersReport, ReportError> {
    let latest = league.store.latest().ok_or(ReportError::EmptyStore)?;
    let distributions = build_distributions(&latest.stats);

    let mut player_data = Vec::with_capacity(league.players.len());
    for info in &league.players {
        let bio = bio_from_info(league, info, age_cutoff);
        let stats = rated_overall(overall_line(league, &info.id, bio.position), &distributions);
        let goalie = stats.goalie();

        let fantasy_team = league
            .store
            .latest_roster_entry(&info.id)
            .map(|r| r.team.clone())
            .filter(|team| !team.is_empty())
            .unwrap_or_else(|| FREE_AGENT.to_string());

        player_data.push(PlayerRow {
            fantasy_team,
            wins: goalie.map(|g| g.wins),
            losses: goalie.map(|g| g.losses),
            ties: goalie.map(|g| g.ties),
            stats: StatColumns::from(&stats),
            rating: stats.rating.unwrap_or(0.0),
            bio,
        });
    }

    let mut teams = vec![ALL_TEAMS.to_string()];
    teams.extend(league.sorted_team_abbrs());
    teams.push(FREE_AGENT.to_string());

    info!("players report: {} players", player_data.len());

    Ok(PlayersReport { player_data, teams })
}
