// Standings report: per-period rankings and the season table.

use crate::data::league::{LeagueData, TeamInfo};
use crate::report::roster::team_period_aggregates;
use crate::report::ReportError;
use crate::standings::rank::{rank_period, TeamRankingRow};
use crate::standings::season::{build_season_standings, SeasonStandingsRow};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    /// One row list per period, ascending; rows in team-info order.
    pub periods: Vec<Vec<TeamRankingRow>>,
    pub overall_standings: Vec<SeasonStandingsRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsReport {
    pub teams: Vec<TeamInfo>,
    pub rankings: Rankings,
    pub available_periods: Vec<String>,
}

pub fn standings_report(league: &LeagueData) -> Result<StandingsReport, ReportError> {
    if league.store.is_empty() {
        return Err(ReportError::EmptyStore);
    }

    let mut periods = Vec::new();
    for period in league.store.periods() {
        let aggregates = team_period_aggregates(league, period)?;
        periods.push(rank_period(period, &aggregates));
    }
    let overall_standings = build_season_standings(&periods, &league.teams);

    if let Some(leader) = overall_standings.first() {
        info!(
            "standings report: {} periods, leader {} with {} points",
            periods.len(),
            leader.team,
            leader.points
        );
    }

    Ok(StandingsReport {
        teams: league.teams.clone(),
        rankings: Rankings {
            periods,
            overall_standings,
        },
        available_periods: league.store.available_periods(false),
    })
}
