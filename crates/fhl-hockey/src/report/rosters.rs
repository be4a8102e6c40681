// Team rosters with stats, ratings and category totals for every period
// plus a season-to-date view.

use crate::data::league::{LeagueData, RosterRow, TeamInfo};
use crate::data::store::OVERALL;
use crate::report::roster::{
    overall_line, period_line, player_bio, roster_cmp, PlayerBio, StatColumns,
};
use crate::report::ReportError;
use crate::standings::aggregate::{aggregate_team_period, CategoryTotals, ReserveStatus, RosterSlot};
use crate::stats::distribution::{build_distributions, rated_overall, LeagueDistributions};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::info;

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub bio: PlayerBio,
    #[serde(rename = "Reserve")]
    pub reserve: String,
    #[serde(flatten)]
    pub stats: StatColumns,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterView {
    #[serde(rename = "ROSTER")]
    pub roster: Vec<RosterEntry>,
    #[serde(rename = "ACTIVE_TOTALS")]
    pub active_totals: CategoryTotals,
    #[serde(rename = "RESERVE_TOTALS")]
    pub reserve_totals: CategoryTotals,
}

/// A team-info row with one roster view per period label and `OVERALL`.
#[derive(Debug, Clone, Serialize)]
pub struct TeamRosters {
    #[serde(flatten)]
    pub info: TeamInfo,
    #[serde(flatten)]
    pub views: BTreeMap<String, RosterView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RostersReport {
    pub team_data: Vec<TeamRosters>,
    pub teams: Vec<String>,
    pub available_periods: Vec<String>,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Sort a built roster and total it. Sorting happens first so the totals are
/// summed in display order.
fn finish_view(mut rows: Vec<(RosterEntry, RosterSlot)>) -> RosterView {
    rows.sort_by(|(a, _), (b, _)| {
        roster_cmp(a.bio.position, &a.reserve, b.bio.position, &b.reserve)
            .then_with(|| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
    });

    let (roster, slots): (Vec<RosterEntry>, Vec<RosterSlot>) = rows.into_iter().unzip();
    let aggregate = aggregate_team_period("", &slots);
    RosterView {
        roster,
        active_totals: aggregate.active,
        reserve_totals: aggregate.reserve,
    }
}

/// Season-to-date view over the latest roster. Every player counts as
/// active, so the reserve totals are zero.
fn overall_view(
    league: &LeagueData,
    roster: &[&RosterRow],
    distributions: &LeagueDistributions,
    age_cutoff: NaiveDate,
) -> Result<RosterView, ReportError> {
    let mut rows = Vec::with_capacity(roster.len());
    for row in roster {
        let bio = player_bio(league, &row.player_id, age_cutoff)?;
        let stats = rated_overall(
            overall_line(league, &row.player_id, bio.position),
            distributions,
        );
        let rating = stats.rating.unwrap_or(0.0);
        rows.push((
            RosterEntry {
                stats: StatColumns::from(&stats),
                bio,
                reserve: String::new(),
                rating,
            },
            RosterSlot {
                player_id: row.player_id.clone(),
                reserve: ReserveStatus::Active,
                stats,
            },
        ));
    }
    Ok(finish_view(rows))
}

/// One period's view. Ratings are carried over from the season view.
fn period_view(
    league: &LeagueData,
    period: u32,
    roster: &[&RosterRow],
    overall: &RosterView,
    age_cutoff: NaiveDate,
) -> Result<RosterView, ReportError> {
    let mut rows = Vec::with_capacity(roster.len());
    for row in roster {
        let bio = player_bio(league, &row.player_id, age_cutoff)?;
        let stats = period_line(league, period, &row.player_id, bio.position);
        let rating = overall
            .roster
            .iter()
            .find(|e| e.bio.player_id == row.player_id)
            .map(|e| e.rating)
            .unwrap_or(0.0);
        rows.push((
            RosterEntry {
                stats: StatColumns::from(&stats),
                bio,
                reserve: row.reserve.clone(),
                rating,
            },
            RosterSlot {
                player_id: row.player_id.clone(),
                reserve: ReserveStatus::from_flag(&row.reserve),
                stats: stats.with_rating(rating),
            },
        ));
    }
    Ok(finish_view(rows))
}

/// Build the team rosters report.
pub fn rosters_report(
    league: &LeagueData,
    age_cutoff: NaiveDate,
) -> Result<RostersReport, ReportError> {
    let latest = league.store.latest().ok_or(ReportError::EmptyStore)?;
    let distributions = build_distributions(&latest.stats);

    let mut team_data = Vec::with_capacity(league.teams.len());
    for team in &league.teams {
        let latest_roster: Vec<&RosterRow> = latest.team_roster(&team.abbr).collect();
        let overall = overall_view(league, &latest_roster, &distributions, age_cutoff)?;

        let mut views = BTreeMap::new();
        for snapshot in league.store.snapshots() {
            let roster: Vec<&RosterRow> = snapshot.team_roster(&team.abbr).collect();
            let view = period_view(league, snapshot.period, &roster, &overall, age_cutoff)?;
            views.insert(snapshot.period.to_string(), view);
        }
        views.insert(OVERALL.to_string(), overall);

        team_data.push(TeamRosters {
            info: team.clone(),
            views,
        });
    }

    info!("rosters report: {} teams", team_data.len());

    Ok(RostersReport {
        team_data,
        teams: league.sorted_team_abbrs(),
        available_periods: league.store.available_periods(true),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::{cutoff, sample_league};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn team<'a>(report: &'a RostersReport, abbr: &str) -> &'a TeamRosters {
        report.team_data.iter().find(|t| t.info.abbr == abbr).unwrap()
    }

    #[test]
    fn lists_teams_and_periods() {
        let report = rosters_report(&sample_league(), cutoff()).unwrap();
        assert_eq!(report.teams, vec!["MTL", "TOR"]);
        assert_eq!(report.available_periods, vec!["1", "2", "OVERALL"]);
        assert_eq!(team(&report, "MTL").views.len(), 3);
    }

    // -- Season view --

    #[test]
    fn overall_view_treats_everyone_as_active() {
        let report = rosters_report(&sample_league(), cutoff()).unwrap();
        let overall = &team(&report, "MTL").views[OVERALL];

        let ids: Vec<&str> = overall.roster.iter().map(|e| e.bio.player_id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "f1", "g1"]);
        assert!(overall.roster.iter().all(|e| e.reserve.is_empty()));

        // d1 is flagged R in the latest roster but counts here.
        assert_eq!(overall.active_totals.goals, 9.0);
        assert_eq!(overall.active_totals.assists, 5.0);
        assert!(approx_eq(overall.active_totals.gstat, 26.0, 1e-9));
        assert_eq!(overall.reserve_totals, CategoryTotals::default());
    }

    #[test]
    fn overall_ratings_use_league_distributions() {
        let report = rosters_report(&sample_league(), cutoff()).unwrap();
        let overall = &team(&report, "MTL").views[OVERALL];
        let rating = |id: &str| {
            overall
                .roster
                .iter()
                .find(|e| e.bio.player_id == id)
                .unwrap()
                .rating
        };

        assert!(approx_eq(rating("f1"), 68.75, 1e-9));
        assert!(approx_eq(rating("g1"), 75.0, 1e-9));
    }

    // -- Period views --

    #[test]
    fn period_view_splits_active_and_reserve() {
        let report = rosters_report(&sample_league(), cutoff()).unwrap();
        let p2 = &team(&report, "MTL").views["2"];

        assert_eq!(p2.active_totals.goals, 3.0);
        assert_eq!(p2.active_totals.assists, 1.0);
        assert!(approx_eq(p2.active_totals.dstat, 3.0, 1e-9));
        assert!(approx_eq(p2.active_totals.gstat, 12.5, 1e-9));
        assert_eq!(p2.reserve_totals.assists, 1.0);
        assert!(approx_eq(p2.reserve_totals.dstat, 7.0, 1e-9));

        // Reserve d1 still sorts first as the only defenseman.
        assert_eq!(p2.roster[0].bio.player_id, "d1");
        assert_eq!(p2.roster[0].reserve, "R");
    }

    #[test]
    fn period_ratings_come_from_season_view() {
        let report = rosters_report(&sample_league(), cutoff()).unwrap();
        let mtl = team(&report, "MTL");
        for entry in &mtl.views["1"].roster {
            let season = mtl.views[OVERALL]
                .roster
                .iter()
                .find(|e| e.bio.player_id == entry.bio.player_id)
                .unwrap();
            assert_eq!(entry.rating, season.rating);
        }
    }

    #[test]
    fn goalie_row_shape() {
        let report = rosters_report(&sample_league(), cutoff()).unwrap();
        let g1 = team(&report, "MTL").views["2"]
            .roster
            .iter()
            .find(|e| e.bio.player_id == "g1")
            .unwrap();
        let json = serde_json::to_value(g1).unwrap();
        assert!(json["Goals"].is_null());
        assert_eq!(json["Record"], "2-0-1");
        assert_eq!(json["Age"], "N/A");
        assert_eq!(json["Contract"], "---");
        assert_eq!(json["Position"], "G");
    }

    #[test]
    fn missing_player_info_is_fatal() {
        let mut league = sample_league();
        league.players.retain(|p| p.id != "f2");
        let league = LeagueData::new(
            league.store.clone(),
            league.players.clone(),
            league.contracts.clone(),
            league.teams.clone(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        match rosters_report(&league, cutoff()).unwrap_err() {
            ReportError::MissingReference { key, .. } => assert_eq!(key, "f2"),
            other => panic!("expected MissingReference, got: {other}"),
        }
    }
}
