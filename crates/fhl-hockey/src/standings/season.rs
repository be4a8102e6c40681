// Full-season standings accumulated from the per-period ranking rows.

use crate::data::league::TeamInfo;
use crate::standings::rank::{assign_collapsed_ranks, descending_order, TeamRankingRow, TieRule};
use crate::stats::distribution::Category;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStandingsRow {
    pub team: String,
    pub team_name: String,
    pub division: String,
    pub goals: f64,
    pub assists: f64,
    pub toughness: f64,
    pub dstat: f64,
    pub gstat: f64,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points: u32,
    pub overall_rank: u32,
    pub goals_rank: u32,
    pub assists_rank: u32,
    pub toughness_rank: u32,
    pub dstat_rank: u32,
    pub gstat_rank: u32,
}

impl SeasonStandingsRow {
    fn value(&self, category: Category) -> f64 {
        match category {
            Category::Goals => self.goals,
            Category::Assists => self.assists,
            Category::Toughness => self.toughness,
            Category::DStat => self.dstat,
            Category::GStat => self.gstat,
        }
    }

    fn set_rank(&mut self, category: Category, rank: u32) {
        match category {
            Category::Goals => self.goals_rank = rank,
            Category::Assists => self.assists_rank = rank,
            Category::Toughness => self.toughness_rank = rank,
            Category::DStat => self.dstat_rank = rank,
            Category::GStat => self.gstat_rank = rank,
        }
    }
}

/// Sum every team's period totals and records, order the league by points
/// and assign season category ranks.
///
/// `points = 2 * wins + ties`. Teams are sorted by points, wins, goals and
/// assists, all descending; the overall rank is the 1-based position, so
/// exact ties still get consecutive ranks.
pub fn build_season_standings(
    periods: &[Vec<TeamRankingRow>],
    teams: &[TeamInfo],
) -> Vec<SeasonStandingsRow> {
    let mut standings: Vec<SeasonStandingsRow> = teams
        .iter()
        .map(|info| {
            let mut row = SeasonStandingsRow {
                team: info.abbr.clone(),
                team_name: info.name.clone(),
                division: info.division.clone(),
                goals: 0.0,
                assists: 0.0,
                toughness: 0.0,
                dstat: 0.0,
                gstat: 0.0,
                wins: 0,
                losses: 0,
                ties: 0,
                points: 0,
                overall_rank: 0,
                goals_rank: 0,
                assists_rank: 0,
                toughness_rank: 0,
                dstat_rank: 0,
                gstat_rank: 0,
            };
            for period in periods {
                if let Some(p) = period.iter().find(|r| r.team == info.abbr) {
                    row.goals += p.goals;
                    row.assists += p.assists;
                    row.toughness += p.toughness;
                    row.dstat += p.dstat;
                    row.gstat += p.gstat;
                    row.wins += p.wins;
                    row.losses += p.losses;
                    row.ties += p.ties;
                }
            }
            row.points = row.wins * 2 + row.ties;
            row
        })
        .collect();

    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then(b.goals.partial_cmp(&a.goals).unwrap_or(Ordering::Equal))
            .then(b.assists.partial_cmp(&a.assists).unwrap_or(Ordering::Equal))
    });
    for (i, row) in standings.iter_mut().enumerate() {
        row.overall_rank = i as u32 + 1;
    }

    for category in [
        Category::Goals,
        Category::Assists,
        Category::Toughness,
        Category::DStat,
    ] {
        let rule = if category == Category::DStat {
            TieRule::Within(0.0001)
        } else {
            TieRule::Exact
        };
        let values: Vec<f64> = standings.iter().map(|r| r.value(category)).collect();
        let mut ranks = vec![0; standings.len()];
        let order = descending_order(&values);
        assign_collapsed_ranks(&values, &order, standings.len() as u32, rule, &mut ranks);
        for (row, rank) in standings.iter_mut().zip(ranks) {
            row.set_rank(category, rank);
        }
    }

    let gstat_ranks = season_gstat_ranks(&standings);
    for (row, rank) in standings.iter_mut().zip(gstat_ranks) {
        row.gstat_rank = rank;
    }

    standings
}

/// Season gstat ranks. Teams with a positive season gstat are ranked first,
/// tying within 0.01. Everyone else sits below them ordered by team
/// abbreviation, one rank each.
fn season_gstat_ranks(standings: &[SeasonStandingsRow]) -> Vec<u32> {
    let n = standings.len() as u32;
    let values: Vec<f64> = standings.iter().map(|r| r.gstat).collect();

    let (positive, rest): (Vec<usize>, Vec<usize>) =
        (0..standings.len()).partition(|&i| values[i] > 0.0);

    let mut ranks = vec![0; standings.len()];

    let positive_values: Vec<f64> = positive.iter().map(|&i| values[i]).collect();
    let positive_order: Vec<usize> = descending_order(&positive_values)
        .into_iter()
        .map(|j| positive[j])
        .collect();
    assign_collapsed_ranks(&values, &positive_order, n, TieRule::Within(0.01), &mut ranks);

    let lowest = positive_order.iter().map(|&i| ranks[i]).min().unwrap_or(n + 1);

    let mut rest_order = rest;
    rest_order.sort_by(|&a, &b| standings[a].team.cmp(&standings[b].team));
    assign_collapsed_ranks(&values, &rest_order, lowest - 1, TieRule::Never, &mut ranks);

    ranks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
