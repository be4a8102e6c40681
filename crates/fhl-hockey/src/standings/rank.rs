// Per-period category ranks, overall rank and the rank-to-record table.
//
// Ranks run backwards: with N teams the best value gets N and the worst
// gets 1. A team's rank is `N - index` at its position in the descending
// order; tied values share the rank of the first team in the tie group and
// the next distinct value resumes at its own index, so gaps are possible.

use crate::standings::aggregate::TeamPeriodAggregate;
use crate::stats::distribution::{round_to, Category};
use serde::Serialize;
use std::cmp::Ordering;

const DSTAT_TOLERANCE: f64 = 0.0001;
const GSTAT_TOLERANCE: f64 = 0.01;

// ---------------------------------------------------------------------------
// Rank assignment helpers
// ---------------------------------------------------------------------------

/// When two adjacent values in descending order count as tied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TieRule {
    Exact,
    Within(f64),
    /// Every position gets its own rank.
    Never,
}

impl TieRule {
    fn tied(&self, previous: f64, value: f64) -> bool {
        match self {
            TieRule::Exact => previous == value,
            TieRule::Within(tolerance) => (value - previous).abs() < *tolerance,
            TieRule::Never => false,
        }
    }
}

/// Stable descending order of `values`, as indices into the slice.
pub(crate) fn descending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Assign ranks counting down from `top` along `order`. The team at
/// position `i` gets `top - i` unless it ties the previous team, in which
/// case it shares that team's rank. Writes into `ranks` by team index.
pub(crate) fn assign_collapsed_ranks(
    values: &[f64],
    order: &[usize],
    top: u32,
    rule: TieRule,
    ranks: &mut [u32],
) {
    let mut current = top;
    let mut previous: Option<f64> = None;
    for (i, &team) in order.iter().enumerate() {
        let value = values[team];
        let tied = previous.is_some_and(|prev| rule.tied(prev, value));
        if !tied {
            current = top - i as u32;
        }
        ranks[team] = current;
        previous = Some(value);
    }
}

// ---------------------------------------------------------------------------
// Category ranks
// ---------------------------------------------------------------------------

/// Rank every team in one category. Ranks are returned in input order.
///
/// Goals, assists and toughness tie on exact equality. DStat is rounded to
/// four decimals and ties within 0.0001. GStat is delegated to
/// [`rank_teams_gstat`].
pub fn rank_teams(teams: &[TeamPeriodAggregate], category: Category) -> Vec<u32> {
    let rule = match category {
        Category::GStat => return rank_teams_gstat(teams),
        Category::DStat => TieRule::Within(DSTAT_TOLERANCE),
        _ => TieRule::Exact,
    };

    let values: Vec<f64> = teams
        .iter()
        .map(|t| {
            let value = t.active.get(category);
            if category == Category::DStat {
                round_to(value, 4)
            } else {
                value
            }
        })
        .collect();

    let mut ranks = vec![0; teams.len()];
    let order = descending_order(&values);
    assign_collapsed_ranks(&values, &order, teams.len() as u32, rule, &mut ranks);
    ranks
}

/// GStat ranks with the goalie-games rule: teams whose active goalies
/// played no games are ranked below every team whose goalies did,
/// regardless of their gstat. Each group is ranked by gstat rounded to two
/// decimals, tying within 0.01.
pub fn rank_teams_gstat(teams: &[TeamPeriodAggregate]) -> Vec<u32> {
    let n = teams.len() as u32;
    let values: Vec<f64> = teams.iter().map(|t| round_to(t.active.gstat, 2)).collect();

    let (with_games, without_games): (Vec<usize>, Vec<usize>) =
        (0..teams.len()).partition(|&i| teams[i].has_goalie_games());

    let mut ranks = vec![0; teams.len()];

    let with_order = order_within(&values, &with_games);
    assign_collapsed_ranks(&values, &with_order, n, TieRule::Within(GSTAT_TOLERANCE), &mut ranks);

    let lowest = with_order.iter().map(|&i| ranks[i]).min().unwrap_or(n + 1);

    let without_order = order_within(&values, &without_games);
    assign_collapsed_ranks(
        &values,
        &without_order,
        lowest - 1,
        TieRule::Within(GSTAT_TOLERANCE),
        &mut ranks,
    );

    ranks
}

/// Stable descending order of a subset of teams.
fn order_within(values: &[f64], subset: &[usize]) -> Vec<usize> {
    let subset_values: Vec<f64> = subset.iter().map(|&i| values[i]).collect();
    descending_order(&subset_values)
        .into_iter()
        .map(|j| subset[j])
        .collect()
}

/// Per-category ranks for one period, each aligned with the team slice.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRanks {
    pub goals: Vec<u32>,
    pub assists: Vec<u32>,
    pub toughness: Vec<u32>,
    pub dstat: Vec<u32>,
    pub gstat: Vec<u32>,
}

impl CategoryRanks {
    pub fn compute(teams: &[TeamPeriodAggregate]) -> Self {
        CategoryRanks {
            goals: rank_teams(teams, Category::Goals),
            assists: rank_teams(teams, Category::Assists),
            toughness: rank_teams(teams, Category::Toughness),
            dstat: rank_teams(teams, Category::DStat),
            gstat: rank_teams_gstat(teams),
        }
    }

    /// Sum of the five category ranks for one team.
    pub fn total(&self, team: usize) -> u32 {
        self.goals[team]
            + self.assists[team]
            + self.toughness[team]
            + self.dstat[team]
            + self.gstat[team]
    }
}

// ---------------------------------------------------------------------------
// Overall rank
// ---------------------------------------------------------------------------

/// Overall rank (1 = best) from the summed category ranks.
///
/// Teams are ordered by total rank descending, then by raw goals, assists,
/// toughness, dstat and gstat, all descending. A team whose total and all
/// five raw values equal the previous team's shares its rank; otherwise
/// the rank is its 1-based position.
pub fn compute_overall_rank(teams: &[TeamPeriodAggregate], ranks: &CategoryRanks) -> Vec<u32> {
    let keys: Vec<(f64, [f64; 5])> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let a = &t.active;
            (
                ranks.total(i) as f64,
                [a.goals, a.assists, a.toughness, a.dstat, a.gstat],
            )
        })
        .collect();

    let mut order: Vec<usize> = (0..teams.len()).collect();
    order.sort_by(|&a, &b| {
        let (total_a, raw_a) = &keys[a];
        let (total_b, raw_b) = &keys[b];
        std::iter::once((total_a, total_b))
            .chain(raw_a.iter().zip(raw_b.iter()))
            .map(|(x, y)| y.partial_cmp(x).unwrap_or(Ordering::Equal))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    let mut overall = vec![0; teams.len()];
    let mut current = 1;
    let mut previous: Option<usize> = None;
    for (i, &team) in order.iter().enumerate() {
        let tied = previous.is_some_and(|prev| keys[prev] == keys[team]);
        if !tied {
            current = i as u32 + 1;
        }
        overall[team] = current;
        previous = Some(team);
    }
    overall
}

// ---------------------------------------------------------------------------
// Record table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Record {
    const fn new(wins: u32, losses: u32, ties: u32) -> Self {
        Record { wins, losses, ties }
    }

    /// `W-L-T`.
    pub fn display(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ties)
    }
}

/// The league's fixed step table from overall rank to a period record.
/// Ranks outside 1..=32 earn 0-0-0.
pub fn rank_to_record(overall_rank: u32) -> Record {
    match overall_rank {
        1..=4 => Record::new(3, 0, 0),
        5..=7 => Record::new(2, 0, 1),
        8..=12 => Record::new(2, 1, 0),
        13 => Record::new(1, 0, 2),
        14..=19 => Record::new(1, 1, 1),
        20..=24 => Record::new(1, 2, 0),
        25 => Record::new(0, 1, 2),
        26..=28 => Record::new(0, 2, 1),
        29..=32 => Record::new(0, 3, 0),
        _ => Record::default(),
    }
}

// ---------------------------------------------------------------------------
// Period ranking rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRankingRow {
    pub period: u32,
    pub team: String,
    pub goals: f64,
    pub assists: f64,
    pub toughness: f64,
    pub dstat: f64,
    pub gstat: f64,
    pub goals_rank: u32,
    pub assists_rank: u32,
    pub toughness_rank: u32,
    pub dstat_rank: u32,
    pub gstat_rank: u32,
    /// Sum of the five category ranks.
    pub overall: u32,
    pub overall_rank: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub record: String,
}

/// Rank every team for one period. Rows come back in input order.
pub fn rank_period(period: u32, teams: &[TeamPeriodAggregate]) -> Vec<TeamRankingRow> {
    let ranks = CategoryRanks::compute(teams);
    let overall = compute_overall_rank(teams, &ranks);

    teams
        .iter()
        .enumerate()
        .map(|(i, team)| {
            let record = rank_to_record(overall[i]);
            TeamRankingRow {
                period,
                team: team.team.clone(),
                goals: team.active.goals,
                assists: team.active.assists,
                toughness: team.active.toughness,
                dstat: team.active.dstat,
                gstat: team.active.gstat,
                goals_rank: ranks.goals[i],
                assists_rank: ranks.assists[i],
                toughness_rank: ranks.toughness[i],
                dstat_rank: ranks.dstat[i],
                gstat_rank: ranks.gstat[i],
                overall: ranks.total(i),
                overall_rank: overall[i],
                wins: record.wins,
                losses: record.losses,
                ties: record.ties,
                record: record.display(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
