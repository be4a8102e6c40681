// League stat distributions and the salary-vs-rating scatter.

use crate::data::league::LeagueData;
use crate::report::ReportError;
use crate::stats::derive::{derive_overall, Position};
use crate::stats::distribution::{build_distributions, rated_overall, Category, StatDistribution};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractPoint {
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "Salary")]
    pub salary: f64,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub goal_ranges: Vec<Value>,
    pub assist_ranges: Vec<Value>,
    pub toughness_ranges: Vec<Value>,
    pub dstat_ranges: Vec<Value>,
    pub gstat_ranges: Vec<Value>,
    pub contract_ranking: Vec<ContractPoint>,
}

fn range_key(category: Category) -> &'static str {
    match category {
        Category::Goals => "goals",
        Category::Assists => "assists",
        Category::Toughness => "toughness",
        Category::DStat => "dstat",
        Category::GStat => "gstat",
    }
}

/// One `{<category>: value, playerCount: n}` object per bucket, ascending.
/// Integer categories are written as integers.
pub fn distribution_ranges(distribution: &StatDistribution) -> Vec<Value> {
    let key = range_key(distribution.category);
    distribution
        .buckets
        .iter()
        .map(|&(value, count)| {
            let value = if distribution.category.precision() == 0 {
                Value::from(value as i64)
            } else {
                Value::from(value)
            };
            let mut entry = Map::new();
            entry.insert(key.to_string(), value);
            entry.insert("playerCount".to_string(), Value::from(count));
            Value::Object(entry)
        })
        .collect()
}

pub fn stats_report(league: &LeagueData) -> Result<StatsReport, ReportError> {
    let latest = league.store.latest().ok_or(ReportError::EmptyStore)?;
    let distributions = build_distributions(&latest.stats);

    // Position comes from the stats export; contracts without a stat row
    // are plotted as forwards with no games.
    let contract_ranking: Vec<ContractPoint> = league
        .contracts
        .iter()
        .map(|contract| {
            let row = latest.stat(&contract.id);
            let position = row
                .map(|r| Position::from_raw(&r.pos))
                .unwrap_or(Position::Forward);
            let derived = match row {
                Some(r) => derive_overall(position, &r.stats),
                None => derive_overall(position, &Default::default()),
            };
            let rated = rated_overall(derived, &distributions);
            ContractPoint {
                position,
                salary: contract.salary,
                rating: rated.rating.unwrap_or(0.0),
            }
        })
        .collect();

    info!(
        "stats report: {} stat rows, {} contracts",
        latest.stats.len(),
        contract_ranking.len()
    );

    Ok(StatsReport {
        goal_ranges: distribution_ranges(&distributions.goals),
        assist_ranges: distribution_ranges(&distributions.assists),
        toughness_ranges: distribution_ranges(&distributions.toughness),
        dstat_ranges: distribution_ranges(&distributions.dstat),
        gstat_ranges: distribution_ranges(&distributions.gstat),
        contract_ranking,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_league;
    use serde_json::json;

    #[test]
    fn goal_ranges_are_integer_buckets() {
        let report = stats_report(&sample_league()).unwrap();
        // Latest skater goals: f1 8, d1 1, f2 3, fa1 1.
        assert_eq!(
            report.goal_ranges,
            vec![
                json!({"goals": 1, "playerCount": 2}),
                json!({"goals": 3, "playerCount": 1}),
                json!({"goals": 8, "playerCount": 1}),
            ]
        );
    }

    #[test]
    fn gstat_ranges_only_count_goalies() {
        let report = stats_report(&sample_league()).unwrap();
        let total: u64 = report
            .gstat_ranges
            .iter()
            .map(|r| r["playerCount"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 2);
        assert_eq!(report.gstat_ranges[0]["gstat"], json!(4.5));
    }

    #[test]
    fn contract_ranking_one_point_per_contract() {
        let report = stats_report(&sample_league()).unwrap();
        assert_eq!(report.contract_ranking.len(), 5);

        let f1 = &report.contract_ranking[0];
        assert_eq!(f1.position, Position::Forward);
        assert_eq!(f1.salary, 200.0);
        assert!((f1.rating - 68.75).abs() < 1e-9);

        let g1 = &report.contract_ranking[2];
        assert_eq!(g1.position, Position::Goalie);
    }

    #[test]
    fn contract_without_stats_rates_zero() {
        let mut league = sample_league();
        league.contracts.push(crate::data::league::Contract {
            id: "ghost".into(),
            salary: 1.5,
            contract: String::new(),
        });
        let report = stats_report(&league).unwrap();
        let ghost = report.contract_ranking.last().unwrap();
        assert_eq!(ghost.position, Position::Forward);
        assert_eq!(ghost.rating, 0.0);
    }
}
