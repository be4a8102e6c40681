// Team finances: payroll per period, roster counts, cash and budget.

use crate::data::league::{DraftPick, LeagueData, RosterRow, TeamInfo};
use crate::report::roster::{player_bio, roster_cmp, PlayerBio};
use crate::report::ReportError;
use crate::stats::derive::Position;
use chrono::NaiveDate;
use fhl_core::config::SalaryConfig;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::info;

const TEAM_CASH_TABLE: &str = "team_cash";
const OWNERS_TABLE: &str = "owners";

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FinanceRosterEntry {
    #[serde(flatten)]
    pub bio: PlayerBio,
    #[serde(rename = "Reserve")]
    pub reserve: String,
}

/// Players per position class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PositionCounts {
    #[serde(rename = "F")]
    pub forwards: u32,
    #[serde(rename = "D")]
    pub defense: u32,
    #[serde(rename = "G")]
    pub goalies: u32,
}

impl PositionCounts {
    fn add(&mut self, position: Position) {
        match position {
            Position::Forward => self.forwards += 1,
            Position::Defense => self.defense += 1,
            Position::Goalie => self.goalies += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.forwards + self.defense + self.goalies
    }

    /// `(F-D-G) total`, e.g. `(12-6-2) 20`.
    pub fn summary(&self) -> String {
        format!(
            "({}-{}-{}) {}",
            self.forwards,
            self.defense,
            self.goalies,
            self.total()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinanceView {
    #[serde(rename = "ROSTER")]
    pub roster: Vec<FinanceRosterEntry>,
    #[serde(rename = "TOTAL_SALARY")]
    pub total_salary: f64,
    #[serde(rename = "TOTAL_COUNTS")]
    pub total_counts: PositionCounts,
    #[serde(rename = "ACTIVE_COUNTS")]
    pub active_counts: PositionCounts,
}

/// Extra salary room, or `---` once the signing window has closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AddSalary {
    Amount(f64),
    Closed,
}

impl Serialize for AddSalary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AddSalary::Amount(amount) => serializer.serialize_f64(*amount),
            AddSalary::Closed => serializer.serialize_str("---"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamFinance {
    #[serde(flatten)]
    pub info: TeamInfo,
    #[serde(rename = "CASH")]
    pub cash: f64,
    #[serde(rename = "OWNER")]
    pub owner: String,
    #[serde(rename = "EMAIL")]
    pub email: String,
    #[serde(rename = "LOCATION")]
    pub location: String,
    #[serde(rename = "CURRENT_PICKS")]
    pub current_picks: String,
    #[serde(rename = "NEXT_PICKS")]
    pub next_picks: String,
    #[serde(flatten)]
    pub periods: BTreeMap<String, FinanceView>,
    #[serde(rename = "LatestSalary")]
    pub latest_salary: f64,
    #[serde(rename = "SalaryPerPeriod")]
    pub salary_per_period: f64,
    #[serde(rename = "Budget")]
    pub budget: f64,
    #[serde(rename = "AddSalary")]
    pub add_salary: AddSalary,
    #[serde(rename = "TotalPlayerCount")]
    pub total_player_count: String,
    #[serde(rename = "ActivePlayerCount")]
    pub active_player_count: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsReport {
    pub teams: Vec<TeamFinance>,
    pub available_periods: Vec<String>,
}

// ---------------------------------------------------------------------------
// Budget arithmetic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    pub salary_per_period: f64,
    pub budget: f64,
    pub add_salary: AddSalary,
}

/// Cash left after paying the latest payroll for the rest of the season,
/// and the extra payroll that budget would support over the periods left.
pub fn compute_budget(
    cash: f64,
    latest_salary: f64,
    periods_played: u32,
    salary: &SalaryConfig,
) -> Budget {
    let salary_periods = salary.salary_periods as f64;
    let played = periods_played as f64;

    let salary_per_period = latest_salary / salary_periods;
    let budget = cash - salary_per_period * (salary.season_periods as f64 - played);
    let add_salary = if periods_played < salary.add_salary_last_period {
        AddSalary::Amount(budget * salary_periods / (salary_periods - played))
    } else {
        AddSalary::Closed
    };

    Budget {
        salary_per_period,
        budget,
        add_salary,
    }
}

/// Pick labels held by a team, each followed by a space.
fn picks_for(picks: &[DraftPick], team: &str) -> String {
    picks
        .iter()
        .filter(|p| p.owner == team)
        .map(|p| format!("{} ", p.pick))
        .collect()
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

fn finance_view(
    league: &LeagueData,
    roster: &[&RosterRow],
    age_cutoff: NaiveDate,
) -> Result<FinanceView, ReportError> {
    let mut entries = Vec::with_capacity(roster.len());
    for row in roster {
        entries.push(FinanceRosterEntry {
            bio: player_bio(league, &row.player_id, age_cutoff)?,
            reserve: row.reserve.clone(),
        });
    }
    entries.sort_by(|a, b| roster_cmp(a.bio.position, &a.reserve, b.bio.position, &b.reserve));

    let mut total_counts = PositionCounts::default();
    let mut active_counts = PositionCounts::default();
    let mut total_salary = 0.0;
    for entry in &entries {
        total_salary += entry.bio.salary;
        total_counts.add(entry.bio.position);
        if entry.reserve != "R" && entry.reserve != "N/A" {
            active_counts.add(entry.bio.position);
        }
    }

    Ok(FinanceView {
        roster: entries,
        total_salary,
        total_counts,
        active_counts,
    })
}

pub fn teams_report(
    league: &LeagueData,
    age_cutoff: NaiveDate,
    salary: &SalaryConfig,
) -> Result<TeamsReport, ReportError> {
    let latest_period = league.store.latest().ok_or(ReportError::EmptyStore)?.period;
    let periods_played = league.store.periods().len() as u32;

    let mut teams = Vec::with_capacity(league.teams.len());
    for team in &league.teams {
        let cash = league
            .team_cash(&team.abbr)
            .ok_or_else(|| ReportError::missing(TEAM_CASH_TABLE, &team.abbr))?
            .cash;
        let owner = league
            .owner(&team.abbr)
            .ok_or_else(|| ReportError::missing(OWNERS_TABLE, &team.abbr))?;

        let mut periods = BTreeMap::new();
        for snapshot in league.store.snapshots() {
            let roster: Vec<&RosterRow> = snapshot.team_roster(&team.abbr).collect();
            periods.insert(snapshot.period, finance_view(league, &roster, age_cutoff)?);
        }

        let Some(latest) = periods.get(&latest_period) else {
            return Err(ReportError::EmptyStore);
        };
        let latest_salary = latest.total_salary;
        let total_player_count = latest.total_counts.summary();
        let active_player_count = latest.active_counts.summary();
        let budget = compute_budget(cash, latest_salary, periods_played, salary);

        teams.push(TeamFinance {
            info: team.clone(),
            cash,
            owner: owner.owner.clone(),
            email: owner.email.clone(),
            location: owner.location.clone(),
            current_picks: picks_for(&league.current_picks, &team.abbr),
            next_picks: picks_for(&league.next_picks, &team.abbr),
            periods: periods
                .into_iter()
                .map(|(period, view)| (period.to_string(), view))
                .collect(),
            latest_salary,
            salary_per_period: budget.salary_per_period,
            budget: budget.budget,
            add_salary: budget.add_salary,
            total_player_count,
            active_player_count,
        });
    }

    info!("teams report: {} teams", teams.len());

    Ok(TeamsReport {
        teams,
        available_periods: league.store.available_periods(false),
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

    fn salary_config() -> SalaryConfig {
        SalaryConfig {
            salary_periods: 25,
            season_periods: 26,
            add_salary_last_period: 22,
            minimum_cash_charge: 13.0,
        }
    }

    // -- Budget arithmetic --

    #[test]
    fn budget_before_deadline() {
        let budget = compute_budget(100.0, 250.0, 4, &salary_config());
        assert!(approx_eq(budget.salary_per_period, 10.0, 1e-9));
        // 100 - 10 * (26 - 4)
        assert!(approx_eq(budget.budget, -120.0, 1e-9));
        match budget.add_salary {
            AddSalary::Amount(v) => assert!(approx_eq(v, -120.0 * 25.0 / 21.0, 1e-9)),
            AddSalary::Closed => panic!("window should be open"),
        }
    }

    #[test]
    fn add_salary_closes_at_last_period() {
        let budget = compute_budget(100.0, 250.0, 22, &salary_config());
        assert_eq!(budget.add_salary, AddSalary::Closed);
        assert_eq!(serde_json::to_value(budget.add_salary).unwrap(), "---");
    }

    #[test]
    fn count_summary_format() {
        let counts = PositionCounts {
            forwards: 12,
            defense: 6,
            goalies: 2,
        };
        assert_eq!(counts.summary(), "(12-6-2) 20");
    }

    // -- Report --

    #[test]
    fn team_finance_rows() {
        let report = teams_report(&sample_league(), cutoff(), &salary_config()).unwrap();
        assert_eq!(report.available_periods, vec!["1", "2"]);

        let mtl = report.teams.iter().find(|t| t.info.abbr == "MTL").unwrap();
        assert_eq!(mtl.cash, 100.0);
        assert_eq!(mtl.owner, "Marie");
        assert_eq!(mtl.current_picks, "1-01 2-01 ");
        assert_eq!(mtl.next_picks, "1-02 ");
        assert_eq!(mtl.latest_salary, 350.0);
        assert!(approx_eq(mtl.salary_per_period, 14.0, 1e-9));
        assert!(approx_eq(mtl.budget, 100.0 - 14.0 * 24.0, 1e-9));
        assert_eq!(mtl.total_player_count, "(1-1-1) 3");
        // d1 is a reserve.
        assert_eq!(mtl.active_player_count, "(1-0-1) 2");

        let tor = report.teams.iter().find(|t| t.info.abbr == "TOR").unwrap();
        assert_eq!(tor.next_picks, "");
        // g2 is N/A.
        assert_eq!(tor.active_player_count, "(1-0-0) 1");
    }

    #[test]
    fn finance_roster_sorted_by_position_then_reserve() {
        let report = teams_report(&sample_league(), cutoff(), &salary_config()).unwrap();
        let mtl = report.teams.iter().find(|t| t.info.abbr == "MTL").unwrap();
        let ids: Vec<&str> = mtl.periods["1"]
            .roster
            .iter()
            .map(|e| e.bio.player_id.as_str())
            .collect();
        assert_eq!(ids, vec!["d1", "f1", "g1"]);
    }

    #[test]
    fn missing_cash_row_is_fatal() {
        let league = sample_league();
        let league = LeagueData::new(
            league.store.clone(),
            league.players.clone(),
            league.contracts.clone(),
            league.teams.clone(),
            Vec::new(),
            league.owners.clone(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        match teams_report(&league, cutoff(), &salary_config()).unwrap_err() {
            ReportError::MissingReference { table, key } => {
                assert_eq!(table, "team_cash");
                assert_eq!(key, "MTL");
            }
            other => panic!("expected MissingReference, got: {other}"),
        }
    }
}
