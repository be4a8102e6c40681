// End-of-period cash update: charge each team its payroll share.

use crate::data::league::LeagueData;
use crate::report::ReportError;
use crate::stats::distribution::round_to;
use fhl_core::config::SalaryConfig;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashRow {
    #[serde(rename = "ABBR")]
    pub team: String,
    #[serde(rename = "CASH")]
    pub cash: f64,
}

/// The per-period charge: payroll spread over the salary periods, with a
/// floor of `minimum_cash_charge`.
pub fn cash_charge(total_salary: f64, salary: &SalaryConfig) -> f64 {
    let salary_periods = salary.salary_periods as f64;
    if total_salary < salary.minimum_cash_charge * salary_periods {
        salary.minimum_cash_charge
    } else {
        total_salary / salary_periods
    }
}

/// New cash for every team in the cash table, in file order.
///
/// Payroll is the latest roster's contract salaries. Players without a
/// contract row cost nothing.
pub fn cash_update(
    league: &LeagueData,
    salary: &SalaryConfig,
) -> Result<Vec<CashRow>, ReportError> {
    let latest = league.store.latest().ok_or(ReportError::EmptyStore)?;

    let rows: Vec<CashRow> = league
        .cash
        .iter()
        .map(|team| {
            let payroll: f64 = latest
                .team_roster(&team.team)
                .map(|r| league.contract(&r.player_id).map_or(0.0, |c| c.salary))
                .sum();
            let charge = cash_charge(payroll, salary);
            debug!("{}: payroll {payroll}, charge {charge}", team.team);
            CashRow {
                team: team.team.clone(),
                cash: round_to(team.cash - charge, 2),
            }
        })
        .collect();

    info!("cash update for {} teams after period {}", rows.len(), latest.period);
    Ok(rows)
}

/// Render the update as `ABBR,CASH` CSV.
pub fn to_csv(rows: &[CashRow]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["ABBR", "CASH"])?;
    for row in rows {
        let cash = row.cash.to_string();
        writer.write_record([row.team.as_str(), cash.as_str()])?;
    }
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
