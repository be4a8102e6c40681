// Data checks between the latest stats export and the player-info table.

use crate::data::league::LeagueData;
use crate::report::ReportError;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMismatch {
    pub player: String,
    pub info_team: String,
    pub stats_team: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Stat rows whose player reference has no player-info record.
    pub missing_players: Vec<String>,
    pub team_mismatches: Vec<TeamMismatch>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.missing_players.is_empty() && self.team_mismatches.is_empty()
    }
}

/// Compare the latest stats export against player info.
///
/// A differing NHL team is not reported when the multi-team table lists
/// that exact player and team, or when player info has no team.
pub fn audit_report(league: &LeagueData) -> Result<AuditReport, ReportError> {
    let latest = league.store.latest().ok_or(ReportError::EmptyStore)?;
    let mut report = AuditReport::default();

    for row in &latest.stats {
        let Some(info) = league.player(&row.player_ref) else {
            warn!(
                "{} is in the period {} stats but not in player info",
                row.player_ref, latest.period
            );
            report.missing_players.push(row.player_ref.clone());
            continue;
        };

        if info.nhl_team.is_empty() || info.nhl_team == row.team {
            continue;
        }
        let listed = league
            .multi_team
            .iter()
            .any(|m| m.player_ref == row.player_ref && m.team == row.team);
        if !listed {
            warn!(
                "{}: info team {}, stats team {}",
                row.player_ref, info.nhl_team, row.team
            );
            report.team_mismatches.push(TeamMismatch {
                player: row.player_ref.clone(),
                info_team: info.nhl_team.clone(),
                stats_team: row.team.clone(),
            });
        }
    }

    info!(
        "audit: {} missing players, {} team mismatches",
        report.missing_players.len(),
        report.team_mismatches.len()
    );
    Ok(report)
}
