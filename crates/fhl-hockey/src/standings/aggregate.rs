// Team category totals for one period, split by roster status.

use crate::stats::derive::{DerivedPlayerStats, Position};
use crate::stats::distribution::Category;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Roster status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReserveStatus {
    Active,
    /// Flag `R`: on the bench.
    Reserve,
    /// Flag `N/A`: rostered but not counting.
    Inactive,
}

impl ReserveStatus {
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "R" => ReserveStatus::Reserve,
            "N/A" => ReserveStatus::Inactive,
            _ => ReserveStatus::Active,
        }
    }
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Sums of the five scoring categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub goals: f64,
    pub assists: f64,
    pub toughness: f64,
    pub dstat: f64,
    pub gstat: f64,
}

impl CategoryTotals {
    /// Add one player's line. Goalies add nothing to goals, assists and
    /// toughness; a missing dstat or gstat adds 0.
    pub fn add(&mut self, stats: &DerivedPlayerStats) {
        if !stats.position.is_goalie() {
            self.goals += stats.goals().unwrap_or(0.0);
            self.assists += stats.assists().unwrap_or(0.0);
            self.toughness += stats.toughness().unwrap_or(0.0);
        }
        self.dstat += stats.dstat().unwrap_or(0.0);
        self.gstat += stats.gstat().unwrap_or(0.0);
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Goals => self.goals,
            Category::Assists => self.assists,
            Category::Toughness => self.toughness,
            Category::DStat => self.dstat,
            Category::GStat => self.gstat,
        }
    }
}

/// One rostered player's line for a period.
#[derive(Debug, Clone)]
pub struct RosterSlot {
    pub player_id: String,
    pub reserve: ReserveStatus,
    pub stats: DerivedPlayerStats,
}

impl RosterSlot {
    pub fn position(&self) -> Position {
        self.stats.position
    }
}

/// Sum the slots whose status passes `include`, in slice order.
pub fn sum_totals<F>(slots: &[RosterSlot], include: F) -> CategoryTotals
where
    F: Fn(ReserveStatus) -> bool,
{
    let mut totals = CategoryTotals::default();
    for slot in slots.iter().filter(|s| include(s.reserve)) {
        totals.add(&slot.stats);
    }
    totals
}

// ---------------------------------------------------------------------------
// Team period aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TeamPeriodAggregate {
    pub team: String,
    pub active: CategoryTotals,
    pub reserve: CategoryTotals,
    /// Games played by goalies not flagged `R` (`N/A` goalies count).
    pub goalie_games: f64,
}

impl TeamPeriodAggregate {
    pub fn has_goalie_games(&self) -> bool {
        self.goalie_games > 0.0
    }
}

pub fn aggregate_team_period(team: &str, slots: &[RosterSlot]) -> TeamPeriodAggregate {
    let goalie_games = slots
        .iter()
        .filter(|s| s.position().is_goalie() && s.reserve != ReserveStatus::Reserve)
        .map(|s| s.stats.games_played)
        .sum();

    TeamPeriodAggregate {
        team: team.to_string(),
        active: sum_totals(slots, |status| status == ReserveStatus::Active),
        reserve: sum_totals(slots, |status| status == ReserveStatus::Reserve),
        goalie_games,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::derive::{derive_overall, CumulativeStats};

    fn slot(id: &str, position: Position, flag: &str, stats: CumulativeStats) -> RosterSlot {
        RosterSlot {
            player_id: id.into(),
            reserve: ReserveStatus::from_flag(flag),
            stats: derive_overall(position, &stats),
        }
    }

    fn skater(goals: f64, assists: f64, hits: f64) -> CumulativeStats {
        CumulativeStats {
            games_played: 3.0,
            goals,
            assists,
            hits,
            time_on_ice: 60.0,
            ..CumulativeStats::default()
        }
    }

    fn goalie(games: f64, wins: f64) -> CumulativeStats {
        CumulativeStats {
            games_played: games,
            wins,
            goals: 1.0,
            ..CumulativeStats::default()
        }
    }

    #[test]
    fn reserve_flags() {
        assert_eq!(ReserveStatus::from_flag("R"), ReserveStatus::Reserve);
        assert_eq!(ReserveStatus::from_flag("N/A"), ReserveStatus::Inactive);
        assert_eq!(ReserveStatus::from_flag(""), ReserveStatus::Active);
        assert_eq!(ReserveStatus::from_flag("r"), ReserveStatus::Active);
    }

    // -- Active vs reserve split --

    #[test]
    fn active_and_reserve_totals_are_separate() {
        let slots = vec![
            slot("a", Position::Forward, "", skater(3.0, 1.0, 5.0)),
            slot("b", Position::Defense, "R", skater(1.0, 2.0, 0.0)),
            slot("c", Position::Forward, "N/A", skater(9.0, 9.0, 9.0)),
        ];
        let agg = aggregate_team_period("MTL", &slots);

        assert_eq!(agg.active.goals, 3.0);
        assert_eq!(agg.active.assists, 1.0);
        assert_eq!(agg.active.toughness, 5.0);
        assert_eq!(agg.active.dstat, 2.0);
        assert_eq!(agg.reserve.goals, 1.0);
        assert_eq!(agg.reserve.dstat, 3.0);
    }

    // -- Goalie contributions --

    #[test]
    fn goalies_only_contribute_gstat() {
        let slots = vec![
            slot("g", Position::Goalie, "", goalie(2.0, 2.0)),
            slot("f", Position::Forward, "", skater(1.0, 0.0, 0.0)),
        ];
        let agg = aggregate_team_period("TOR", &slots);
        assert_eq!(agg.active.goals, 1.0);
        assert_eq!(agg.active.gstat, 4.0);
    }

    #[test]
    fn goalie_games_exclude_reserves_only() {
        let slots = vec![
            slot("g1", Position::Goalie, "", goalie(2.0, 1.0)),
            slot("g2", Position::Goalie, "R", goalie(5.0, 1.0)),
            slot("g3", Position::Goalie, "N/A", goalie(1.0, 0.0)),
        ];
        let agg = aggregate_team_period("TOR", &slots);
        assert_eq!(agg.goalie_games, 3.0);
        assert!(agg.has_goalie_games());
    }

    #[test]
    fn empty_roster_is_all_zero() {
        let agg = aggregate_team_period("BOS", &[]);
        assert_eq!(agg.active, CategoryTotals::default());
        assert_eq!(agg.reserve, CategoryTotals::default());
        assert!(!agg.has_goalie_games());
    }

    #[test]
    fn sum_totals_with_custom_filter() {
        let slots = vec![
            slot("a", Position::Forward, "", skater(2.0, 0.0, 0.0)),
            slot("b", Position::Forward, "N/A", skater(4.0, 0.0, 0.0)),
        ];
        let all = sum_totals(&slots, |_| true);
        assert_eq!(all.goals, 6.0);
        assert_eq!(all.get(Category::Goals), 6.0);
    }
}
