// Period store: ordered per-period stat and roster snapshots.

use crate::data::league::{RosterRow, StatRow};
use std::collections::{BTreeMap, HashMap};

/// Label appended to the period list for season-to-date views.
pub const OVERALL: &str = "OVERALL";

/// Stat and roster exports for one period boundary.
#[derive(Debug, Clone)]
pub struct PeriodSnapshot {
    pub period: u32,
    pub stats: Vec<StatRow>,
    pub rosters: Vec<RosterRow>,
    stat_index: HashMap<String, usize>,
}

impl PeriodSnapshot {
    pub fn new(period: u32, stats: Vec<StatRow>, rosters: Vec<RosterRow>) -> Self {
        let mut stat_index = HashMap::with_capacity(stats.len());
        for (i, row) in stats.iter().enumerate() {
            // Players traded mid-period can appear twice; the first row wins.
            stat_index.entry(row.player_ref.clone()).or_insert(i);
        }
        PeriodSnapshot {
            period,
            stats,
            rosters,
            stat_index,
        }
    }

    /// The stat row for a player, if the player appears in this export.
    pub fn stat(&self, player_ref: &str) -> Option<&StatRow> {
        self.stat_index.get(player_ref).map(|&i| &self.stats[i])
    }

    /// Roster rows belonging to one fantasy team, in file order.
    pub fn team_roster<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a RosterRow> + 'a {
        self.rosters.iter().filter(move |r| r.team == team)
    }

    /// The first roster row for a player, if rostered this period.
    pub fn roster_entry(&self, player_id: &str) -> Option<&RosterRow> {
        self.rosters.iter().find(|r| r.player_id == player_id)
    }
}

/// All loaded periods keyed by period number.
#[derive(Debug, Clone, Default)]
pub struct PeriodStore {
    snapshots: BTreeMap<u32, PeriodSnapshot>,
}

impl PeriodStore {
    pub fn new(snapshots: Vec<PeriodSnapshot>) -> Self {
        PeriodStore {
            snapshots: snapshots.into_iter().map(|s| (s.period, s)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Period numbers in ascending order.
    pub fn periods(&self) -> Vec<u32> {
        self.snapshots.keys().copied().collect()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &PeriodSnapshot> {
        self.snapshots.values()
    }

    pub fn get(&self, period: u32) -> Option<&PeriodSnapshot> {
        self.snapshots.get(&period)
    }

    /// The highest-numbered period.
    pub fn latest(&self) -> Option<&PeriodSnapshot> {
        self.snapshots.values().next_back()
    }

    /// A player's stat row in a given period.
    pub fn stat(&self, period: u32, player_ref: &str) -> Option<&StatRow> {
        self.get(period).and_then(|s| s.stat(player_ref))
    }

    /// A player's roster row in the latest period.
    pub fn latest_roster_entry(&self, player_id: &str) -> Option<&RosterRow> {
        self.latest().and_then(|s| s.roster_entry(player_id))
    }

    /// The snapshot immediately before `period`, used as the subtraction base
    /// for period deltas. Period 1 (or a gap) has none.
    pub fn previous(&self, period: u32) -> Option<&PeriodSnapshot> {
        period
            .checked_sub(1)
            .and_then(|prev| self.snapshots.get(&prev))
    }

    /// Period labels for report output, optionally followed by `OVERALL`.
    pub fn available_periods(&self, with_overall: bool) -> Vec<String> {
        let mut labels: Vec<String> = self.snapshots.keys().map(|p| p.to_string()).collect();
        if with_overall {
            labels.push(OVERALL.to_string());
        }
        labels
    }
}
