// Stat derivation: cumulative box-score counters to season-to-date and
// per-period lines, including the DStat and GStat composites.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Fantasy position class. Every non-goalie, non-defense position string
/// (C, LW, RW, F, empty, ...) is a forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "D")]
    Defense,
    #[serde(rename = "G")]
    Goalie,
}

impl Position {
    /// Classify a raw position string. Matching is case-insensitive.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "G" => Position::Goalie,
            "D" => Position::Defense,
            _ => Position::Forward,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::Forward => "F",
            Position::Defense => "D",
            Position::Goalie => "G",
        }
    }

    pub fn is_goalie(&self) -> bool {
        matches!(self, Position::Goalie)
    }

    /// Time-on-ice divisor used by DStat.
    pub fn toi_divisor(&self) -> f64 {
        match self {
            Position::Defense => 20.0,
            _ => 30.0,
        }
    }

    /// Roster display order: defense, then forwards, then goalies.
    pub fn roster_order(&self) -> u8 {
        match self {
            Position::Defense => 1,
            Position::Forward => 2,
            Position::Goalie => 3,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Cumulative counters
// ---------------------------------------------------------------------------

/// Season-to-date counters as exported at a period boundary. The default
/// value is the all-zero record used for absent players and period 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CumulativeStats {
    pub games_played: f64,
    pub goals: f64,
    pub assists: f64,
    pub penalty_minutes: f64,
    pub hits: f64,
    pub time_on_ice: f64,
    pub blocks: f64,
    pub takeaways: f64,
    pub giveaways: f64,
    pub wins: f64,
    pub losses: f64,
    pub ties: f64,
    pub shutouts: f64,
    pub shots_against: f64,
    pub goals_against: f64,
}

/// Toughness: `penalty_minutes + hits`.
pub fn toughness(stats: &CumulativeStats) -> f64 {
    stats.penalty_minutes + stats.hits
}

/// DStat: `blocks + takeaways - giveaways + time_on_ice / divisor`, with the
/// divisor chosen by position (20 for defense, 30 otherwise).
pub fn dstat(position: Position, stats: &CumulativeStats) -> f64 {
    stats.blocks + stats.takeaways - stats.giveaways + stats.time_on_ice / position.toi_divisor()
}

/// GStat: `2*wins + ties + 2*shutouts + 0.15*shots_against - goals_against`.
pub fn gstat(stats: &CumulativeStats) -> f64 {
    2.0 * stats.wins + stats.ties + 2.0 * stats.shutouts + 0.15 * stats.shots_against
        - stats.goals_against
}

// ---------------------------------------------------------------------------
// Derived lines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkaterLine {
    pub goals: f64,
    pub assists: f64,
    pub penalty_minutes: f64,
    pub hits: f64,
    pub toughness: f64,
    pub blocks: f64,
    pub takeaways: f64,
    pub giveaways: f64,
    pub time_on_ice: f64,
    pub dstat: f64,
}

impl SkaterLine {
    fn from_cumulative(position: Position, stats: &CumulativeStats) -> Self {
        SkaterLine {
            goals: stats.goals,
            assists: stats.assists,
            penalty_minutes: stats.penalty_minutes,
            hits: stats.hits,
            toughness: toughness(stats),
            blocks: stats.blocks,
            takeaways: stats.takeaways,
            giveaways: stats.giveaways,
            time_on_ice: stats.time_on_ice,
            dstat: dstat(position, stats),
        }
    }

    fn minus(&self, prev: &SkaterLine) -> Self {
        SkaterLine {
            goals: self.goals - prev.goals,
            assists: self.assists - prev.assists,
            penalty_minutes: self.penalty_minutes - prev.penalty_minutes,
            hits: self.hits - prev.hits,
            toughness: self.toughness - prev.toughness,
            blocks: self.blocks - prev.blocks,
            takeaways: self.takeaways - prev.takeaways,
            giveaways: self.giveaways - prev.giveaways,
            time_on_ice: self.time_on_ice - prev.time_on_ice,
            dstat: self.dstat - prev.dstat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalieLine {
    pub wins: f64,
    pub losses: f64,
    pub ties: f64,
    pub shutouts: f64,
    pub shots_against: f64,
    pub goals_against: f64,
    pub gstat: f64,
}

impl GoalieLine {
    fn from_cumulative(stats: &CumulativeStats) -> Self {
        GoalieLine {
            wins: stats.wins,
            losses: stats.losses,
            ties: stats.ties,
            shutouts: stats.shutouts,
            shots_against: stats.shots_against,
            goals_against: stats.goals_against,
            gstat: gstat(stats),
        }
    }

    fn minus(&self, prev: &GoalieLine) -> Self {
        GoalieLine {
            wins: self.wins - prev.wins,
            losses: self.losses - prev.losses,
            ties: self.ties - prev.ties,
            shutouts: self.shutouts - prev.shutouts,
            shots_against: self.shots_against - prev.shots_against,
            goals_against: self.goals_against - prev.goals_against,
            gstat: self.gstat - prev.gstat,
        }
    }

    /// `W-L-T` record string.
    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ties)
    }
}

/// Either the skater or the goalie field group, never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatLine {
    Skater(SkaterLine),
    Goalie(GoalieLine),
}

impl StatLine {
    fn from_cumulative(position: Position, stats: &CumulativeStats) -> Self {
        match position {
            Position::Goalie => StatLine::Goalie(GoalieLine::from_cumulative(stats)),
            _ => StatLine::Skater(SkaterLine::from_cumulative(position, stats)),
        }
    }

    fn minus(&self, prev: &StatLine) -> Self {
        match (self, prev) {
            (StatLine::Skater(cur), StatLine::Skater(prev)) => StatLine::Skater(cur.minus(prev)),
            (StatLine::Goalie(cur), StatLine::Goalie(prev)) => StatLine::Goalie(cur.minus(prev)),
            // Both lines are always built for the same position.
            _ => *self,
        }
    }
}

/// Output of the derivation engine for one player in one period (or overall).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedPlayerStats {
    pub position: Position,
    pub games_played: f64,
    pub line: StatLine,
    /// Percentile rating, once one has been computed.
    pub rating: Option<f64>,
}

impl DerivedPlayerStats {
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn skater(&self) -> Option<&SkaterLine> {
        match &self.line {
            StatLine::Skater(line) => Some(line),
            StatLine::Goalie(_) => None,
        }
    }

    pub fn goalie(&self) -> Option<&GoalieLine> {
        match &self.line {
            StatLine::Goalie(line) => Some(line),
            StatLine::Skater(_) => None,
        }
    }

    pub fn goals(&self) -> Option<f64> {
        self.skater().map(|s| s.goals)
    }

    pub fn assists(&self) -> Option<f64> {
        self.skater().map(|s| s.assists)
    }

    pub fn toughness(&self) -> Option<f64> {
        self.skater().map(|s| s.toughness)
    }

    pub fn dstat(&self) -> Option<f64> {
        self.skater().map(|s| s.dstat)
    }

    pub fn gstat(&self) -> Option<f64> {
        self.goalie().map(|g| g.gstat)
    }

    /// Goalie `W-L-T` record; `None` for skaters.
    pub fn record_string(&self) -> Option<String> {
        self.goalie().map(GoalieLine::record)
    }
}

// ---------------------------------------------------------------------------
// Engine entry points
// ---------------------------------------------------------------------------

/// Season-to-date line from one cumulative record.
pub fn derive_overall(position: Position, cumulative: &CumulativeStats) -> DerivedPlayerStats {
    DerivedPlayerStats {
        position,
        games_played: cumulative.games_played,
        line: StatLine::from_cumulative(position, cumulative),
        rating: None,
    }
}

/// Per-period line: every field, composites included, is computed on each
/// cumulative record and then differenced (`f(current) - f(previous)`).
/// Pass `CumulativeStats::default()` when there is no previous record.
pub fn derive_period(
    position: Position,
    current: &CumulativeStats,
    previous: &CumulativeStats,
) -> DerivedPlayerStats {
    let current_line = StatLine::from_cumulative(position, current);
    let previous_line = StatLine::from_cumulative(position, previous);
    DerivedPlayerStats {
        position,
        games_played: current.games_played - previous.games_played,
        line: current_line.minus(&previous_line),
        rating: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
