// League-wide stat distributions and percentile ratings.

use crate::data::league::StatRow;
use crate::stats::derive::{derive_overall, DerivedPlayerStats, Position};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Categories and rounding
// ---------------------------------------------------------------------------

/// The five rated stat categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Goals,
    Assists,
    Toughness,
    DStat,
    GStat,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Goals,
        Category::Assists,
        Category::Toughness,
        Category::DStat,
        Category::GStat,
    ];

    /// Decimal places kept when bucketing values of this category.
    pub fn precision(&self) -> u32 {
        match self {
            Category::Goals | Category::Assists | Category::Toughness => 0,
            Category::DStat => 3,
            Category::GStat => 2,
        }
    }

    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.precision())
    }

    /// The category's value for a derived line, if the line carries it.
    pub fn value(&self, derived: &DerivedPlayerStats) -> Option<f64> {
        match self {
            Category::Goals => derived.goals(),
            Category::Assists => derived.assists(),
            Category::Toughness => derived.toughness(),
            Category::DStat => derived.dstat(),
            Category::GStat => derived.gstat(),
        }
    }
}

/// Round half up to `decimals` places: `floor(x * 10^d + 0.5) / 10^d`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale + 0.5).floor() / scale
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Histogram of rounded values for one category: ascending, unique values.
#[derive(Debug, Clone, PartialEq)]
pub struct StatDistribution {
    pub category: Category,
    pub buckets: Vec<(f64, u32)>,
}

impl StatDistribution {
    /// Bucket raw values, rounding each by the category rule.
    pub fn from_values<I>(category: Category, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut rounded: Vec<f64> = values.into_iter().map(|v| category.round(v)).collect();
        rounded.sort_by(|a, b| a.total_cmp(b));

        let mut buckets: Vec<(f64, u32)> = Vec::new();
        for value in rounded {
            match buckets.last_mut() {
                Some((last, count)) if *last == value => *count += 1,
                _ => buckets.push((value, 1)),
            }
        }
        StatDistribution { category, buckets }
    }

    pub fn total(&self) -> u32 {
        self.buckets.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// See [`percentile_rating`].
    pub fn percentile_rating(&self, value: f64) -> f64 {
        percentile_rating(value, self)
    }
}

/// `100 * (below + 0.5 * at) / total`, where `below` and `at` count players
/// strictly below and exactly at `value`. The query is rounded with the
/// distribution's own category rule before lookup. An empty distribution
/// rates everything 0.
pub fn percentile_rating(value: f64, distribution: &StatDistribution) -> f64 {
    let total = distribution.total();
    if total == 0 {
        warn!(
            "empty {:?} distribution; rating defaults to 0",
            distribution.category
        );
        return 0.0;
    }

    let query = distribution.category.round(value);
    let mut below = 0u32;
    let mut at = 0u32;
    for &(bucket, count) in &distribution.buckets {
        if bucket < query {
            below += count;
        } else if bucket == query {
            at += count;
        } else {
            break;
        }
    }

    100.0 * (below as f64 + 0.5 * at as f64) / total as f64
}

// ---------------------------------------------------------------------------
// League distributions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueDistributions {
    pub goals: StatDistribution,
    pub assists: StatDistribution,
    pub toughness: StatDistribution,
    pub dstat: StatDistribution,
    pub gstat: StatDistribution,
}

impl LeagueDistributions {
    pub fn get(&self, category: Category) -> &StatDistribution {
        match category {
            Category::Goals => &self.goals,
            Category::Assists => &self.assists,
            Category::Toughness => &self.toughness,
            Category::DStat => &self.dstat,
            Category::GStat => &self.gstat,
        }
    }
}

/// Build all five distributions from the latest period's stat rows.
///
/// Every row counts, rostered or not. Skaters feed goals, assists,
/// toughness and dstat; goalies feed gstat only. Values are season-to-date.
pub fn build_distributions(latest_stats: &[StatRow]) -> LeagueDistributions {
    let mut skaters: Vec<DerivedPlayerStats> = Vec::new();
    let mut goalies: Vec<DerivedPlayerStats> = Vec::new();

    for row in latest_stats {
        let position = Position::from_raw(&row.pos);
        let derived = derive_overall(position, &row.stats);
        if position.is_goalie() {
            goalies.push(derived);
        } else {
            skaters.push(derived);
        }
    }

    debug!(
        "building distributions from {} skaters and {} goalies",
        skaters.len(),
        goalies.len()
    );

    let skater_dist = |category: Category| {
        StatDistribution::from_values(
            category,
            skaters.iter().filter_map(|d| category.value(d)),
        )
    };

    LeagueDistributions {
        goals: skater_dist(Category::Goals),
        assists: skater_dist(Category::Assists),
        toughness: skater_dist(Category::Toughness),
        dstat: skater_dist(Category::DStat),
        gstat: StatDistribution::from_values(
            Category::GStat,
            goalies.iter().filter_map(|d| d.gstat()),
        ),
    }
}

// ---------------------------------------------------------------------------
// Player ratings
// ---------------------------------------------------------------------------

/// Goalies: the gstat percentile. Skaters: the mean of the goals, assists,
/// toughness and dstat percentiles.
pub fn overall_rating(derived: &DerivedPlayerStats, distributions: &LeagueDistributions) -> f64 {
    if derived.position.is_goalie() {
        return distributions
            .gstat
            .percentile_rating(derived.gstat().unwrap_or(0.0));
    }

    let rate = |category: Category| {
        distributions
            .get(category)
            .percentile_rating(category.value(derived).unwrap_or(0.0))
    };
    (rate(Category::Goals) + rate(Category::Assists) + rate(Category::Toughness)
        + rate(Category::DStat))
        / 4.0
}

/// Attach the overall rating to a season-to-date line. Players without a
/// game played are rated 0.
pub fn rated_overall(
    derived: DerivedPlayerStats,
    distributions: &LeagueDistributions,
) -> DerivedPlayerStats {
    let rating = if derived.games_played > 0.0 {
        overall_rating(&derived, distributions)
    } else {
        0.0
    };
    derived.with_rating(rating)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
