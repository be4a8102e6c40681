// CSV loading for period stat/roster exports and league reference tables.
//
// Every file is read fully into memory. Declared numeric columns are coerced
// leniently: a missing column, empty cell or unparsable cell becomes 0.

use crate::data::league::{
    Contract, DraftPick, LeagueData, MultiTeamPlayer, Owner, PlayerInfo, RosterRow, StatRow,
    TeamCash, TeamInfo,
};
use crate::data::store::{PeriodSnapshot, PeriodStore};
use crate::stats::derive::CumulativeStats;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("period {period} has no {kind} file (expected {path})")]
    MissingPeriodFile {
        period: u32,
        kind: &'static str,
        path: String,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// File names
// ---------------------------------------------------------------------------

const STATS_PREFIX: &str = "stats_p";
const ROSTERS_PREFIX: &str = "rosters_p";

pub const PLAYER_INFO_FILE: &str = "player_info.csv";
pub const CONTRACTS_FILE: &str = "contracts.csv";
pub const TEAM_INFO_FILE: &str = "team_info.csv";
pub const TEAM_CASH_FILE: &str = "team_cash.csv";
pub const OWNERS_FILE: &str = "owners.csv";
pub const CURRENT_PICKS_FILE: &str = "current_picks.csv";
pub const NEXT_PICKS_FILE: &str = "next_picks.csv";
pub const MULTI_TEAM_FILE: &str = "player_multiple_teams.csv";

/// `stats_p03.csv` style file name for a period.
pub fn stats_file_name(period: u32) -> String {
    format!("{STATS_PREFIX}{period:02}.csv")
}

/// `rosters_p03.csv` style file name for a period.
pub fn rosters_file_name(period: u32) -> String {
    format!("{ROSTERS_PREFIX}{period:02}.csv")
}

// ---------------------------------------------------------------------------
// Lenient numeric coercion
// ---------------------------------------------------------------------------

/// Parse a declared-numeric cell. Empty, missing and unparsable cells are 0.
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(coerce_number).unwrap_or(0.0))
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStatRow {
    #[serde(rename = "hockeyRef", default)]
    hockey_ref: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    pos: String,
    #[serde(rename = "stats/gp", default, deserialize_with = "lenient_f64")]
    gp: f64,
    #[serde(rename = "stats/goals", default, deserialize_with = "lenient_f64")]
    goals: f64,
    #[serde(rename = "stats/assists", default, deserialize_with = "lenient_f64")]
    assists: f64,
    #[serde(rename = "stats/pim", default, deserialize_with = "lenient_f64")]
    pim: f64,
    #[serde(rename = "stats/hits", default, deserialize_with = "lenient_f64")]
    hits: f64,
    #[serde(rename = "stats/toi", default, deserialize_with = "lenient_f64")]
    toi: f64,
    #[serde(rename = "stats/blocks", default, deserialize_with = "lenient_f64")]
    blocks: f64,
    #[serde(rename = "stats/take", default, deserialize_with = "lenient_f64")]
    take: f64,
    #[serde(rename = "stats/give", default, deserialize_with = "lenient_f64")]
    give: f64,
    #[serde(rename = "stats/wins", default, deserialize_with = "lenient_f64")]
    wins: f64,
    #[serde(rename = "stats/losses", default, deserialize_with = "lenient_f64")]
    losses: f64,
    #[serde(rename = "stats/ties", default, deserialize_with = "lenient_f64")]
    ties: f64,
    #[serde(rename = "stats/so", default, deserialize_with = "lenient_f64")]
    so: f64,
    #[serde(rename = "stats/sa", default, deserialize_with = "lenient_f64")]
    sa: f64,
    #[serde(rename = "stats/ga", default, deserialize_with = "lenient_f64")]
    ga: f64,
}

impl From<RawStatRow> for StatRow {
    fn from(raw: RawStatRow) -> Self {
        StatRow {
            player_ref: raw.hockey_ref.trim().to_string(),
            team: raw.team.trim().to_string(),
            pos: raw.pos,
            stats: CumulativeStats {
                games_played: raw.gp,
                goals: raw.goals,
                assists: raw.assists,
                penalty_minutes: raw.pim,
                hits: raw.hits,
                time_on_ice: raw.toi,
                blocks: raw.blocks,
                takeaways: raw.take,
                giveaways: raw.give,
                wins: raw.wins,
                losses: raw.losses,
                ties: raw.ties,
                shutouts: raw.so,
                shots_against: raw.sa,
                goals_against: raw.ga,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRosterRow {
    ID: String,
    ABBR: String,
    #[serde(default)]
    RESERVE: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerInfo {
    ID: String,
    #[serde(default)]
    Name: String,
    #[serde(default)]
    BirthDate: String,
    #[serde(default)]
    Pos: String,
    #[serde(default)]
    NHL: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawContract {
    ID: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    Salary: f64,
    #[serde(default)]
    Contract: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawTeamCash {
    ABBR: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    CASH: f64,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawOwner {
    ABBR: String,
    #[serde(default)]
    OWNER: String,
    #[serde(default)]
    EMAIL: String,
    #[serde(default)]
    LOCATION: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawDraftPick {
    PICK: String,
    OWNER: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawMultiTeam {
    PLAYERS: String,
    TEAM: String,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

/// Exports drop trailing empty cells, so rows may be shorter than the header.
fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(rdr)
}

/// Pad a short record with empty cells up to the header width.
fn pad_record(record: &mut csv::StringRecord, width: usize) {
    while record.len() < width {
        record.push_field("");
    }
}

/// Deserialize every row of a CSV stream, skipping rows that fail to decode.
/// Missing trailing cells read as empty, so they take their field defaults.
fn read_rows<T, R>(rdr: R, what: &str) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv_reader(rdr);
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for result in reader.records() {
        let mut record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping unreadable {} row: {}", what, e);
                continue;
            }
        };
        pad_record(&mut record, headers.len());
        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => warn!("skipping malformed {} row: {}", what, e),
        }
    }
    Ok(rows)
}

pub fn load_stats_from_reader<R: Read>(rdr: R) -> Result<Vec<StatRow>, csv::Error> {
    let rows = read_rows::<RawStatRow, _>(rdr, "stats")?;
    Ok(rows.into_iter().map(StatRow::from).collect())
}

pub fn load_roster_from_reader<R: Read>(rdr: R) -> Result<Vec<RosterRow>, csv::Error> {
    let rows = read_rows::<RawRosterRow, _>(rdr, "roster")?;
    Ok(rows
        .into_iter()
        .map(|raw| RosterRow {
            player_id: raw.ID.trim().to_string(),
            team: raw.ABBR.trim().to_string(),
            reserve: raw.RESERVE,
        })
        .collect())
}

pub fn load_player_info_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerInfo>, csv::Error> {
    let rows = read_rows::<RawPlayerInfo, _>(rdr, "player info")?;
    Ok(rows
        .into_iter()
        .map(|raw| PlayerInfo {
            id: raw.ID.trim().to_string(),
            name: raw.Name,
            birth_date: raw.BirthDate,
            pos: raw.Pos,
            nhl_team: raw.NHL.trim().to_string(),
        })
        .collect())
}

pub fn load_contracts_from_reader<R: Read>(rdr: R) -> Result<Vec<Contract>, csv::Error> {
    let rows = read_rows::<RawContract, _>(rdr, "contract")?;
    Ok(rows
        .into_iter()
        .map(|raw| Contract {
            id: raw.ID.trim().to_string(),
            salary: raw.Salary,
            contract: raw.Contract,
        })
        .collect())
}

/// Team info keeps every column so reports can pass the row through verbatim.
pub fn load_team_info_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamInfo>, csv::Error> {
    let mut reader = csv_reader(rdr);
    let headers = reader.headers()?.clone();
    let mut teams = Vec::new();
    for result in reader.records() {
        let mut record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping malformed team info row: {}", e);
                continue;
            }
        };
        pad_record(&mut record, headers.len());
        let columns: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        let Some(abbr) = columns.get("ABBR").map(|a| a.trim().to_string()) else {
            warn!("skipping team info row without ABBR column");
            continue;
        };
        teams.push(TeamInfo {
            name: columns.get("NAME").cloned().unwrap_or_default(),
            division: columns.get("DIVISION").cloned().unwrap_or_default(),
            abbr,
            columns,
        });
    }
    Ok(teams)
}

pub fn load_team_cash_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamCash>, csv::Error> {
    let rows = read_rows::<RawTeamCash, _>(rdr, "team cash")?;
    Ok(rows
        .into_iter()
        .map(|raw| TeamCash {
            team: raw.ABBR.trim().to_string(),
            cash: raw.CASH,
        })
        .collect())
}

pub fn load_owners_from_reader<R: Read>(rdr: R) -> Result<Vec<Owner>, csv::Error> {
    let rows = read_rows::<RawOwner, _>(rdr, "owner")?;
    Ok(rows
        .into_iter()
        .map(|raw| Owner {
            team: raw.ABBR.trim().to_string(),
            owner: raw.OWNER,
            email: raw.EMAIL,
            location: raw.LOCATION,
        })
        .collect())
}

pub fn load_picks_from_reader<R: Read>(rdr: R) -> Result<Vec<DraftPick>, csv::Error> {
    let rows = read_rows::<RawDraftPick, _>(rdr, "draft pick")?;
    Ok(rows
        .into_iter()
        .map(|raw| DraftPick {
            pick: raw.PICK,
            owner: raw.OWNER.trim().to_string(),
        })
        .collect())
}

pub fn load_multi_team_from_reader<R: Read>(rdr: R) -> Result<Vec<MultiTeamPlayer>, csv::Error> {
    let rows = read_rows::<RawMultiTeam, _>(rdr, "multi-team player")?;
    Ok(rows
        .into_iter()
        .map(|raw| MultiTeamPlayer {
            player_ref: raw.PLAYERS.trim().to_string(),
            team: raw.TEAM.trim().to_string(),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Read a whole file as text, dropping a leading UTF-8 byte-order mark.
fn read_text(path: &Path) -> Result<String, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Load one CSV file with the given reader-based loader.
pub fn load_file<T>(
    path: &Path,
    loader: fn(Cursor<String>) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, LoadError> {
    let text = read_text(path)?;
    let rows = loader(Cursor::new(text)).map_err(|e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Like [`load_file`], but a missing file yields an empty table.
fn load_optional_file<T>(
    path: &Path,
    loader: fn(Cursor<String>) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, LoadError> {
    if !path.exists() {
        info!("{} not present, treating as empty", path.display());
        return Ok(Vec::new());
    }
    load_file(path, loader)
}

/// Parse the period number out of a `<prefix>NN.csv` file name.
fn period_from_file_name(file_name: &str, prefix: &str) -> Option<u32> {
    file_name
        .strip_prefix(prefix)?
        .strip_suffix(".csv")?
        .parse::<u32>()
        .ok()
}

/// Find every period that has both a stats and a rosters export in `data_dir`.
///
/// A period with only one of the two files is an error rather than being
/// silently dropped.
pub fn discover_periods(data_dir: &Path) -> Result<Vec<u32>, LoadError> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| LoadError::Io {
        path: data_dir.display().to_string(),
        source: e,
    })?;

    let mut stats = BTreeSet::new();
    let mut rosters = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::Io {
            path: data_dir.display().to_string(),
            source: e,
        })?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if let Some(period) = period_from_file_name(&name, STATS_PREFIX) {
            stats.insert(period);
        } else if let Some(period) = period_from_file_name(&name, ROSTERS_PREFIX) {
            rosters.insert(period);
        }
    }

    if let Some(&period) = stats.difference(&rosters).next() {
        return Err(LoadError::MissingPeriodFile {
            period,
            kind: "rosters",
            path: data_dir.join(rosters_file_name(period)).display().to_string(),
        });
    }
    if let Some(&period) = rosters.difference(&stats).next() {
        return Err(LoadError::MissingPeriodFile {
            period,
            kind: "stats",
            path: data_dir.join(stats_file_name(period)).display().to_string(),
        });
    }

    Ok(stats.into_iter().collect())
}

/// Load every period export in `data_dir` into a [`PeriodStore`].
pub fn load_period_store(data_dir: &Path) -> Result<PeriodStore, LoadError> {
    let periods = discover_periods(data_dir)?;
    if periods.is_empty() {
        return Err(LoadError::Validation(format!(
            "no period exports ({STATS_PREFIX}NN.csv) found in {}",
            data_dir.display()
        )));
    }

    let mut snapshots = Vec::with_capacity(periods.len());
    for period in periods {
        let stats = load_file(
            &data_dir.join(stats_file_name(period)),
            load_stats_from_reader,
        )?;
        let rosters = load_file(
            &data_dir.join(rosters_file_name(period)),
            load_roster_from_reader,
        )?;
        info!(
            "period {}: {} stat rows, {} roster rows",
            period,
            stats.len(),
            rosters.len()
        );
        snapshots.push(PeriodSnapshot::new(period, stats, rosters));
    }

    Ok(PeriodStore::new(snapshots))
}

/// Load the period store and every reference table from `data_dir`.
///
/// Player info, contracts and team info are required; cash, owners, draft
/// picks and the multi-team list are optional.
pub fn load_league(data_dir: &Path) -> Result<LeagueData, LoadError> {
    let path = |name: &str| -> PathBuf { data_dir.join(name) };

    let store = load_period_store(data_dir)?;
    let players = load_file(&path(PLAYER_INFO_FILE), load_player_info_from_reader)?;
    let contracts = load_file(&path(CONTRACTS_FILE), load_contracts_from_reader)?;
    let teams = load_file(&path(TEAM_INFO_FILE), load_team_info_from_reader)?;
    let cash = load_optional_file(&path(TEAM_CASH_FILE), load_team_cash_from_reader)?;
    let owners = load_optional_file(&path(OWNERS_FILE), load_owners_from_reader)?;
    let current_picks = load_optional_file(&path(CURRENT_PICKS_FILE), load_picks_from_reader)?;
    let next_picks = load_optional_file(&path(NEXT_PICKS_FILE), load_picks_from_reader)?;
    let multi_team = load_optional_file(&path(MULTI_TEAM_FILE), load_multi_team_from_reader)?;

    if teams.is_empty() {
        return Err(LoadError::Validation(
            "team info CSV produced zero valid rows".into(),
        ));
    }

    info!(
        "loaded league: {} periods, {} players, {} contracts, {} teams",
        store.periods().len(),
        players.len(),
        contracts.len(),
        teams.len()
    );

    Ok(LeagueData::new(
        store,
        players,
        contracts,
        teams,
        cash,
        owners,
        current_picks,
        next_picks,
        multi_team,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
