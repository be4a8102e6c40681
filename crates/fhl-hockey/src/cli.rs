// Command dispatch for the `fhl-reports` binary.

use crate::data::league::LeagueData;
use crate::data::loader::load_league;
use crate::report::audit::audit_report;
use crate::report::cash::{cash_update, to_csv};
use crate::report::players::players_report;
use crate::report::rosters::rosters_report;
use crate::report::standings::standings_report;
use crate::report::stats::stats_report;
use crate::report::teams::teams_report;
use anyhow::{bail, Context};
use fhl_core::config::{load_config, Config};
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

const USAGE: &str = "usage: fhl-reports <rosters|players|teams|stats|standings|cash|audit|all>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Rosters,
    Players,
    Teams,
    Stats,
    Standings,
    Cash,
    Audit,
    All,
}

/// Reports written by `all`, one JSON file each. The cash update is left
/// out since its output feeds the next period's cash table.
pub const JSON_REPORTS: [Command; 6] = [
    Command::Rosters,
    Command::Players,
    Command::Teams,
    Command::Stats,
    Command::Standings,
    Command::Audit,
];

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Rosters => "rosters",
            Command::Players => "players",
            Command::Teams => "teams",
            Command::Stats => "stats",
            Command::Standings => "standings",
            Command::Cash => "cash",
            Command::Audit => "audit",
            Command::All => "all",
        }
    }
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("rosters") => Some(Command::Rosters),
        Some("players") => Some(Command::Players),
        Some("teams") => Some(Command::Teams),
        Some("stats") => Some(Command::Stats),
        Some("standings") => Some(Command::Standings),
        Some("cash") => Some(Command::Cash),
        Some("audit") => Some(Command::Audit),
        Some("all") => Some(Command::All),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    match run(command) {
        Ok(()) => 0,
        Err(err) => {
            error!("{} failed: {err:#}", command.name());
            eprintln!("{} failed: {err:#}", command.name());
            1
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    info!("config loaded: league={}", config.league.name);

    let league = load_league(Path::new(&config.paths.data_dir))
        .with_context(|| format!("failed to load league data from {}", config.paths.data_dir))?;
    info!(
        "league loaded: {} periods, {} teams, {} players",
        league.store.periods().len(),
        league.teams.len(),
        league.players.len()
    );

    if command == Command::All {
        return write_all(&config, &league);
    }

    let output = render(command, &config, &league)?;
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
    Ok(())
}

fn to_json<T: Serialize>(report: &T) -> anyhow::Result<String> {
    serde_json::to_string(report).context("failed to serialize report")
}

/// Build one report and render it for stdout: JSON, or CSV for `cash`.
pub fn render(command: Command, config: &Config, league: &LeagueData) -> anyhow::Result<String> {
    let cutoff = config.league.age_cutoff;
    match command {
        Command::Rosters => to_json(&rosters_report(league, cutoff)?),
        Command::Players => to_json(&players_report(league, cutoff)?),
        Command::Teams => to_json(&teams_report(league, cutoff, &config.salary)?),
        Command::Stats => to_json(&stats_report(league)?),
        Command::Standings => to_json(&standings_report(league)?),
        Command::Audit => to_json(&audit_report(league)?),
        Command::Cash => {
            let rows = cash_update(league, &config.salary)?;
            to_csv(&rows).context("failed to write cash CSV")
        }
        Command::All => bail!("`all` writes files, it has no single output"),
    }
}

/// Write every JSON report to `<output_dir>/<name>.json`, stopping at the
/// first failure.
fn write_all(config: &Config, league: &LeagueData) -> anyhow::Result<()> {
    let output_dir = Path::new(&config.paths.output_dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    for command in JSON_REPORTS {
        let payload = render(command, config, league)
            .with_context(|| format!("failed to build {} report", command.name()))?;
        let path = output_dir.join(format!("{}.json", command.name()));
        std::fs::write(&path, payload)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote {}", path.display());
        println!("wrote {}", path.display());
    }
    Ok(())
}
