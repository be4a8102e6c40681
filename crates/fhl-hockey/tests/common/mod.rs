// On-disk two-team league shared by the integration and CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const STATS_HEADER: &str = "hockeyRef,team,pos,stats/gp,stats/goals,stats/assists,stats/pim,stats/hits,stats/toi,stats/blocks,stats/take,stats/give,stats/wins,stats/losses,stats/ties,stats/so,stats/sa,stats/ga";

pub fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("fhl-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

/// Teams A and B, one forward and one goalie each, two periods.
///
/// Forward goals are cumulative: a1 5 then 8, b1 3 then 3. Team info is
/// written with a byte-order mark.
pub fn write_league(data_dir: &Path) {
    fs::create_dir_all(data_dir).expect("data dir should be created");
    let write = |name: &str, text: &str| {
        fs::write(data_dir.join(name), text).expect("fixture should be written");
    };

    write(
        "team_info.csv",
        "\u{feff}ABBR,NAME,DIVISION\nA,Alpha,East\nB,Bravo,West\n",
    );
    write(
        "player_info.csv",
        "ID,Name,BirthDate,Pos,NHL\n\
         a1,Ann Able,1996-02-10,C,EDM\n\
         ag,Art Goal,1990-07-01,G,BOS\n\
         b1,Bob Baker,2000-12-01,RW,TOR\n\
         bg,Ben Glove,1994-03-03,G,CGY\n",
    );
    write(
        "contracts.csv",
        "ID,Salary,Contract\na1,10,2027\nag,4,2026\nb1,5,2026\nbg,1,\n",
    );
    write("team_cash.csv", "ABBR,CASH\nA,20\nB,30\n");
    write(
        "owners.csv",
        "ABBR,OWNER,EMAIL,LOCATION\nA,Ada,ada@example.com,Halifax\nB,Bea,bea@example.com,Regina\n",
    );
    write("current_picks.csv", "PICK,OWNER\n1-01,B\n1-02,A\n");

    let rosters = "ID,ABBR,RESERVE\na1,A,\nag,A,\nb1,B,\nbg,B,\n";
    write("rosters_p01.csv", rosters);
    write("rosters_p02.csv", rosters);

    write(
        "stats_p01.csv",
        &format!(
            "{STATS_HEADER}\n\
             a1,EDM,C,4,5,1,2,3,60,1,1,0,0,0,0,0,0,0\n\
             ag,BOS,G,2,0,0,0,0,0,0,0,0,2,0,0,1,60,2\n\
             b1,TOR,RW,4,3,2,0,1,45,0,2,1,0,0,0,0,0,0\n\
             bg,CGY,G,2,0,0,0,0,0,0,0,0,1,1,0,0,50,5\n"
        ),
    );
    write(
        "stats_p02.csv",
        &format!(
            "{STATS_HEADER}\n\
             a1,EDM,C,8,8,2,2,5,120,1,2,1,0,0,0,0,0,0\n\
             ag,BOS,G,4,0,0,0,0,0,0,0,0,3,1,0,1,120,6\n\
             b1,MIN,RW,8,3,4,4,1,90,1,3,1,0,0,0,0,0,0\n\
             bg,CGY,G,4,0,0,0,0,0,0,0,0,3,1,0,1,110,8\n"
        ),
    );
}

/// `config/league.toml` under `base_dir`, pointing at absolute data and
/// output directories.
pub fn write_config(base_dir: &Path, data_dir: &Path, output_dir: &Path) {
    let config_dir = base_dir.join("config");
    fs::create_dir_all(&config_dir).expect("config dir should be created");
    let toml = format!(
        r#"[league]
name = "Test League"
age_cutoff = "2025-09-15"

[salary]
salary_periods = 25
season_periods = 26
add_salary_last_period = 22
minimum_cash_charge = 13.0

[paths]
data_dir = "{}"
output_dir = "{}"
"#,
        data_dir.display(),
        output_dir.display()
    );
    fs::write(config_dir.join("league.toml"), toml).expect("config should be written");
}
