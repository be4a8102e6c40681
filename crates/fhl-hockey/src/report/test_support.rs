// Small two-team, two-period league shared by the report tests.

use crate::data::league::LeagueData;
use crate::data::loader::{
    load_contracts_from_reader, load_multi_team_from_reader, load_owners_from_reader,
    load_picks_from_reader, load_player_info_from_reader, load_roster_from_reader,
    load_stats_from_reader, load_team_cash_from_reader, load_team_info_from_reader,
};
use crate::data::store::{PeriodSnapshot, PeriodStore};
use chrono::NaiveDate;

pub const TEAM_INFO: &str = "\
ABBR,NAME,DIVISION
MTL,Montreal,East
TOR,Toronto,West";

pub const PLAYER_INFO: &str = "\
ID,Name,BirthDate,Pos,NHL
f1,Alex Forward,1995-03-01,C,EDM
d1,Dana Defense,2001-10-01,D,TOR
g1,Gil Goalie,,G,BOS
f2,Frank Wing,1990-05-20,LW,NYR
g2,Gus Keeper,1992-01-01,G,NYR
fa1,Free Agent,1999-01-01,RW,CHI";

pub const CONTRACTS: &str = "\
ID,Salary,Contract
f1,200,2027
d1,50,2026
g1,100,
f2,8,2028
g2,3,2026";

pub const ROSTERS: &str = "\
ID,ABBR,RESERVE
f1,MTL,
d1,MTL,R
g1,MTL,
f2,TOR,
g2,TOR,N/A";

const STATS_HEADER: &str = "hockeyRef,team,pos,stats/gp,stats/goals,stats/assists,stats/pim,stats/hits,stats/toi,stats/blocks,stats/take,stats/give,stats/wins,stats/losses,stats/ties,stats/so,stats/sa,stats/ga";

pub const STATS_P1_ROWS: &str = "\
f1,EDM,C,5,5,2,2,4,60,1,2,1,0,0,0,0,0,0
d1,TOR,D,5,1,1,0,6,100,4,1,2,0,0,0,0,0,0
g1,BOS,G,3,0,0,0,0,0,0,0,0,2,1,0,1,90,6
f2,NYR,LW,5,3,3,0,0,30,0,0,0,0,0,0,0,0,0
g2,NYR,G,2,0,0,0,0,0,0,0,0,1,1,0,0,50,5";

pub const STATS_P2_ROWS: &str = "\
f1,EDM,C,9,8,3,2,6,120,1,3,1,0,0,0,0,0,0
d1,TOR,D,9,1,2,2,8,200,6,1,2,0,0,0,0,0,0
g1,BOS,G,6,0,0,0,0,0,0,0,0,4,1,1,1,180,12
f2,NYR,LW,9,3,5,4,2,75,1,1,0,0,0,0,0,0,0
g2,NYR,G,2,0,0,0,0,0,0,0,0,1,1,0,0,50,5
fa1,CHI,RW,8,1,1,0,0,0,0,0,0,0,0,0,0,0,0";

pub fn stats_csv(rows: &str) -> String {
    format!("{STATS_HEADER}\n{rows}")
}

pub fn cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
}

pub fn sample_league() -> LeagueData {
    let snapshot = |period: u32, stats: &str| {
        PeriodSnapshot::new(
            period,
            load_stats_from_reader(stats_csv(stats).as_bytes()).unwrap(),
            load_roster_from_reader(ROSTERS.as_bytes()).unwrap(),
        )
    };

    LeagueData::new(
        PeriodStore::new(vec![snapshot(1, STATS_P1_ROWS), snapshot(2, STATS_P2_ROWS)]),
        load_player_info_from_reader(PLAYER_INFO.as_bytes()).unwrap(),
        load_contracts_from_reader(CONTRACTS.as_bytes()).unwrap(),
        load_team_info_from_reader(TEAM_INFO.as_bytes()).unwrap(),
        load_team_cash_from_reader("ABBR,CASH\nMTL,100\nTOR,50.5".as_bytes()).unwrap(),
        load_owners_from_reader(
            "ABBR,OWNER,EMAIL,LOCATION\nMTL,Marie,marie@example.com,Laval\nTOR,Tom,tom@example.com,Oshawa"
                .as_bytes(),
        )
        .unwrap(),
        load_picks_from_reader("PICK,OWNER\n1-01,MTL\n2-01,MTL\n1-02,TOR".as_bytes()).unwrap(),
        load_picks_from_reader("PICK,OWNER\n1-02,MTL".as_bytes()).unwrap(),
        load_multi_team_from_reader("PLAYERS,TEAM\nf2,NYR".as_bytes()).unwrap(),
    )
}
