// fhl-reports entry point.
//
// 1. Initialize tracing (log to file, stdout carries report output)
// 2. Parse the command, load config and league data
// 3. Build the report and print it, or write every report for `all`

use anyhow::Context;
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    fhl_core::logging::init_tracing(Path::new("logs"), "fhl-reports.log")
        .context("failed to initialize logging")?;
    info!("fhl-reports starting");

    let args: Vec<String> = std::env::args().collect();
    let code = fhl_hockey::cli::run_with_args(&args);

    info!("fhl-reports finished with exit code {code}");
    std::process::exit(code);
}
