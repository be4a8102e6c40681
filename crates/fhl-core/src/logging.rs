// Tracing setup for the report binaries.

use anyhow::Context;
use std::path::Path;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "fhl_hockey=info,fhl_core=info,warn";

/// Initialize tracing to log to `<log_dir>/<file_name>`.
///
/// Stdout carries report output, so log lines never go to the terminal.
pub fn init_tracing(log_dir: &Path, file_name: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join(file_name))
        .with_context(|| format!("failed to create log file {file_name}"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
